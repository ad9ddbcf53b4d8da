use tablegrid::layout::contexts::table::{GridSlot, TableGrid};
use tablegrid::{
  CellId, CellStyle, LayoutContext, Length, RowStyle, SectionStyle, StaticCellContent,
  StaticContent, StrategyKind, Table, TableGeometry, TableLayout, TableStyle, TableTree,
};

/// Builds one body section; each cell is `(style, min, max)` with 10px high
/// content.
fn build(style: TableStyle, rows: &[Vec<(CellStyle, i32, i32)>]) -> (Table, StaticCellContent, Vec<CellId>) {
  let mut tree = TableTree::new(style);
  let body = tree.push_section(SectionStyle::default());
  let mut content = StaticCellContent::new();
  let mut ids = Vec::new();
  for cells in rows {
    let row = tree.push_row(body, RowStyle::default()).unwrap();
    for (style, min, max) in cells {
      let id = tree.push_cell(row, style.clone()).unwrap();
      content.insert(id, StaticContent::new(*min, *max, 10));
      ids.push(id);
    }
  }
  (Table::new(tree), content, ids)
}

fn width(width: Length) -> CellStyle {
  CellStyle {
    width,
    ..CellStyle::default()
  }
}

fn layout(table: &mut Table, content: &StaticCellContent, containing: i32) -> TableGeometry {
  table
    .layout(&LayoutContext::screen(containing), content)
    .expect("layout succeeds")
}

fn column_widths(geometry: &TableGeometry) -> Vec<i32> {
  geometry
    .column_positions
    .windows(2)
    .map(|w| w[1] - w[0] - geometry.hspacing)
    .collect()
}

#[test]
fn spanning_min_width_grows_the_columns_it_covers() {
  let spanning = CellStyle {
    colspan: 2,
    ..CellStyle::default()
  };
  let (mut table, content, _) = build(
    TableStyle::default(),
    &[
      vec![(width(Length::Fixed(100)), 10, 10), (CellStyle::default(), 10, 10)],
      vec![(spanning, 250, 250)],
    ],
  );
  let geometry = layout(&mut table, &content, 1000);

  let widths = column_widths(&geometry);
  assert!(widths.iter().sum::<i32>() >= 250, "widths {:?}", widths);
  // the fixed column keeps its width; the auto column takes the rest
  assert_eq!(widths, vec![100, 150]);
  assert_eq!(geometry.bounds.width, 250);
}

#[test]
fn percentages_over_a_hundred_are_cut_from_the_last_columns() {
  let style = TableStyle {
    width: Length::Fixed(200),
    ..TableStyle::default()
  };
  let (mut table, content, _) = build(
    style,
    &[vec![
      (width(Length::Percent(50)), 0, 0),
      (width(Length::Percent(30)), 0, 0),
      (width(Length::Percent(30)), 0, 0),
    ]],
  );
  let geometry = layout(&mut table, &content, 500);

  assert_eq!(geometry.strategy, StrategyKind::Auto);
  assert_eq!(geometry.column_positions, vec![0, 100, 160, 200]);
}

#[test]
fn fixed_layout_splits_what_is_left_between_auto_columns() {
  let style = TableStyle {
    width: Length::Fixed(300),
    table_layout: TableLayout::Fixed,
    border_spacing_h: 10,
    ..TableStyle::default()
  };
  let (mut table, content, ids) = build(
    style,
    &[vec![
      (width(Length::Fixed(100)), 500, 500),
      (CellStyle::default(), 0, 0),
      (CellStyle::default(), 0, 0),
    ]],
  );
  let geometry = layout(&mut table, &content, 1000);

  assert_eq!(geometry.strategy, StrategyKind::Fixed);
  assert_eq!(geometry.column_positions, vec![0, 110, 200, 290]);
  let widths = column_widths(&geometry);
  assert_eq!(
    widths.iter().sum::<i32>() + geometry.hspacing * 4,
    geometry.content_box().width
  );

  let middle = geometry.cell(ids[1]).unwrap();
  assert_eq!((middle.bounds.x, middle.bounds.width), (120, 80));
  let last = geometry.cell(ids[2]).unwrap();
  assert_eq!((last.bounds.x, last.bounds.width), (210, 80));
}

#[test]
fn auto_width_table_fills_the_containing_block_when_content_is_wide() {
  let (mut table, content, _) = build(
    TableStyle::default(),
    &[vec![(CellStyle::default(), 50, 400), (CellStyle::default(), 50, 400)]],
  );
  let geometry = layout(&mut table, &content, 300);

  assert_eq!(geometry.bounds.width, 300);
  assert_eq!(column_widths(&geometry), vec![150, 150]);
  assert_eq!(geometry.min_width, 100);
  assert_eq!(geometry.max_width, 800);
}

#[test]
fn cell_spanning_three_columns_and_two_rows() {
  let big = CellStyle {
    colspan: 3,
    rowspan: 2,
    ..CellStyle::default()
  };
  let mut tree = TableTree::new(TableStyle::default());
  let body = tree.push_section(SectionStyle::default());
  let first = tree.push_row(body, RowStyle::default()).unwrap();
  tree.push_row(body, RowStyle::default()).unwrap();
  let cell = tree.push_cell(first, big).unwrap();

  let grid = TableGrid::build(&tree).unwrap();
  assert_eq!(grid.num_eff_cols(), 3);
  for row in 0..2 {
    assert_eq!(grid.cell_at(0, row, 0), GridSlot::Cell(cell));
    assert_eq!(grid.cell_at(0, row, 1), GridSlot::Spanned);
    assert_eq!(grid.cell_at(0, row, 2), GridSlot::Spanned);
  }
}

#[test]
fn plain_grid_maps_cells_one_to_one() {
  let rows: Vec<Vec<(CellStyle, i32, i32)>> = (0..3)
    .map(|_| (0..4).map(|_| (CellStyle::default(), 5, 5)).collect())
    .collect();
  let (table, _, ids) = build(TableStyle::default(), &rows);

  let grid = TableGrid::build(table.tree()).unwrap();
  assert_eq!(grid.num_eff_cols(), 4);
  for (i, id) in ids.iter().enumerate() {
    assert_eq!(grid.cell_at(0, i / 4, i % 4), GridSlot::Cell(*id), "cell {}", i);
  }
}
