use tablegrid::{
  CellId, CellStyle, LayoutContext, Length, RowStyle, SectionStyle, StaticCellContent, StaticContent,
  Table, TableGeometry, TableStyle, TableTree, VerticalAlign,
};

/// One body section of single-height rows; `rows[i]` lists the cell styles
/// of row `i`.
fn build(style: TableStyle, rows: &[Vec<CellStyle>]) -> (Table, Vec<CellId>) {
  let mut tree = TableTree::new(style);
  let body = tree.push_section(SectionStyle::default());
  let mut ids = Vec::new();
  for cells in rows {
    let row = tree.push_row(body, RowStyle::default()).unwrap();
    for style in cells {
      ids.push(tree.push_cell(row, style.clone()).unwrap());
    }
  }
  (Table::new(tree), ids)
}

fn aligned(vertical_align: VerticalAlign) -> CellStyle {
  CellStyle {
    vertical_align,
    ..CellStyle::default()
  }
}

fn layout(table: &mut Table, content: &StaticCellContent) -> TableGeometry {
  table.layout(&LayoutContext::screen(600), content).unwrap()
}

#[test]
fn baseline_cells_share_the_lowest_baseline() {
  let (mut table, ids) = build(
    TableStyle::default(),
    &[vec![aligned(VerticalAlign::Baseline); 3]],
  );
  let content = StaticCellContent::new()
    .with_cell(ids[0], StaticContent::new(30, 30, 20).with_baseline(10))
    .with_cell(ids[1], StaticContent::new(30, 30, 20).with_baseline(14))
    .with_cell(ids[2], StaticContent::new(30, 30, 20).with_baseline(8));
  let geometry = layout(&mut table, &content);

  let row = &geometry.sections[0].rows[0];
  assert_eq!(row.baseline, Some(14));
  for id in &ids {
    assert_eq!(geometry.cell(*id).unwrap().baseline, Some(14), "cell {:?}", id);
  }
  // the cell shifted furthest decides the height
  assert_eq!(row.bounds.height, 26);
  assert_eq!(geometry.cell(ids[2]).unwrap().content_offset, 6);
  assert_eq!(geometry.inline_baseline(), 14);
}

#[test]
fn middle_and_bottom_cells_use_their_natural_height() {
  let (mut table, ids) = build(
    TableStyle::default(),
    &[vec![
      aligned(VerticalAlign::Top),
      aligned(VerticalAlign::Middle),
      aligned(VerticalAlign::Bottom),
    ]],
  );
  let content = StaticCellContent::new()
    .with_cell(ids[0], StaticContent::new(10, 10, 60))
    .with_cell(ids[1], StaticContent::new(10, 10, 20))
    .with_cell(ids[2], StaticContent::new(10, 10, 20));
  let geometry = layout(&mut table, &content);

  let offsets: Vec<i32> = ids
    .iter()
    .map(|id| geometry.cell(*id).unwrap().content_offset)
    .collect();
  assert_eq!(offsets, vec![0, 20, 40]);
  // every cell is stretched to the row
  assert!(geometry.cells().all(|cell| cell.bounds.height == 60));
  assert_eq!(geometry.sections[0].rows[0].baseline, Some(60));
}

#[test]
fn fixed_table_height_stretches_the_last_row() {
  let style = TableStyle {
    height: Length::Fixed(100),
    ..TableStyle::default()
  };
  let (mut table, ids) = build(style, &[vec![CellStyle::default()]]);
  let content = StaticCellContent::new().with_cell(ids[0], StaticContent::new(10, 10, 20));
  let geometry = layout(&mut table, &content);

  assert_eq!(geometry.sections[0].rows[0].bounds.height, 100);
  assert_eq!(geometry.bounds.height, 100);
}

#[test]
fn fixed_table_height_leaves_room_for_vertical_spacing() {
  let style = TableStyle {
    height: Length::Fixed(100),
    border_spacing_v: 5,
    ..TableStyle::default()
  };
  let (mut table, ids) = build(style, &[vec![CellStyle::default()]]);
  let content = StaticCellContent::new().with_cell(ids[0], StaticContent::new(10, 10, 20));
  let geometry = layout(&mut table, &content);

  let row = &geometry.sections[0].rows[0];
  assert_eq!((row.bounds.y, row.bounds.height), (5, 90));
  assert_eq!(geometry.bounds.height, 100);
}

#[test]
fn rows_stack_with_vertical_spacing() {
  let style = TableStyle {
    border_spacing_v: 4,
    ..TableStyle::default()
  };
  let (mut table, ids) = build(style, &[vec![CellStyle::default()], vec![CellStyle::default()]]);
  let content = StaticCellContent::new()
    .with_cell(ids[0], StaticContent::new(10, 10, 20))
    .with_cell(ids[1], StaticContent::new(10, 10, 30));
  let geometry = layout(&mut table, &content);

  let tops: Vec<i32> = geometry.rows().map(|row| row.bounds.y).collect();
  assert_eq!(tops, vec![4, 28]);
  assert_eq!(geometry.bounds.height, 62);
}

#[test]
fn declared_row_height_is_a_minimum() {
  let mut tree = TableTree::new(TableStyle::default());
  let body = tree.push_section(SectionStyle::default());
  let tall = tree
    .push_row(
      body,
      RowStyle {
        height: Length::Fixed(40),
        ..RowStyle::default()
      },
    )
    .unwrap();
  let short = tree
    .push_row(
      body,
      RowStyle {
        height: Length::Fixed(5),
        ..RowStyle::default()
      },
    )
    .unwrap();
  let a = tree.push_cell(tall, CellStyle::default()).unwrap();
  let b = tree.push_cell(short, CellStyle::default()).unwrap();
  let content = StaticCellContent::new()
    .with_cell(a, StaticContent::new(10, 10, 20))
    .with_cell(b, StaticContent::new(10, 10, 20));
  let mut table = Table::new(tree);
  let geometry = layout(&mut table, &content);

  let heights: Vec<i32> = geometry.rows().map(|row| row.bounds.height).collect();
  assert_eq!(heights, vec![40, 20]);
}

#[test]
fn row_spanning_cell_grows_its_last_row() {
  let spanning = CellStyle {
    rowspan: 2,
    ..CellStyle::default()
  };
  let mut tree = TableTree::new(TableStyle::default());
  let body = tree.push_section(SectionStyle::default());
  let first = tree.push_row(body, RowStyle::default()).unwrap();
  let second = tree.push_row(body, RowStyle::default()).unwrap();
  let big = tree.push_cell(first, spanning).unwrap();
  let a = tree.push_cell(first, CellStyle::default()).unwrap();
  let b = tree.push_cell(second, CellStyle::default()).unwrap();
  let content = StaticCellContent::new()
    .with_cell(big, StaticContent::new(10, 10, 50))
    .with_cell(a, StaticContent::new(10, 10, 10))
    .with_cell(b, StaticContent::new(10, 10, 10));
  let mut table = Table::new(tree);
  let geometry = layout(&mut table, &content);

  let heights: Vec<i32> = geometry.rows().map(|row| row.bounds.height).collect();
  assert_eq!(heights, vec![10, 40]);
  assert_eq!(geometry.cell(big).unwrap().bounds.height, 50);
  // the second row's cell sits in the column after the spanning one
  assert_eq!(geometry.cell(b).unwrap().eff_col, 1);
  assert_eq!(geometry.bounds.height, 50);
}
