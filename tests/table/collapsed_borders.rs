use tablegrid::{
  BorderCollapse, BorderPrecedence, BorderSet, BorderSide, BorderStyle, CellId, CellStyle,
  LayoutContext, Rect, Rgba, RowStyle, SectionStyle, Side, StaticCellContent, StaticContent, Table,
  TableStyle, TableTree, UniformPages,
};

fn collapsed_style() -> TableStyle {
  TableStyle {
    border_collapse: BorderCollapse::Collapse,
    border: BorderSet::all(BorderSide::solid(4, Rgba::BLACK)),
    // ignored by the collapsing model
    border_spacing_h: 7,
    border_spacing_v: 7,
    ..TableStyle::default()
  }
}

fn two_cells(style: TableStyle, a: BorderSet, b: BorderSet) -> (Table, StaticCellContent, CellId, CellId) {
  let mut tree = TableTree::new(style);
  let body = tree.push_section(SectionStyle::default());
  let row = tree.push_row(body, RowStyle::default()).unwrap();
  let cell = |border| CellStyle {
    border,
    ..CellStyle::default()
  };
  let a = tree.push_cell(row, cell(a)).unwrap();
  let b = tree.push_cell(row, cell(b)).unwrap();
  let content = StaticCellContent::new()
    .with_cell(a, StaticContent::new(20, 20, 10))
    .with_cell(b, StaticContent::new(20, 20, 10));
  (Table::new(tree), content, a, b)
}

#[test]
fn shared_edge_goes_to_the_wider_cell_border() {
  let (mut table, content, a, b) = two_cells(
    collapsed_style(),
    BorderSet::all(BorderSide::solid(2, Rgba::RED)),
    BorderSet::all(BorderSide::new(1, BorderStyle::Dashed, Rgba::BLUE)),
  );
  let geometry = table.layout(&LayoutContext::screen(500), &content).unwrap();

  let first = geometry.cell(a).unwrap();
  let second = geometry.cell(b).unwrap();
  let first_borders = first.collapsed.unwrap();
  let second_borders = second.collapsed.unwrap();

  assert_eq!(first_borders.right, second_borders.left);
  assert_eq!(first_borders.right.width(), 2);
  assert_eq!(first_borders.right.style(), Some(BorderStyle::Solid));
  assert_eq!(first_borders.right.color(), Rgba::RED);
  assert_eq!(first_borders.right.precedence(), BorderPrecedence::Cell);

  // the table's 4px border wins on the outer edges
  assert_eq!(first_borders.top.width(), 4);
  assert_eq!(first_borders.top.precedence(), BorderPrecedence::Table);
  assert_eq!(first_borders.left.color(), Rgba::BLACK);

  // each cell takes its half of the shared line
  assert_eq!(first.border.top, 2);
  assert_eq!(first.border.right, 1);
  assert_eq!(first.border.bottom, 2);
  assert_eq!(first.border.left, 2);
  assert_eq!(second.border.left, 1);
  assert_eq!(second.border.right, 2);
}

#[test]
fn collapsed_table_has_no_spacing_or_box_border() {
  let (mut table, content, a, b) = two_cells(
    collapsed_style(),
    BorderSet::all(BorderSide::solid(2, Rgba::RED)),
    BorderSet::all(BorderSide::new(1, BorderStyle::Dashed, Rgba::BLUE)),
  );
  let geometry = table.layout(&LayoutContext::screen(500), &content).unwrap();

  assert_eq!(geometry.hspacing, 0);
  assert_eq!(geometry.vspacing, 0);
  assert_eq!(geometry.bounds.width, 46);
  assert_eq!(geometry.cell(a).unwrap().bounds, Rect::from_xywh(0, 0, 23, 14));
  assert_eq!(geometry.cell(b).unwrap().bounds.x, 23);
  assert_eq!(
    geometry.cell(a).unwrap().painting_bounds(),
    Rect::from_xywh(-2, -2, 26, 18)
  );
}

#[test]
fn shared_edges_are_painted_once() {
  let (mut table, content, a, b) = two_cells(
    collapsed_style(),
    BorderSet::all(BorderSide::solid(2, Rgba::RED)),
    BorderSet::all(BorderSide::new(1, BorderStyle::Dashed, Rgba::BLUE)),
  );
  let geometry = table.layout(&LayoutContext::screen(500), &content).unwrap();

  assert_eq!(geometry.collapsed_borders.len(), 7);
  assert!(geometry
    .collapsed_borders
    .iter()
    .any(|side| side.cell == a && side.side == Side::Right));
  assert!(!geometry
    .collapsed_borders
    .iter()
    .any(|side| side.cell == b && side.side == Side::Left));
}

#[test]
fn hidden_neighbour_suppresses_the_shared_edge() {
  let hidden_left = BorderSet {
    left: BorderSide::new(1, BorderStyle::Hidden, Rgba::BLUE),
    ..BorderSet::NONE
  };
  let (mut table, content, a, _) = two_cells(
    collapsed_style(),
    BorderSet::all(BorderSide::solid(2, Rgba::RED)),
    hidden_left,
  );
  let geometry = table.layout(&LayoutContext::screen(500), &content).unwrap();

  let first = geometry.cell(a).unwrap();
  assert!(first.collapsed.unwrap().right.hidden());
  assert_eq!(first.border.right, 0);
  assert!(geometry
    .collapsed_borders
    .iter()
    .all(|side| !side.value.hidden()));
  assert!(!geometry
    .collapsed_borders
    .iter()
    .any(|side| side.cell == a && side.side == Side::Right));
}

#[test]
fn separated_borders_are_not_resolved() {
  let style = TableStyle {
    border: BorderSet::all(BorderSide::solid(4, Rgba::BLACK)),
    ..TableStyle::default()
  };
  let (mut table, content, a, _) = two_cells(
    style,
    BorderSet::all(BorderSide::solid(2, Rgba::RED)),
    BorderSet::NONE,
  );
  let geometry = table.layout(&LayoutContext::screen(500), &content).unwrap();

  assert!(geometry.collapsed_borders.is_empty());
  let first = geometry.cell(a).unwrap();
  assert!(first.collapsed.is_none());
  assert_eq!(first.border.left, 2);
  assert_eq!(first.bounds.x, 4);
  assert_eq!(first.painting_bounds(), first.bounds);
}

#[test]
fn collapsed_top_border_is_kept_on_the_page() {
  let style = TableStyle {
    border_collapse: BorderCollapse::Collapse,
    ..TableStyle::default()
  };
  let (mut table, content, a, _) = two_cells(
    style,
    BorderSet {
      top: BorderSide::solid(6, Rgba::BLACK),
      ..BorderSet::NONE
    },
    BorderSet::NONE,
  );
  let pages = UniformPages::new(0, 1000);
  let geometry = table.layout(&LayoutContext::print(500, &pages), &content).unwrap();

  assert_eq!(geometry.page_clearance, 3);
  assert_eq!(geometry.bounds.y, 3);
  assert_eq!(geometry.cell(a).unwrap().painting_bounds().y, 0);
}
