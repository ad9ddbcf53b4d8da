use serde_json::json;
use tablegrid::{
  CellStyle, LayoutContext, RowStyle, SectionStyle, StaticCellContent, StaticContent, Table,
  TableStyle, TableTree, UniformPages,
};

fn two_cell_table(style: TableStyle) -> (Table, StaticCellContent) {
  let mut tree = TableTree::new(style);
  let body = tree.push_section(SectionStyle::default());
  let row = tree.push_row(body, RowStyle::default()).unwrap();
  let mut content = StaticCellContent::new();
  for _ in 0..2 {
    let cell = tree.push_cell(row, CellStyle::default()).unwrap();
    content.insert(cell, StaticContent::new(10, 40, 20));
  }
  (Table::new(tree), content)
}

#[test]
fn geometry_serializes_for_inspection() {
  let (mut table, content) = two_cell_table(TableStyle::default());
  let geometry = table.layout(&LayoutContext::screen(300), &content).unwrap();
  let value = serde_json::to_value(&geometry).unwrap();

  assert_eq!(value["strategy"], json!("Auto"));
  assert_eq!(value["column_positions"], json!([0, 40, 80]));
  assert_eq!(
    value["bounds"],
    json!({ "x": 0, "y": 0, "width": 80, "height": 20 })
  );
  assert_eq!(value["sections"][0]["role"], json!("Body"));
  assert_eq!(value["sections"][0]["rows"][0]["cells"][1]["bounds"]["x"], json!(40));
  assert_eq!(value["content_limits"], json!(null));
  assert_eq!(value["collapsed_borders"], json!([]));
}

#[test]
fn paginated_geometry_carries_its_content_limits() {
  let (mut table, content) = two_cell_table(TableStyle {
    paginate: true,
    ..TableStyle::default()
  });
  let pages = UniformPages::new(0, 100);
  let geometry = table.layout(&LayoutContext::print(300, &pages), &content).unwrap();
  let value = serde_json::to_value(&geometry).unwrap();

  assert!(value["content_limits"].is_object());
  assert_eq!(value["sections"][0]["rows"][0]["content_limit"], json!(1));
}

#[test]
fn repeated_layout_is_stable() {
  let (mut table, content) = two_cell_table(TableStyle::default());
  let ctx = LayoutContext::screen(300);
  let first = table.layout(&ctx, &content).unwrap();
  let second = table.layout(&ctx, &content).unwrap();
  assert_eq!(first, second);
}
