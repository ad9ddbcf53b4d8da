use tablegrid::{
  BorderSet, BorderSide, CellId, CellStyle, EdgeOffsets, LayoutContext, Point, Rect, Rgba, RowStyle,
  SectionStyle, StaticCellContent, StaticContent, Table, TableStyle, TableTree, UniformPages,
};

fn paginated() -> TableStyle {
  TableStyle {
    paginate: true,
    ..TableStyle::default()
  }
}

/// Single-column table; `sections` lists each section's style and the
/// content of its rows, one 50px wide cell per row.
struct Builder {
  tree: TableTree,
  content: StaticCellContent,
  cells: Vec<CellId>,
}

impl Builder {
  fn new(style: TableStyle) -> Self {
    Self {
      tree: TableTree::new(style),
      content: StaticCellContent::new(),
      cells: Vec::new(),
    }
  }

  fn section(mut self, style: SectionStyle, rows: Vec<(CellStyle, StaticContent)>) -> Self {
    let section = self.tree.push_section(style);
    for (cell, content) in rows {
      let row = self.tree.push_row(section, RowStyle::default()).unwrap();
      let id = self.tree.push_cell(row, cell).unwrap();
      self.content.insert(id, content);
      self.cells.push(id);
    }
    self
  }

  fn body(self, rows: Vec<StaticContent>) -> Self {
    let rows = rows.into_iter().map(|c| (CellStyle::default(), c)).collect();
    self.section(SectionStyle::default(), rows)
  }

  fn header(self, height: i32) -> Self {
    self.section(SectionStyle::header(), vec![(CellStyle::default(), line(height))])
  }

  fn footer(self, height: i32) -> Self {
    self.section(SectionStyle::footer(), vec![(CellStyle::default(), line(height))])
  }

  fn build(self) -> (Table, StaticCellContent, Vec<CellId>) {
    (Table::new(self.tree), self.content, self.cells)
  }
}

/// One line of text `height` tall.
fn line(height: i32) -> StaticContent {
  lines(height, height)
}

fn lines(height: i32, line_height: i32) -> StaticContent {
  StaticContent::new(50, 50, height).with_lines(line_height)
}

#[test]
fn row_whose_first_line_misses_the_page_moves_down() {
  let (mut table, content, cells) = Builder::new(paginated())
    .body(vec![lines(60, 20), lines(80, 50)])
    .build();
  let pages = UniformPages::new(0, 100);
  let geometry = table.layout(&LayoutContext::print(200, &pages), &content).unwrap();

  let rows: Vec<_> = geometry.rows().collect();
  assert_eq!(rows[0].bounds.y, 0);
  assert!(!rows[0].moved_to_next_page);
  assert_eq!(rows[1].bounds.y, 100);
  assert!(rows[1].moved_to_next_page);
  assert_eq!(geometry.cell(cells[1]).unwrap().bounds.y, 100);
  assert_eq!(geometry.bounds.height, 180);

  assert!(geometry.content_limits.is_some());
  assert_eq!(geometry.content_limited_border_edge(0), Rect::from_xywh(0, 0, 50, 60));
  assert_eq!(geometry.content_limited_border_edge(1), Rect::from_xywh(0, 100, 50, 80));
}

#[test]
fn header_and_footer_repeat_around_each_page() {
  let (mut table, content, _) = Builder::new(paginated())
    .header(10)
    .body(vec![line(40), line(40), line(40)])
    .footer(10)
    .build();
  let pages = UniformPages::new(0, 100);
  let geometry = table.layout(&LayoutContext::print(200, &pages), &content).unwrap();

  let body: Vec<i32> = geometry.sections[1].rows.iter().map(|r| r.bounds.y).collect();
  // the third row lands below the repeated header
  assert_eq!(body, vec![10, 50, 110]);
  let footer = geometry.footer().unwrap();
  assert_eq!((footer.bounds.y, footer.bounds.max_y()), (150, 160));
  assert_eq!(geometry.bounds.height, 160);

  assert_eq!(geometry.header_position(0), Some(0));
  assert_eq!(geometry.header_position(1), Some(100));
  assert_eq!(geometry.footer_position(0), Some(90));
  assert_eq!(geometry.footer_position(1), Some(150));

  let width = geometry.bounds.width;
  assert_eq!(geometry.content_limited_border_edge(0), Rect::from_xywh(0, 0, width, 100));
  assert_eq!(geometry.content_limited_border_edge(1), Rect::from_xywh(0, 100, width, 60));
}

#[test]
fn table_without_room_for_header_and_footer_starts_on_the_next_page() {
  let (mut table, content, _) = Builder::new(paginated())
    .header(30)
    .body(vec![line(10)])
    .footer(30)
    .build();
  let pages = UniformPages::new(0, 100);
  let ctx = LayoutContext::print(200, &pages).with_origin(Point::new(0, 50));
  let geometry = table.layout(&ctx, &content).unwrap();

  assert_eq!(geometry.bounds.y, 100);
  assert_eq!(geometry.bounds.height, 70);
  assert_eq!(geometry.header().unwrap().bounds.y, 100);
}

#[test]
fn nested_table_reports_the_space_it_reserves() {
  let style = TableStyle {
    padding: EdgeOffsets::all(3),
    border: BorderSet::all(BorderSide::solid(2, Rgba::BLACK)),
    border_spacing_v: 4,
    ..paginated()
  };
  let (mut table, content, _) = Builder::new(style)
    .header(10)
    .body(vec![line(10)])
    .footer(10)
    .build();
  let pages = UniformPages::new(0, 100);
  let ctx = LayoutContext::print(200, &pages).nested_in_paginated_table();
  let geometry = table.layout(&ctx, &content).unwrap();

  assert_eq!(geometry.extra_space_top, 19);
  assert_eq!(geometry.extra_space_bottom, 23);
  // the outer table analyzes page breaks
  assert!(geometry.content_limits.is_none());
}

#[test]
fn top_level_table_reserves_nothing() {
  let (mut table, content, _) = Builder::new(paginated())
    .header(10)
    .body(vec![line(10)])
    .build();
  let pages = UniformPages::new(0, 100);
  let geometry = table.layout(&LayoutContext::print(200, &pages), &content).unwrap();

  assert_eq!((geometry.extra_space_top, geometry.extra_space_bottom), (0, 0));
}

#[test]
fn tall_row_is_split_across_pages_with_its_padding() {
  let padded = CellStyle {
    padding: EdgeOffsets::all(5),
    ..CellStyle::default()
  };
  let (mut table, content, cells) = Builder::new(paginated())
    .section(SectionStyle::default(), vec![(padded, lines(150, 30))])
    .build();
  let pages = UniformPages::new(0, 100);
  let geometry = table.layout(&LayoutContext::print(200, &pages), &content).unwrap();

  let row = geometry.rows().next().unwrap();
  assert_eq!(row.bounds.y, 0);
  assert!(!row.moved_to_next_page);
  assert_eq!(row.bounds.height, 160);
  assert_eq!((row.extra_space_top, row.extra_space_bottom), (5, 5));
  assert!(row.content_limit.is_some());

  let cell = cells[0];
  assert_eq!(
    geometry.cell_content_limited_border_edge(cell, 0),
    Some(Rect::from_xywh(0, 0, 50, 100))
  );
  assert_eq!(
    geometry.cell_content_limited_border_edge(cell, 1),
    Some(Rect::from_xywh(0, 120, 50, 40))
  );
  let clip = geometry.cell_clip_edge(cell, 1).unwrap();
  assert_eq!((clip.y, clip.height), (125, 30));
}

#[test]
fn screen_layout_never_breaks_rows() {
  let (mut table, content, _) = Builder::new(paginated())
    .body(vec![lines(60, 20), lines(80, 50)])
    .build();
  let geometry = table.layout(&LayoutContext::screen(200), &content).unwrap();

  let tops: Vec<i32> = geometry.rows().map(|r| r.bounds.y).collect();
  assert_eq!(tops, vec![0, 60]);
  assert!(geometry.rows().all(|r| !r.moved_to_next_page));
  assert!(geometry.content_limits.is_none());
  assert_eq!(
    geometry.content_limited_border_edge(3),
    geometry.bounds
  );
}
