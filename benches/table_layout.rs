use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tablegrid::layout::contexts::table::{CollapsedBorders, TableGrid};
use tablegrid::{
  BorderCollapse, BorderSet, BorderSide, BorderStyle, CellStyle, LayoutContext, Length, Rgba,
  RowStyle, SectionStyle, StaticCellContent, StaticContent, Table, TableStyle, TableTree,
  UniformPages,
};

/// A `rows` x `cols` table; every fifth cell spans two columns and every
/// seventh row has a fixed-width first cell.
fn build_table(rows: usize, cols: usize, style: TableStyle) -> (TableTree, StaticCellContent) {
  let mut tree = TableTree::new(style);
  let mut content = StaticCellContent::new();
  let header = tree.push_section(SectionStyle::header());
  let body = tree.push_section(SectionStyle::default());

  for r in 0..rows {
    let section = if r == 0 { header } else { body };
    let row = tree
      .push_row(section, RowStyle::default())
      .expect("section exists");
    let mut c = 0;
    while c < cols {
      let colspan = if (r * cols + c) % 5 == 4 && c + 1 < cols { 2 } else { 1 };
      let width = if c == 0 && r % 7 == 0 {
        Length::Fixed(60)
      } else {
        Length::Auto
      };
      let border_style = if c % 3 == 0 {
        BorderStyle::Dashed
      } else {
        BorderStyle::Solid
      };
      let cell = tree
        .push_cell(
          row,
          CellStyle {
            colspan,
            width,
            border: BorderSet::all(BorderSide::new(1 + (c % 3) as i32, border_style, Rgba::BLACK)),
            ..CellStyle::default()
          },
        )
        .expect("row exists");
      let max = 20 + ((r * 31 + c * 17) % 80) as i32;
      content.insert(
        cell,
        StaticContent::new(max / 3, max, 12 + (r % 4) as i32 * 6).with_lines(12),
      );
      c += colspan;
    }
  }
  (tree, content)
}

fn bench_auto_layout(c: &mut Criterion) {
  let mut group = c.benchmark_group("auto_layout");
  for &(rows, cols) in &[(50usize, 8usize), (400, 12)] {
    let (tree, content) = build_table(rows, cols, TableStyle {
      border_spacing_h: 2,
      border_spacing_v: 2,
      ..TableStyle::default()
    });
    group.bench_with_input(
      BenchmarkId::new("screen", format!("{rows}x{cols}")),
      &tree,
      |b, tree| {
        b.iter(|| {
          let mut table = Table::new(tree.clone());
          let geometry = table
            .layout(&LayoutContext::screen(1200), &content)
            .expect("layout succeeds");
          black_box(geometry);
        });
      },
    );
  }
  group.finish();
}

fn bench_paginated_layout(c: &mut Criterion) {
  let (tree, content) = build_table(400, 8, TableStyle {
    paginate: true,
    ..TableStyle::default()
  });
  let pages = UniformPages::new(0, 900);
  c.bench_function("paginated_layout_400x8", |b| {
    b.iter(|| {
      let mut table = Table::new(tree.clone());
      let geometry = table
        .layout(&LayoutContext::print(1000, &pages), &content)
        .expect("layout succeeds");
      black_box(geometry);
    });
  });
}

fn bench_collapsed_borders(c: &mut Criterion) {
  let (tree, _) = build_table(300, 10, TableStyle {
    border_collapse: BorderCollapse::Collapse,
    border: BorderSet::all(BorderSide::solid(3, Rgba::BLACK)),
    ..TableStyle::default()
  });
  let grid = TableGrid::build(&tree).expect("grid builds");
  c.bench_function("collapsed_borders_300x10", |b| {
    b.iter(|| {
      let borders =
        CollapsedBorders::resolve(black_box(&tree), &grid, false).expect("borders resolve");
      black_box(borders.collect_sides(&grid));
    });
  });
}

fn perf_criterion() -> Criterion {
  Criterion::default().configure_from_args()
}

criterion_group!(
  name = benches;
  config = perf_criterion();
  targets = bench_auto_layout, bench_paginated_layout, bench_collapsed_borders
);
criterion_main!(benches);
