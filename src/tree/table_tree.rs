//! The table box tree
//!
//! A [`TableTree`] is the DOM-derived structure the layout engine works on:
//! the table style, its `<col>` elements, and an ordered list of row groups,
//! each holding ordered rows of cells. Nodes are addressed through
//! generation-checked handles so that the grid, the collapsed-border cache
//! and the output geometry can refer to cells without owning them.
//!
//! Every structural change bumps [`TableTree::revision`], which is how the
//! layout side knows its grid and column caches are out of date.

use super::arena::{Arena, Id};
use crate::error::{Result, TreeError};
use crate::style::{CellStyle, ColumnStyle, RowStyle, SectionRole, SectionStyle, TableStyle};

pub type SectionId = Id<SectionNode>;
pub type RowId = Id<RowNode>;
pub type CellId = Id<CellNode>;

/// A row group
#[derive(Debug, Clone)]
pub struct SectionNode {
  pub style: SectionStyle,
  pub rows: Vec<RowId>,
}

impl SectionNode {
  pub fn role(&self) -> SectionRole {
    self.style.role
  }
}

/// A table row
#[derive(Debug, Clone)]
pub struct RowNode {
  pub style: RowStyle,
  pub section: SectionId,
  pub cells: Vec<CellId>,
}

/// A table cell
#[derive(Debug, Clone)]
pub struct CellNode {
  pub style: CellStyle,
  pub row: RowId,
}

#[derive(Debug, Clone)]
pub struct TableTree {
  style: TableStyle,
  columns: Vec<ColumnStyle>,
  section_order: Vec<SectionId>,
  sections: Arena<SectionNode>,
  rows: Arena<RowNode>,
  cells: Arena<CellNode>,
  revision: u64,
}

fn stale<T>(kind: &'static str, id: Id<T>) -> TreeError {
  TreeError::StaleHandle {
    kind,
    index: id.index() as u32,
    generation: id.generation(),
  }
}

impl TableTree {
  pub fn new(style: TableStyle) -> Self {
    Self {
      style,
      columns: Vec::new(),
      section_order: Vec::new(),
      sections: Arena::new(),
      rows: Arena::new(),
      cells: Arena::new(),
      revision: 0,
    }
  }

  pub fn style(&self) -> &TableStyle {
    &self.style
  }

  /// Style changes go through the owning table so the layout strategy can
  /// be reselected.
  pub(crate) fn set_style(&mut self, style: TableStyle) {
    self.style = style;
    self.touch();
  }

  /// Monotonic counter bumped by every mutation.
  pub fn revision(&self) -> u64 {
    self.revision
  }

  fn touch(&mut self) {
    self.revision = self.revision.wrapping_add(1);
  }

  // ---- construction ----

  /// Appends a `<col>` element.
  pub fn push_column(&mut self, column: ColumnStyle) {
    self.columns.push(column);
    self.touch();
  }

  pub fn push_section(&mut self, style: SectionStyle) -> SectionId {
    let id = self.sections.insert(SectionNode {
      style,
      rows: Vec::new(),
    });
    self.section_order.push(id);
    self.touch();
    id
  }

  pub fn push_row(&mut self, section: SectionId, style: RowStyle) -> Result<RowId> {
    if !self.sections.contains(section) {
      return Err(stale("section", section).into());
    }
    let id = self.rows.insert(RowNode {
      style,
      section,
      cells: Vec::new(),
    });
    if let Some(node) = self.sections.get_mut(section) {
      node.rows.push(id);
    }
    self.touch();
    Ok(id)
  }

  pub fn push_cell(&mut self, row: RowId, style: CellStyle) -> Result<CellId> {
    if !self.rows.contains(row) {
      return Err(stale("row", row).into());
    }
    let id = self.cells.insert(CellNode { style, row });
    if let Some(node) = self.rows.get_mut(row) {
      node.cells.push(id);
    }
    self.touch();
    Ok(id)
  }

  /// Removes a row and all of its cells.
  pub fn remove_row(&mut self, row: RowId) -> Result<()> {
    let node = self.rows.remove(row).ok_or_else(|| stale("row", row))?;
    for cell in node.cells {
      self.cells.remove(cell);
    }
    if let Some(section) = self.sections.get_mut(node.section) {
      section.rows.retain(|r| *r != row);
    }
    self.touch();
    Ok(())
  }

  pub fn remove_cell(&mut self, cell: CellId) -> Result<()> {
    let node = self.cells.remove(cell).ok_or_else(|| stale("cell", cell))?;
    if let Some(row) = self.rows.get_mut(node.row) {
      row.cells.retain(|c| *c != cell);
    }
    self.touch();
    Ok(())
  }

  pub fn cell_style_mut(&mut self, cell: CellId) -> Result<&mut CellStyle> {
    self.touch();
    self
      .cells
      .get_mut(cell)
      .map(|node| &mut node.style)
      .ok_or_else(|| stale("cell", cell).into())
  }

  // ---- lookup ----

  pub fn columns(&self) -> &[ColumnStyle] {
    &self.columns
  }

  /// Sections in document order.
  pub fn sections(&self) -> &[SectionId] {
    &self.section_order
  }

  pub fn section(&self, id: SectionId) -> Result<&SectionNode> {
    self
      .sections
      .get(id)
      .ok_or_else(|| stale("section", id).into())
  }

  pub fn row(&self, id: RowId) -> Result<&RowNode> {
    self.rows.get(id).ok_or_else(|| stale("row", id).into())
  }

  pub fn cell(&self, id: CellId) -> Result<&CellNode> {
    self.cells.get(id).ok_or_else(|| stale("cell", id).into())
  }

  pub fn cell_count(&self) -> usize {
    self.cells.len()
  }

  /// Verifies that `row` is a child of `section`.
  pub fn check_parent(&self, section: SectionId, row: RowId) -> Result<()> {
    if self.row(row)?.section == section {
      Ok(())
    } else {
      Err(TreeError::WrongParent { kind: "row" }.into())
    }
  }

  /// First row of the first non-empty section.
  pub fn first_row(&self) -> Option<RowId> {
    self
      .section_order
      .iter()
      .filter_map(|id| self.sections.get(*id))
      .find_map(|section| section.rows.first().copied())
  }

  /// First row of the first non-empty body section.
  pub fn first_body_row(&self) -> Option<RowId> {
    self
      .section_order
      .iter()
      .filter_map(|id| self.sections.get(*id))
      .filter(|section| section.role() == SectionRole::Body)
      .find_map(|section| section.rows.first().copied())
  }

  /// The first section, when it is a header.
  pub fn running_header(&self) -> Option<SectionId> {
    self
      .section_order
      .first()
      .copied()
      .filter(|id| self.sections.get(*id).map(SectionNode::role) == Some(SectionRole::Header))
  }

  /// The last section, when it is a footer.
  pub fn running_footer(&self) -> Option<SectionId> {
    self
      .section_order
      .last()
      .copied()
      .filter(|id| self.sections.get(*id).map(SectionNode::role) == Some(SectionRole::Footer))
  }

  /// The `<col>` element covering markup column `col`.
  pub fn col_element(&self, col: usize) -> Option<&ColumnStyle> {
    let mut covered = 0;
    for column in &self.columns {
      covered += column.span();
      if covered > col {
        return Some(column);
      }
    }
    None
  }
}
