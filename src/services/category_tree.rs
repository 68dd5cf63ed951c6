//! In-memory snapshot of the category table.
//!
//! Categories form a self-referencing hierarchy guarded only by
//! application-level checks, so every re-parenting operation runs an
//! explicit cycle-detection pass over a flat arena (id-indexed nodes with
//! the parent stored as an optional reference). All walks are bounded by
//! the node count and terminate even if the stored data is corrupt.

use crate::models::Category;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Maximum number of nesting levels (a root chain of 5 categories).
pub const MAX_DEPTH: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
  #[error("Category not found in hierarchy")]
  UnknownCategory,
  #[error("Parent category not found in hierarchy")]
  UnknownParent,
  #[error("Category cannot be its own parent")]
  SelfParent,
  #[error("Cannot move category: would create circular reference")]
  WouldCreateCycle,
  #[error("Cannot move category: maximum nesting depth exceeded")]
  TooDeep,
}

#[derive(Debug, Clone)]
struct Node {
  id: Uuid,
  parent_id: Option<Uuid>,
  name: String,
  sort_order: i32,
  is_active: bool,
}

#[derive(Debug, Default)]
pub struct CategoryTree {
  nodes: Vec<Node>,
  index: HashMap<Uuid, usize>,
}

impl CategoryTree {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_categories(categories: &[Category]) -> Self {
    let mut tree = Self::new();
    for c in categories {
      tree.push(c.id, c.parent_id, &c.name, c.sort_order, c.is_active);
    }
    tree
  }

  pub fn push(&mut self, id: Uuid, parent_id: Option<Uuid>, name: &str, sort_order: i32, is_active: bool) {
    self.index.insert(id, self.nodes.len());
    self.nodes.push(Node {
      id,
      parent_id,
      name: name.to_string(),
      sort_order,
      is_active,
    });
  }

  pub fn contains(&self, id: Uuid) -> bool {
    self.index.contains_key(&id)
  }

  /// Ancestors from the immediate parent up to the root. The walk visits at
  /// most `nodes.len()` links, so it terminates even on a corrupt cycle.
  pub fn ancestors(&self, id: Uuid) -> Vec<Uuid> {
    let mut out = Vec::new();
    let mut current = self.index.get(&id).and_then(|&i| self.nodes[i].parent_id);
    while let Some(parent) = current {
      if out.len() >= self.nodes.len() || out.contains(&parent) {
        break;
      }
      out.push(parent);
      current = self.index.get(&parent).and_then(|&i| self.nodes[i].parent_id);
    }
    out
  }

  /// Nesting level: 0 for roots, 1 for their children, and so on.
  pub fn depth(&self, id: Uuid) -> usize {
    self.ancestors(id).len()
  }

  /// Active children ordered by (sort_order, name).
  pub fn children(&self, id: Uuid) -> Vec<Uuid> {
    let mut kids: Vec<&Node> = self
      .nodes
      .iter()
      .filter(|n| n.is_active && n.parent_id == Some(id))
      .collect();
    kids.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
    kids.iter().map(|n| n.id).collect()
  }

  /// Active roots ordered by (sort_order, name).
  pub fn roots(&self) -> Vec<Uuid> {
    let mut roots: Vec<&Node> = self.nodes.iter().filter(|n| n.is_active && n.parent_id.is_none()).collect();
    roots.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
    roots.iter().map(|n| n.id).collect()
  }

  /// All active descendants, depth-first, siblings in display order. Each
  /// node is emitted at most once, bounding the traversal on corrupt data.
  pub fn descendants(&self, id: Uuid) -> Vec<Uuid> {
    let mut out = Vec::new();
    let mut stack: Vec<Uuid> = self.children(id).into_iter().rev().collect();
    while let Some(next) = stack.pop() {
      if out.contains(&next) {
        continue;
      }
      out.push(next);
      for child in self.children(next).into_iter().rev() {
        stack.push(child);
      }
    }
    out
  }

  /// Height of the subtree rooted at `id`: 0 for a leaf.
  fn subtree_height(&self, id: Uuid) -> usize {
    self
      .descendants(id)
      .iter()
      .map(|&d| self.depth(d).saturating_sub(self.depth(id)))
      .max()
      .unwrap_or(0)
  }

  /// Validates re-parenting `id` under `new_parent` (None moves it to the
  /// root): the target must exist, must not be `id` itself or one of its
  /// descendants, and the relocated subtree must still fit within
  /// [`MAX_DEPTH`] levels.
  pub fn check_move(&self, id: Uuid, new_parent: Option<Uuid>) -> Result<(), MoveError> {
    if !self.contains(id) {
      return Err(MoveError::UnknownCategory);
    }
    let parent = match new_parent {
      None => return Ok(()), // Moving to root is always shallow enough.
      Some(p) => p,
    };
    if !self.contains(parent) {
      return Err(MoveError::UnknownParent);
    }
    if parent == id {
      return Err(MoveError::SelfParent);
    }
    if self.ancestors(parent).contains(&id) {
      return Err(MoveError::WouldCreateCycle);
    }
    let new_level = self.depth(parent) + 1;
    if new_level + self.subtree_height(id) > MAX_DEPTH - 1 {
      return Err(MoveError::TooDeep);
    }
    Ok(())
  }

  /// Validates choosing `parent` for a brand-new leaf category.
  pub fn check_new_child(&self, parent: Uuid) -> Result<(), MoveError> {
    if !self.contains(parent) {
      return Err(MoveError::UnknownParent);
    }
    if self.depth(parent) + 1 > MAX_DEPTH - 1 {
      return Err(MoveError::TooDeep);
    }
    Ok(())
  }
}
