//! Generation-checked node storage
//!
//! Table boxes refer to each other (cell to row, row to section) through
//! typed handles instead of back-pointers. A handle stays valid until its node
//! is removed; after that the slot's generation moves on and the old handle
//! is rejected even if the slot is reused.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Typed handle into an [`Arena`].
pub struct Id<T> {
  index: u32,
  generation: u32,
  _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
  fn new(index: u32, generation: u32) -> Self {
    Self {
      index,
      generation,
      _marker: PhantomData,
    }
  }

  /// Slot index; stable for the lifetime of the node.
  pub fn index(self) -> usize {
    self.index as usize
  }

  pub fn generation(self) -> u32 {
    self.generation
  }
}

impl<T> Clone for Id<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
  fn eq(&self, other: &Self) -> bool {
    self.index == other.index && self.generation == other.generation
  }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.index.hash(state);
    self.generation.hash(state);
  }
}

impl<T> PartialOrd for Id<T> {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl<T> Ord for Id<T> {
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    (self.index, self.generation).cmp(&(other.index, other.generation))
  }
}

impl<T> fmt::Debug for Id<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}v{}", self.index, self.generation)
  }
}

impl<T> Serialize for Id<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    (self.index, self.generation).serialize(serializer)
  }
}

struct Slot<T> {
  generation: u32,
  value: Option<T>,
}

/// Slot storage with generation-checked handles.
pub struct Arena<T> {
  slots: Vec<Slot<T>>,
  free: Vec<u32>,
  len: usize,
}

impl<T> Default for Arena<T> {
  fn default() -> Self {
    Self {
      slots: Vec::new(),
      free: Vec::new(),
      len: 0,
    }
  }
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}

impl<T: Clone> Clone for Arena<T> {
  fn clone(&self) -> Self {
    Self {
      slots: self
        .slots
        .iter()
        .map(|slot| Slot {
          generation: slot.generation,
          value: slot.value.clone(),
        })
        .collect(),
      free: self.free.clone(),
      len: self.len,
    }
  }
}

impl<T> Arena<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn insert(&mut self, value: T) -> Id<T> {
    self.len += 1;
    if let Some(index) = self.free.pop() {
      let slot = &mut self.slots[index as usize];
      slot.value = Some(value);
      return Id::new(index, slot.generation);
    }
    let index = self.slots.len() as u32;
    self.slots.push(Slot {
      generation: 0,
      value: Some(value),
    });
    Id::new(index, 0)
  }

  /// Removes the node and retires its handle.
  pub fn remove(&mut self, id: Id<T>) -> Option<T> {
    let slot = self.slots.get_mut(id.index())?;
    if slot.generation != id.generation {
      return None;
    }
    let value = slot.value.take()?;
    slot.generation = slot.generation.wrapping_add(1);
    self.free.push(id.index);
    self.len -= 1;
    Some(value)
  }

  pub fn contains(&self, id: Id<T>) -> bool {
    self.get(id).is_some()
  }

  pub fn get(&self, id: Id<T>) -> Option<&T> {
    self
      .slots
      .get(id.index())
      .filter(|slot| slot.generation == id.generation)
      .and_then(|slot| slot.value.as_ref())
  }

  pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
    self
      .slots
      .get_mut(id.index())
      .filter(|slot| slot.generation == id.generation)
      .and_then(|slot| slot.value.as_mut())
  }

  /// Live nodes in slot order.
  pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
    self.slots.iter().enumerate().filter_map(|(index, slot)| {
      slot
        .value
        .as_ref()
        .map(|value| (Id::new(index as u32, slot.generation), value))
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn removed_handles_go_stale() {
    let mut arena = Arena::new();
    let a = arena.insert("a");
    assert_eq!(arena.remove(a), Some("a"));
    let b = arena.insert("b");
    assert_eq!(a.index(), b.index());
    assert_ne!(a, b);
    assert!(arena.get(a).is_none());
    assert_eq!(arena.get(b), Some(&"b"));
    assert_eq!(arena.remove(a), None);
    assert_eq!(arena.len(), 1);
  }

  #[test]
  fn iter_skips_holes() {
    let mut arena = Arena::new();
    let ids: Vec<_> = (0..4).map(|i| arena.insert(i)).collect();
    arena.remove(ids[1]);
    let values: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec![0, 2, 3]);
  }
}
