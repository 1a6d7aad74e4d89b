pub mod compiler;

pub use self::compiler::{CompileOptions, Compiled, DelayPolicy};

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::note::{Anchor, Note, NoteTime};

pub type TrackId = String;

struct Node {
  notes: Vec<Note>,
  track: TrackId,
  next: Vec<Sequence>,
  delay: NoteTime,
  anchor: Anchor,
}

/// A fragment of notes belonging to one track, followed by any number of
/// next sequences.
///
/// `Sequence` is a shared handle: clones point to the same node, and the
/// sequences chained after it see later changes to it. Equality is identity.
#[derive(Clone)]
pub struct Sequence(Arc<RwLock<Node>>);

impl Sequence {
  pub fn new<T>(notes: Vec<Note>, track: T) -> Sequence
  where
    T: Into<TrackId>,
  {
    Sequence(Arc::new(RwLock::new(Node {
      notes,
      track: track.into(),
      next: Vec::new(),
      delay: 0.0,
      anchor: Anchor::End,
    })))
  }

  /// Delay from the previous sequence, measured from its start or end
  /// depending on the anchor.
  pub fn with_delay(self, delay: NoteTime) -> Sequence {
    self.write().delay = delay;
    self
  }

  pub fn with_anchor(self, anchor: Anchor) -> Sequence {
    self.write().anchor = anchor;
    self
  }

  /// Appends `next` after this sequence and returns `next`, not `self`, so
  /// that `a.chain(&b)?.chain(&c)?` builds the chain `a -> b -> c`.
  ///
  /// Fails with `CyclicSequence` when this sequence can already be reached
  /// from `next`, leaving both untouched.
  pub fn chain(&self, next: &Sequence) -> Result<Sequence> {
    if next.reaches(self) {
      return Err(Error::CyclicSequence {
        track: next.track(),
      });
    }
    self.write().next.push(next.clone());
    Ok(next.clone())
  }

  pub fn notes(&self) -> Vec<Note> {
    self.read().notes.clone()
  }

  pub fn track(&self) -> TrackId {
    self.read().track.clone()
  }

  pub fn next(&self) -> Vec<Sequence> {
    self.read().next.clone()
  }

  pub fn delay(&self) -> NoteTime {
    self.read().delay
  }

  pub fn anchor(&self) -> Anchor {
    self.read().anchor
  }

  pub fn ptr_eq(&self, other: &Sequence) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }

  /// This sequence and every sequence reachable from it, depth first.
  pub fn walk(&self) -> Vec<Sequence> {
    let mut visited = Vec::new();
    let mut stack = vec![self.clone()];
    while let Some(sequence) = stack.pop() {
      stack.extend(sequence.next().into_iter().rev());
      visited.push(sequence);
    }
    visited
  }

  fn reaches(&self, target: &Sequence) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![self.clone()];
    while let Some(sequence) = stack.pop() {
      if sequence.ptr_eq(target) {
        return true;
      }
      if seen.insert(Arc::as_ptr(&sequence.0) as usize) {
        stack.extend(sequence.next());
      }
    }
    false
  }

  fn read(&self) -> RwLockReadGuard<'_, Node> {
    self.0.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, Node> {
    self.0.write().unwrap_or_else(PoisonError::into_inner)
  }
}

impl PartialEq for Sequence {
  fn eq(&self, other: &Sequence) -> bool {
    self.ptr_eq(other)
  }
}

impl fmt::Debug for Sequence {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let node = self.read();
    f.debug_struct("Sequence")
      .field("track", &node.track)
      .field("notes", &node.notes.len())
      .field("next", &node.next.len())
      .field("delay", &node.delay)
      .field("anchor", &node.anchor)
      .finish()
  }
}
