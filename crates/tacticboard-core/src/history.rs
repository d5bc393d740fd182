//! Undo/redo for committed line annotations.
//!
//! The committed stack mirrors the diagram's line sequence: replaying it in
//! order yields exactly `Diagram::lines()`. Committing a new line throws away
//! anything that was undone.

use crate::diagram::{Diagram, LineAnnotation};
use thiserror::Error;

/// Expected boundary conditions of the history stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Manages the committed and undone line stacks.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Lines in the order they entered the diagram.
    committed: Vec<LineAnnotation>,
    /// Lines taken back by undo, most recent last.
    undone: Vec<LineAnnotation>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished line to the diagram and record it.
    pub fn commit(&mut self, diagram: &mut Diagram, line: LineAnnotation) {
        log::debug!("Committing line {} (dashed: {})", line.id(), line.dashed);
        diagram.append_line(line.clone());
        self.committed.push(line);
        self.undone.clear();
    }

    /// Take back the most recent line.
    pub fn undo(&mut self, diagram: &mut Diagram) -> Result<LineAnnotation, HistoryError> {
        let line = self.committed.pop().ok_or(HistoryError::NothingToUndo)?;
        let removed = diagram.remove_last_line();
        debug_assert_eq!(removed.as_ref().map(|l| l.id()), Some(line.id()));
        log::debug!("Undo line {}", line.id());
        self.undone.push(line.clone());
        Ok(line)
    }

    /// Re-apply the most recently undone line.
    pub fn redo(&mut self, diagram: &mut Diagram) -> Result<LineAnnotation, HistoryError> {
        let line = self.undone.pop().ok_or(HistoryError::NothingToRedo)?;
        log::debug!("Redo line {}", line.id());
        diagram.append_line(line.clone());
        self.committed.push(line.clone());
        Ok(line)
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.committed.len()
    }

    pub fn redo_count(&self) -> usize {
        self.undone.len()
    }

    /// Drop both stacks. Pair with a diagram reset or load.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.undone.clear();
    }
}
