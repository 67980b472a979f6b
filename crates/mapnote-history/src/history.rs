//! Linear undo/redo history.

use mapnote_model::Snapshot;

/// An ordered list of snapshots with a cursor on the current one.
///
/// Never empty. Pushing after an undo discards the undone snapshots, so the
/// history stays linear. Snapshots share structure, so keeping many of them
/// costs little more than the differences between them.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    /// A history holding only `initial`.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    /// Make `snapshot` current, dropping everything after the cursor.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor += 1;
    }

    /// Step back one snapshot. Returns false at the oldest one.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one snapshot. Returns false at the newest one.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Forget everything and start over from `snapshot`.
    pub fn reset_to(&mut self, snapshot: Snapshot) {
        self.snapshots.clear();
        self.snapshots.push(snapshot);
        self.cursor = 0;
    }

    /// Number of snapshots held, including undone ones.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// A history is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Snapshot::empty())
    }
}
