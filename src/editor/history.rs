//! Snapshot history for the image editor.
//!
//! Each entry is a full JSON snapshot of the drawing surface. The step pointer
//! marks the snapshot currently shown; undo and redo move the pointer and hand
//! back the snapshot to load.

/// Bounded list of surface snapshots with an undo/redo pointer.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<String>,
    step: usize,
    limit: usize,
}

impl History {
    /// Create an empty history keeping at most `limit` snapshots.
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            step: 0,
            limit: limit.max(1),
        }
    }

    /// Record a new snapshot after the current step.
    ///
    /// Anything that could have been redone is discarded. When the limit is
    /// exceeded the oldest snapshots go first.
    pub fn record(&mut self, snapshot: String) {
        if !self.snapshots.is_empty() && self.step + 1 < self.snapshots.len() {
            let dropped = self.snapshots.len() - self.step - 1;
            self.snapshots.truncate(self.step + 1);
            log::debug!("📝 History: discarded {} redo step(s)", dropped);
        }
        self.snapshots.push(snapshot);

        if self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.step = self.snapshots.len() - 1;
    }

    /// Step back and return the snapshot to load.
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.step -= 1;
        log::debug!("⏪ History: step {}/{}", self.step + 1, self.snapshots.len());
        self.snapshots.get(self.step).map(String::as_str)
    }

    /// Step forward and return the snapshot to load.
    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.step += 1;
        log::debug!("⏩ History: step {}/{}", self.step + 1, self.snapshots.len());
        self.snapshots.get(self.step).map(String::as_str)
    }

    /// Whether there is an earlier snapshot.
    pub fn can_undo(&self) -> bool {
        self.step > 0
    }

    /// Whether there is a later snapshot.
    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.snapshots.len()
    }

    /// Snapshot currently shown.
    pub fn current(&self) -> Option<&str> {
        self.snapshots.get(self.step).map(String::as_str)
    }

    /// Number of snapshots kept.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.step = 0;
        log::debug!("🗑️ History cleared");
    }
}
