//! Two-slot snapshot store
//!
//! Holds at most the current and the previous snapshot. `install` fills
//! the current slot at the start of a cycle; `retire` moves it into the
//! previous slot at the end, dropping whatever was there.

use tracing::trace;

use crate::system::Snapshot;

#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<Snapshot>,
    previous: Option<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `snapshot` current. An unretired current snapshot is dropped.
    pub fn install(&mut self, snapshot: Snapshot) {
        if self.current.replace(snapshot).is_some() {
            trace!("replaced a current snapshot that was never retired");
        }
    }

    /// The current snapshot and, if it shares the same process/thread
    /// scope, the previous one to diff against
    pub fn pair(&self) -> Option<(&Snapshot, Option<&Snapshot>)> {
        let current = self.current.as_ref()?;
        let previous = self
            .previous
            .as_ref()
            .filter(|p| p.processes_only() == current.processes_only());
        Some((current, previous))
    }

    /// Current becomes previous; the old previous is released
    pub fn retire(&mut self) {
        if let Some(current) = self.current.take() {
            let interval = self
                .previous
                .as_ref()
                .and_then(|p| current.taken_at().checked_duration_since(p.taken_at()));
            let released = self.previous.replace(current);
            trace!(?interval, released = released.map(|s| s.len()), "retired snapshot");
        }
    }

    /// Number of snapshots currently held (never more than two)
    pub fn live(&self) -> usize {
        usize::from(self.current.is_some()) + usize::from(self.previous.is_some())
    }

    #[cfg(test)]
    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }
}
