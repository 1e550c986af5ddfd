//! Append-only narration ledger with per-viewer filtering.
//!
//! Entries are never edited or removed. Scoped entries are only surfaced to
//! viewers named in their scope; [`Ledger::history_for`] is the only view
//! that should be used to build context for a player's decision.

use crate::log::{LogEntry, Narration};
use crate::types::{Phase, PlayerId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Who is reading the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    /// Unscoped entries only.
    Public,
    /// Unscoped entries plus entries scoped to this player.
    Player(PlayerId),
    /// Every entry (spectator / debugging view).
    Omniscient,
}

/// Ordered, append-only store of log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<LogEntry>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a narration stamped with the given phase and day.
    ///
    /// Returns the sequence number of the new entry.
    #[instrument(skip(self, narration), fields(kind = %narration.kind, speaker = narration.speaker.id()))]
    pub fn append(&mut self, phase: Phase, day: u32, narration: Narration) -> u64 {
        let seq = self.entries.len() as u64;
        debug!(seq, public = narration.visibility.is_public(), "Appending log entry");
        self.entries.push(LogEntry::stamp(seq, phase, day, narration));
        seq
    }

    /// Returns every entry, regardless of scope.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the most recent entry.
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Iterates over the entries a viewer may read, in order.
    pub fn view<'a>(&'a self, viewer: &'a Viewer) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries.iter().filter(move |entry| match viewer {
            Viewer::Public => entry.visibility().is_public(),
            Viewer::Player(id) => entry.is_visible_to(id),
            Viewer::Omniscient => true,
        })
    }

    /// Returns an owned copy of the history `id` may see.
    pub fn history_for(&self, id: &PlayerId) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.is_visible_to(id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogKind, Visibility};

    fn seeded() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.append(Phase::Setup, 1, Narration::system("start"));
        ledger.append(
            Phase::NightAction,
            1,
            Narration::action("seer".into(), "mira is human")
                .visible_to(Visibility::only("seer".into())),
        );
        ledger.append(Phase::DayDiscussion, 2, Narration::chat("ann".into(), "hello"));
        ledger
    }

    #[test]
    fn test_sequence_numbers_follow_position() {
        let ledger = seeded();
        let seqs: Vec<u64> = ledger.entries().iter().map(|e| *e.seq()).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_scoped_entry_hidden_from_others() {
        let ledger = seeded();
        let other = PlayerId::from("ann");
        let history = ledger.history_for(&other);
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.visibility().is_public()));

        let viewer = Viewer::Player(other);
        assert_eq!(ledger.view(&viewer).count(), 2);
    }

    #[test]
    fn test_scoped_entry_visible_to_owner() {
        let ledger = seeded();
        let seer = PlayerId::from("seer");
        let history = ledger.history_for(&seer);
        assert_eq!(history.len(), 3);
        assert_eq!(*history[1].kind(), LogKind::Action);
    }

    #[test]
    fn test_public_and_omniscient_views() {
        let ledger = seeded();
        assert_eq!(ledger.view(&Viewer::Public).count(), 2);
        assert_eq!(ledger.view(&Viewer::Omniscient).count(), 3);
    }
}
