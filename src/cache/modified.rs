//! Global modification clock.
//!
//! Content changes advance one timestamp that every cache entry must be
//! newer than. Only the first qualifying event of a session writes it;
//! later events collapse into that single invalidation point.

use std::sync::atomic::{AtomicBool, Ordering};

use super::store::{CacheError, CacheStore};

/// Option key the settings collaborator stores this tool's options under.
pub const OPTION_KEY: &str = "shareable_options";

/// A content-changed signal from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    SavePost,
    EditTerms,
    ProfileUpdate,
    /// Any option update, carrying the option name.
    UpdatedOption(String),
}

impl ChangeEvent {
    /// Parse the CLI / host event name.
    pub fn parse(name: &str, option: Option<&str>) -> Option<Self> {
        match name {
            "save_post" => Some(Self::SavePost),
            "edit_terms" => Some(Self::EditTerms),
            "profile_update" => Some(Self::ProfileUpdate),
            "updated_option" => Some(Self::UpdatedOption(option.unwrap_or_default().to_string())),
            _ => None,
        }
    }

    /// Whether the event invalidates cached output.
    ///
    /// Updates to this tool's own options do not count, since recording the
    /// timestamp is itself an option update.
    pub fn qualifies(&self) -> bool {
        match self {
            Self::UpdatedOption(key) => key != OPTION_KEY,
            _ => true,
        }
    }
}

/// Once-per-session writer of the global modification timestamp.
#[derive(Debug, Default)]
pub struct ModificationClock {
    fired: AtomicBool,
}

impl ModificationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event` at `now`. Returns whether the timestamp was written.
    pub fn record(
        &self,
        store: &dyn CacheStore,
        event: &ChangeEvent,
        now: u64,
    ) -> Result<bool, CacheError> {
        if !event.qualifies() {
            return Ok(false);
        }
        if self
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(false);
        }
        if let Err(err) = store.set_time_modified(now) {
            self.fired.store(false, Ordering::Release);
            return Err(err);
        }
        crate::debug!("cache"; "content modified at {}", now);
        Ok(true)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;

    #[test]
    fn test_first_event_wins() {
        let store = MemoryStore::new();
        let clock = ModificationClock::new();
        assert!(clock.record(&store, &ChangeEvent::SavePost, 100).unwrap());
        assert!(!clock.record(&store, &ChangeEvent::EditTerms, 200).unwrap());
        assert_eq!(store.time_modified().unwrap(), 100);
        assert!(clock.has_fired());
    }

    #[test]
    fn test_failed_write_keeps_clock_armed() {
        use crate::cache::FileStore;
        use std::fs;

        let dir = tempfile::TempDir::new().unwrap();
        let blocked = dir.path().join("cache");
        fs::write(&blocked, "").unwrap();
        let store = FileStore::new(&blocked);
        let clock = ModificationClock::new();

        assert!(clock.record(&store, &ChangeEvent::SavePost, 100).is_err());
        assert!(!clock.has_fired());

        fs::remove_file(&blocked).unwrap();
        assert!(clock.record(&store, &ChangeEvent::SavePost, 200).unwrap());
        assert_eq!(store.time_modified().unwrap(), 200);
    }

    #[test]
    fn test_own_option_update_is_ignored() {
        let store = MemoryStore::new();
        let clock = ModificationClock::new();
        let own = ChangeEvent::UpdatedOption(OPTION_KEY.into());
        assert!(!clock.record(&store, &own, 100).unwrap());
        assert!(!clock.has_fired());

        let other = ChangeEvent::UpdatedOption("blogname".into());
        assert!(clock.record(&store, &other, 150).unwrap());
        assert_eq!(store.time_modified().unwrap(), 150);
    }

    #[test]
    fn test_parse_event_names() {
        assert_eq!(ChangeEvent::parse("save_post", None), Some(ChangeEvent::SavePost));
        assert_eq!(
            ChangeEvent::parse("updated_option", Some("blogname")),
            Some(ChangeEvent::UpdatedOption("blogname".into()))
        );
        assert_eq!(ChangeEvent::parse("delete_post", None), None);
    }
}
