use log::{info, warn};
use pacer_core::settings::{PersistedSettings, SettingsSink, SettingsStore};

use super::SETTINGS_SAVE_DEBOUNCE_MS;

/// Debounces settings writes: the engine reports every change, the store only sees the
/// value once it has been stable for a while.
pub(super) struct SettingsSyncState {
    last_saved: PersistedSettings,
    pending: Option<(PersistedSettings, u64)>,
    clock_ms: u64,
}

impl SettingsSyncState {
    pub(super) fn new(initial: PersistedSettings) -> Self {
        Self {
            last_saved: initial,
            pending: None,
            clock_ms: 0,
        }
    }

    /// Time used to stamp changes reported by the engine.
    pub(super) fn observe_clock(&mut self, now_ms: u64) {
        self.clock_ms = now_ms;
    }

    pub(super) fn track_current(&mut self, current: PersistedSettings, now_ms: u64) {
        if current == self.last_saved {
            self.pending = None;
            return;
        }

        match self.pending.as_mut() {
            Some((pending, changed_at_ms)) => {
                if *pending != current {
                    *pending = current;
                    *changed_at_ms = now_ms;
                }
            }
            None => {
                self.pending = Some((current, now_ms));
            }
        }
    }

    pub(super) fn flush_if_due<S: SettingsStore>(&mut self, store: Option<&mut S>, now_ms: u64)
    where
        S::Error: core::fmt::Display,
    {
        let Some((_, changed_at_ms)) = self.pending else {
            return;
        };

        if now_ms.saturating_sub(changed_at_ms) < SETTINGS_SAVE_DEBOUNCE_MS {
            return;
        }

        self.flush(store, now_ms);
    }

    /// Writes any pending change regardless of the debounce window.
    pub(super) fn flush<S: SettingsStore>(&mut self, store: Option<&mut S>, now_ms: u64)
    where
        S::Error: core::fmt::Display,
    {
        let Some((candidate, _)) = self.pending else {
            return;
        };

        match store {
            Some(store) => match store.save(&candidate) {
                Ok(()) => {
                    info!(
                        "settings saved: wpm={} paragraph_mode={}",
                        candidate.wpm, candidate.paragraph_mode
                    );
                    self.last_saved = candidate;
                    self.pending = None;
                }
                Err(err) => {
                    // Keep pending changes and retry later.
                    warn!("settings save failed: {}", err);
                    self.pending = Some((candidate, now_ms));
                }
            },
            None => {
                self.last_saved = candidate;
                self.pending = None;
            }
        }
    }

    pub(super) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl SettingsSink for SettingsSyncState {
    fn settings_changed(&mut self, settings: &PersistedSettings) {
        self.track_current(*settings, self.clock_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacer_core::settings::ParagraphMode;

    #[derive(Default)]
    struct MemoryStore {
        saved: Vec<PersistedSettings>,
        fail: bool,
    }

    impl SettingsStore for MemoryStore {
        type Error = &'static str;

        fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
            Ok(self.saved.last().copied())
        }

        fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
            if self.fail {
                return Err("disk full");
            }
            self.saved.push(*settings);
            Ok(())
        }
    }

    fn settings(wpm: u16) -> PersistedSettings {
        PersistedSettings::new(wpm, ParagraphMode::Pause)
    }

    #[test]
    fn changes_wait_for_the_debounce_window() {
        let mut sync = SettingsSyncState::new(settings(300));
        let mut store = MemoryStore::default();

        sync.observe_clock(1_000);
        sync.settings_changed(&settings(325));
        sync.flush_if_due(Some(&mut store), 1_000 + SETTINGS_SAVE_DEBOUNCE_MS - 1);
        assert!(store.saved.is_empty());

        sync.flush_if_due(Some(&mut store), 1_000 + SETTINGS_SAVE_DEBOUNCE_MS);
        assert_eq!(store.saved, vec![settings(325)]);
        assert!(!sync.has_pending());
    }

    #[test]
    fn later_changes_restart_the_window() {
        let mut sync = SettingsSyncState::new(settings(300));
        let mut store = MemoryStore::default();

        sync.track_current(settings(325), 0);
        sync.track_current(settings(350), 1_000);
        sync.flush_if_due(Some(&mut store), SETTINGS_SAVE_DEBOUNCE_MS);
        assert!(store.saved.is_empty());

        sync.flush_if_due(Some(&mut store), 1_000 + SETTINGS_SAVE_DEBOUNCE_MS);
        assert_eq!(store.saved, vec![settings(350)]);
    }

    #[test]
    fn returning_to_saved_value_drops_the_write() {
        let mut sync = SettingsSyncState::new(settings(300));
        sync.track_current(settings(325), 0);
        sync.track_current(settings(300), 10);
        assert!(!sync.has_pending());
    }

    #[test]
    fn failed_saves_stay_pending() {
        let mut sync = SettingsSyncState::new(settings(300));
        let mut store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };

        sync.track_current(settings(400), 0);
        sync.flush(Some(&mut store), 5);
        assert!(sync.has_pending());

        store.fail = false;
        sync.flush(Some(&mut store), 10);
        assert_eq!(store.saved, vec![settings(400)]);
    }

    #[test]
    fn missing_store_keeps_settings_in_memory() {
        let mut sync = SettingsSyncState::new(settings(300));
        sync.track_current(settings(400), 0);
        sync.flush::<MemoryStore>(None, 0);
        assert!(!sync.has_pending());
    }
}
