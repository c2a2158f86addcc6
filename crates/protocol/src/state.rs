use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Per-series user preferences, persisted across process restarts.
///
/// `channels` is the *hidden* set — a channel absent from it is visible.
/// `scroll` is the reading position expressed in content time (a possibly
/// fractional UTC-epoch timestamp produced by the position mapper), not in
/// pixels, so it survives layout changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Names of channels the user has hidden.
    #[serde(default)]
    pub channels: BTreeSet<String>,
    /// Last known reading position as a content timestamp.
    #[serde(default)]
    pub scroll: f64,
}

impl ViewState {
    /// Mark a channel hidden. Returns false if it was already hidden.
    pub fn hide_channel(&mut self, name: &str) -> bool {
        self.channels.insert(name.to_string())
    }

    /// Unmark a hidden channel. Returns false if it was not hidden.
    pub fn show_channel(&mut self, name: &str) -> bool {
        self.channels.remove(name)
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.channels.contains(name)
    }
}

/// The persisted `state` document: series id → view state.
///
/// Each series has an independently keyed record; mutating one never
/// disturbs another.
pub type StateMap = BTreeMap<String, ViewState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_and_at_top() {
        let state = ViewState::default();
        assert!(state.channels.is_empty());
        assert_eq!(state.scroll, 0.0);
    }

    #[test]
    fn hide_show_are_idempotent() {
        let mut state = ViewState::default();
        assert!(state.hide_channel("grian"));
        assert!(!state.hide_channel("grian"));
        assert!(state.is_hidden("grian"));
        assert!(state.show_channel("grian"));
        assert!(!state.show_channel("grian"));
        assert!(!state.is_hidden("grian"));
    }

    #[test]
    fn round_trips_through_json() {
        let mut map = StateMap::new();
        let mut state = ViewState::default();
        state.hide_channel("scar");
        state.scroll = 1_600_000_123.5;
        map.insert("hc7".to_string(), state);

        let json = serde_json::to_string(&map).unwrap();
        let back: StateMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn tolerates_missing_fields() {
        // Older persisted payloads may omit either key.
        let state: ViewState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, ViewState::default());
    }
}
