//! Client-local persistence for view state.
//!
//! Two logical keys, mirroring the browser-storage layout the engine was
//! designed around: `series` (the currently selected series id) and `state`
//! (series id → [`ViewState`]), each a JSON document. [`FileStore`] keeps
//! them as files in one directory; [`MemoryStore`] backs tests.
//!
//! Nothing here returns an error: corrupt or unavailable storage degrades to
//! defaults on read and to a logged no-op on write, per the store contract.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use backreel_core::store::StateStore;
use backreel_protocol::{StateMap, ViewState};
use tracing::{debug, warn};

const STATE_FILE: &str = "state.json";
const SERIES_FILE: &str = "series.json";

/// JSON-file-backed [`StateStore`].
///
/// The whole `state` document is read and rewritten per operation — the
/// payload is a handful of small records per series, and whole-document
/// writes keep the on-disk shape identical to what the original client kept
/// in a single storage key.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created lazily on the first
    /// write; a missing directory on read is just the empty store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    fn read_state_map(&self) -> StateMap {
        read_json(&self.state_path()).unwrap_or_default()
    }

    fn write_json(&self, path: &Path, value: &impl serde::Serialize) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), error = %e, "state write skipped");
            return;
        }
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "state serialization failed");
                return;
            }
        };
        if let Err(e) = fs::write(path, json) {
            warn!(path = %path.display(), error = %e, "state write skipped");
        }
    }
}

/// Read and parse a JSON file, logging (not propagating) any failure.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "state read failed, using defaults");
            }
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt state, using defaults");
            None
        }
    }
}

impl StateStore for FileStore {
    fn load(&self, series: &str) -> ViewState {
        self.read_state_map()
            .get(series)
            .cloned()
            .unwrap_or_default()
    }

    fn save(&mut self, series: &str, state: &ViewState) {
        let mut map = self.read_state_map();
        map.insert(series.to_string(), state.clone());
        self.write_json(&self.state_path(), &map);
        debug!(series, "state saved");
    }

    fn load_series(&self) -> Option<String> {
        read_json(&self.dir.join(SERIES_FILE))
    }

    fn save_series(&mut self, series: &str) {
        self.write_json(&self.dir.join(SERIES_FILE), &series);
    }
}

/// In-memory [`StateStore`] for tests and embedding hosts that bring their
/// own persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    states: HashMap<String, ViewState>,
    series: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, series: &str) -> ViewState {
        self.states.get(series).cloned().unwrap_or_default()
    }

    fn save(&mut self, series: &str, state: &ViewState) {
        self.states.insert(series.to_string(), state.clone());
    }

    fn load_series(&self) -> Option<String> {
        self.series.clone()
    }

    fn save_series(&mut self, series: &str) {
        self.series = Some(series.to_string());
    }
}
