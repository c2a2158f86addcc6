use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use backreel_protocol::{Catalog, SeriesEntry, ViewState};
use tracing::{debug, warn};

use crate::debounce::Debouncer;
use crate::gallery::Gallery;
use crate::store::StateStore;
use crate::timeline::Timeline;

/// Hands out [`SeriesToken`]s and invalidates all previously issued ones
/// whenever a new session begins.
///
/// One guard lives for the whole process; each `begin()` bumps the shared
/// generation, so asynchronous work started for an earlier series observes
/// `is_current() == false` and discards its results instead of touching a
/// cleared view.
#[derive(Debug, Clone, Default)]
pub struct SeriesGuard {
    generation: Arc<AtomicU64>,
}

impl SeriesGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new series session, superseding every outstanding token.
    pub fn begin(&self) -> SeriesToken {
        let expected = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SeriesToken {
            generation: Arc::clone(&self.generation),
            expected,
        }
    }
}

/// A capture of the series generation at session start. Asynchronous
/// completions check it before applying anything.
#[derive(Debug, Clone)]
pub struct SeriesToken {
    generation: Arc<AtomicU64>,
    expected: u64,
}

impl SeriesToken {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.expected
    }
}

/// Resolve which series to open: the persisted selection when it names a
/// known series, otherwise the host-configured default.
pub fn resolve_series(
    store: &impl StateStore,
    available: &[SeriesEntry],
    default_id: &str,
) -> String {
    if let Some(persisted) = store.load_series()
        && available.iter().any(|s| s.id == persisted)
    {
        return persisted;
    }
    default_id.to_string()
}

/// One series browsing session: the gallery, its timeline index, the user's
/// view state, and the store they persist through.
///
/// This is the explicit session context that replaces any series-keyed
/// global caches — switching series drops the whole session and builds a
/// fresh one. All mutations go through methods that re-sequence the
/// dependent steps (visibility → rebuild → remap → persist), so the
/// timeline index is never queried stale.
pub struct SeriesSession<S: StateStore> {
    series: String,
    gallery: Gallery,
    timeline: Timeline,
    state: ViewState,
    scroll_pos: f64,
    debouncer: Debouncer,
    store: S,
}

impl<S: StateStore> SeriesSession<S> {
    /// Open a session: load persisted state, build the gallery with the
    /// hidden set already applied, index it, and derive the restored scroll
    /// position from the persisted content timestamp.
    pub fn open(series: &str, catalog: &Catalog, mut store: S) -> Self {
        let state = store.load(series);
        // First visit creates the record; later visits rewrite it unchanged.
        store.save(series, &state);
        store.save_series(series);

        let gallery = Gallery::build(catalog, &state);
        let mut timeline = Timeline::new();
        timeline.rebuild(&gallery);
        let scroll_pos = timeline.timestamp_to_position(state.scroll);
        debug!(series, scroll = state.scroll, pos = scroll_pos, "session opened");

        Self {
            series: series.to_string(),
            gallery,
            timeline,
            state,
            scroll_pos,
            debouncer: Debouncer::default(),
            store,
        }
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The pixel position the host should scroll to right now.
    pub fn scroll_pos(&self) -> f64 {
        self.scroll_pos
    }

    /// Record a scroll event. Persistence is coalesced; call [`Self::tick`]
    /// periodically (or after the quiet window) to flush.
    pub fn on_scroll(&mut self, pos: f64, now: Instant) {
        self.scroll_pos = pos;
        self.debouncer.record(pos, now);
    }

    /// Flush a coalesced scroll event once its quiet window has elapsed:
    /// convert the position to content time, update the view state, persist.
    /// Returns the persisted timestamp when a flush happened.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let pos = self.debouncer.poll(now)?;
        let ts = self.timeline.position_to_timestamp(pos);
        debug!(pos, ts, "scrolled");
        self.state.scroll = ts;
        self.store.save(&self.series, &self.state);
        Some(ts)
    }

    /// Show or hide one channel, preserving the reading position in content
    /// time across the layout shift. Returns the scroll position the host
    /// should apply.
    ///
    /// Step order matters: view mutation, hidden-set update, index rebuild,
    /// remap from the previous scroll timestamp, persist.
    pub fn toggle_channel(&mut self, channel: &str, visible: bool) -> f64 {
        if self.gallery.set_channel_visible(channel, visible).is_none() {
            warn!(channel, "toggle for unknown channel ignored");
            return self.scroll_pos;
        }
        if visible {
            self.state.show_channel(channel);
        } else {
            self.state.hide_channel(channel);
        }
        self.resync();
        self.store.save(&self.series, &self.state);
        self.scroll_pos
    }

    /// Select-all / select-none: apply every individual toggle first, then
    /// rebuild, remap and persist once.
    pub fn set_all_channels(&mut self, visible: bool) -> f64 {
        let names: Vec<String> = self
            .gallery
            .channels()
            .iter()
            .map(|c| c.channel.name.clone())
            .collect();
        for name in names {
            self.gallery.set_channel_visible(&name, visible);
            if visible {
                self.state.show_channel(&name);
            } else {
                self.state.hide_channel(&name);
            }
        }
        self.resync();
        self.store.save(&self.series, &self.state);
        self.scroll_pos
    }

    /// Re-index after the host changed item geometry (measured heights,
    /// expanded descriptions). Returns the remapped scroll position.
    pub fn relayout(&mut self) -> f64 {
        self.resync();
        self.scroll_pos
    }

    /// Rebuild the gallery from a freshly fetched catalog, preserving the
    /// hidden set and the content-time reading position.
    pub fn refresh(&mut self, catalog: &Catalog) -> f64 {
        self.gallery = Gallery::build(catalog, &self.state);
        self.resync();
        debug!(series = %self.series, items = self.gallery.len(), "catalog refreshed");
        self.scroll_pos
    }

    /// Rebuild the timeline index and remap the scroll position from the
    /// last persisted content timestamp. Always runs before the next mapper
    /// query that depends on the new layout.
    fn resync(&mut self) {
        self.timeline.rebuild(&self.gallery);
        self.scroll_pos = self.timeline.timestamp_to_position(self.state.scroll);
    }
}
