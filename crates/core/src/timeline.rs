use serde::{Deserialize, Serialize};

/// One (timestamp, vertical offset) pair for a currently visible item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Content timestamp, seconds since the UTC epoch. Fractional values
    /// appear once positions are interpolated between items.
    pub ts: f64,
    /// Vertical offset relative to the top of the scroll container.
    pub pos: f64,
}

/// Capability: the current layout, as seen by whoever owns the rendered
/// elements.
///
/// Keeping layout behind this trait keeps the mapping algorithm pure and
/// testable against synthetic geometries — the index never reads the view
/// directly.
pub trait LayoutProvider {
    /// `(timestamp, offset)` of every currently visible item, in render
    /// order. Hidden items are excluded entirely.
    fn visible_offsets(&self) -> Vec<(f64, f64)>;
}

/// The scroll-position ⇄ content-timestamp index.
///
/// An ordered sequence of [`TimelinePoint`]s, one per visible item, ascending
/// in both offset and timestamp (chronological render order, top-to-bottom
/// hiding). The index is rebuilt wholesale on every visibility or layout
/// change — hiding an item shifts every subsequent offset, so there is no
/// cheaper correct incremental update. Querying a stale index is a
/// correctness bug, not a performance one.
///
/// ```text
///   Gallery ──▶ rebuild() ──▶ [ (ts₀,pos₀), (ts₁,pos₁), … ]
///                                   │
///              position_to_timestamp ┼ timestamp_to_position
///                                   ▼
///                      piecewise-linear interpolation
/// ```
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    points: Vec<TimelinePoint>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the index from the current layout. Must run after every
    /// layout-affecting mutation and before the next mapping query.
    pub fn rebuild(&mut self, provider: &dyn LayoutProvider) {
        self.points.clear();
        for (ts, pos) in provider.visible_offsets() {
            self.points.push(TimelinePoint { ts, pos });
        }
        tracing::debug!(points = self.points.len(), "timeline rebuilt");
    }

    pub fn points(&self) -> &[TimelinePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Map a scroll position to a content timestamp.
    ///
    /// At or above the top of the feed (or with an empty index) this is 0.
    /// Below the last visible item it clamps to the last item's timestamp.
    /// In between, it interpolates linearly between the surrounding points;
    /// a position above the first point maps to 0 (there is nothing to
    /// interpolate against below the first visible item).
    pub fn position_to_timestamp(&self, pos: f64) -> f64 {
        if pos <= 0.0 || self.points.is_empty() {
            return 0.0;
        }
        for (i, cur) in self.points.iter().enumerate() {
            if cur.pos < pos {
                continue;
            }
            if i == 0 {
                return 0.0;
            }
            let prev = self.points[i - 1];
            let span = cur.pos - prev.pos;
            if span <= 0.0 {
                // Tied offsets: the first matching point wins.
                return cur.ts;
            }
            let frac = (pos - prev.pos) / span;
            return prev.ts + frac * (cur.ts - prev.ts);
        }
        self.points[self.points.len() - 1].ts
    }

    /// Map a content timestamp back to a scroll position — the inverse
    /// search and interpolation, with the same edge rules (before the first
    /// point → 0, past the last → the last point's offset).
    pub fn timestamp_to_position(&self, ts: f64) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        for (i, cur) in self.points.iter().enumerate() {
            if cur.ts < ts {
                continue;
            }
            if i == 0 {
                return 0.0;
            }
            let prev = self.points[i - 1];
            let span = cur.ts - prev.ts;
            if span <= 0.0 {
                return cur.pos;
            }
            let frac = (ts - prev.ts) / span;
            return prev.pos + frac * (cur.pos - prev.pos);
        }
        self.points[self.points.len() - 1].pos
    }
}
