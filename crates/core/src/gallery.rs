use std::collections::HashMap;

use backreel_protocol::{Catalog, Channel, ViewState};
use chrono::{DateTime, Datelike};
use tracing::{error, warn};

use crate::timeline::LayoutProvider;

/// Item height the host renderer gets until it reports a measured one.
pub const DEFAULT_ITEM_HEIGHT: f64 = 230.0;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A channel plus its derived visibility flag.
#[derive(Debug, Clone)]
pub struct ChannelState {
    pub channel: Channel,
    /// Position in the catalog's channel list (legacy index key).
    pub index: usize,
    /// True unless the user has hidden the channel.
    pub active: bool,
}

/// One rendered video item.
///
/// Immutable after build except for `visible`, `height` (owned by the host
/// renderer) and the at-most-once attached `description`.
#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub id: String,
    /// Publish timestamp, seconds since the UTC epoch.
    pub ts: f64,
    pub title: String,
    pub channel_name: String,
    pub channel_index: usize,
    pub visible: bool,
    /// Rendered height in pixels, reported by the host renderer.
    pub height: f64,
    pub description: Option<String>,
}

/// Sink for asynchronously loaded description payloads.
///
/// Applying a chunk means resolving each video id through this trait.
/// Unknown ids are logged and skipped — the item was never rendered (stale
/// upstream data), not a retryable condition.
pub trait DescriptionSink {
    fn apply_description(&mut self, video_id: &str, text: &str);
}

/// The rendered item list for one series — the model half of the gallery
/// renderer boundary.
///
/// Owns the items and channel states the other components reference by
/// identifier. Lookup tables are scoped to this instance and die with it;
/// switching series replaces the whole gallery rather than clearing caches
/// field by field.
#[derive(Debug, Clone)]
pub struct Gallery {
    items: Vec<GalleryItem>,
    item_by_id: HashMap<String, usize>,
    channels: Vec<ChannelState>,
    channel_by_name: HashMap<String, usize>,
}

impl Gallery {
    /// Build the item list from a catalog and the persisted hidden set.
    ///
    /// Items keep catalog order (chronological). A video referencing an
    /// unknown channel is logged and skipped; it is never fatal.
    pub fn build(catalog: &Catalog, state: &ViewState) -> Self {
        let mut channels = Vec::with_capacity(catalog.channels.len());
        let mut channel_by_name = HashMap::with_capacity(catalog.channels.len());
        for (index, channel) in catalog.channels.iter().enumerate() {
            channel_by_name.insert(channel.name.clone(), index);
            channels.push(ChannelState {
                active: !state.is_hidden(&channel.name),
                channel: channel.clone(),
                index,
            });
        }

        let mut items = Vec::with_capacity(catalog.videos.len());
        let mut item_by_id = HashMap::with_capacity(catalog.videos.len());
        for video in &catalog.videos {
            let Some(ch) = channels.get(video.channel) else {
                error!(video = %video.id, channel = video.channel, "channel not found");
                continue;
            };
            item_by_id.insert(video.id.clone(), items.len());
            items.push(GalleryItem {
                id: video.id.clone(),
                ts: video.published_at as f64,
                title: video.title.clone(),
                channel_name: ch.channel.name.clone(),
                channel_index: ch.index,
                visible: ch.active,
                height: DEFAULT_ITEM_HEIGHT,
                description: video.description.clone(),
            });
        }

        Self {
            items,
            item_by_id,
            channels,
            channel_by_name,
        }
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn item(&self, video_id: &str) -> Option<&GalleryItem> {
        self.item_by_id.get(video_id).map(|&i| &self.items[i])
    }

    pub fn channels(&self) -> &[ChannelState] {
        &self.channels
    }

    pub fn channel_by_name(&self, name: &str) -> Option<&ChannelState> {
        self.channel_by_name.get(name).map(|&i| &self.channels[i])
    }

    pub fn channel_by_index(&self, index: usize) -> Option<&ChannelState> {
        self.channels.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.items.iter().filter(|i| i.visible).count()
    }

    /// Show or hide every item belonging to `channel`. Returns the number of
    /// items affected, or `None` for an unknown channel.
    pub fn set_channel_visible(&mut self, channel: &str, visible: bool) -> Option<usize> {
        let &index = self.channel_by_name.get(channel)?;
        self.channels[index].active = visible;
        let mut affected = 0;
        for item in &mut self.items {
            if item.channel_index == index {
                item.visible = visible;
                affected += 1;
            }
        }
        Some(affected)
    }

    /// Record the measured height of a rendered item. Returns false for an
    /// unknown id.
    pub fn set_item_height(&mut self, video_id: &str, height: f64) -> bool {
        match self.item_by_id.get(video_id) {
            Some(&i) => {
                self.items[i].height = height;
                true
            }
            None => false,
        }
    }

    /// The next visible item after `video_id` in render order.
    pub fn next_visible_after(&self, video_id: &str) -> Option<&GalleryItem> {
        let &start = self.item_by_id.get(video_id)?;
        self.items[start + 1..].iter().find(|i| i.visible)
    }

    /// The previous visible item before `video_id` in render order.
    pub fn prev_visible_before(&self, video_id: &str) -> Option<&GalleryItem> {
        let &start = self.item_by_id.get(video_id)?;
        self.items[..start].iter().rev().find(|i| i.visible)
    }

    /// Month-year heading labels in render order, each paired with the index
    /// of the first item under it. A heading appears once, when the
    /// month-year changes relative to the previous item.
    pub fn date_headings(&self) -> Vec<(String, usize)> {
        let mut headings: Vec<(String, usize)> = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let label = date_heading(item.ts as i64);
            if headings.last().map(|(l, _)| l.as_str()) != Some(label.as_str()) {
                headings.push((label, i));
            }
        }
        headings
    }
}

/// "January 2021"-style heading for an epoch-seconds timestamp.
pub fn date_heading(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => format!("{} {}", MONTHS[dt.month0() as usize], dt.year()),
        None => String::new(),
    }
}

impl LayoutProvider for Gallery {
    /// Offsets are prefix sums of visible item heights — the synthetic stand
    /// in for what a real renderer would measure off the layout.
    fn visible_offsets(&self) -> Vec<(f64, f64)> {
        let mut out = Vec::with_capacity(self.items.len());
        let mut y = 0.0;
        for item in &self.items {
            if !item.visible {
                continue;
            }
            out.push((item.ts, y));
            y += item.height;
        }
        out
    }
}

impl DescriptionSink for Gallery {
    fn apply_description(&mut self, video_id: &str, text: &str) {
        let Some(&i) = self.item_by_id.get(video_id) else {
            error!(video = %video_id, "unrecognized video id in description chunk");
            return;
        };
        let item = &mut self.items[i];
        if item.description.is_some() {
            // Duplicate data upstream — last write wins.
            warn!(video = %video_id, "description already attached, replacing");
        }
        item.description = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backreel_protocol::Catalog;

    fn catalog() -> Catalog {
        serde_json::from_str(
            r#"{
                "channels": [
                    {"name": "grian", "id": "UC1", "t": "Grian", "thumb": ""},
                    {"name": "scar", "id": "UC2", "t": "GoodTimesWithScar", "thumb": ""}
                ],
                "videos": [
                    {"id": "v1", "ts": 1609459200, "t": "Ep 1", "ch": 0},
                    {"id": "v2", "ts": 1609545600, "t": "Ep 2", "ch": 1},
                    {"id": "v3", "ts": 1612137600, "t": "Ep 3", "ch": 0,
                     "d": "inline"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn build_applies_hidden_set() {
        let mut state = ViewState::default();
        state.hide_channel("scar");
        let gallery = Gallery::build(&catalog(), &state);
        assert_eq!(gallery.len(), 3);
        assert_eq!(gallery.visible_count(), 2);
        assert!(!gallery.item("v2").unwrap().visible);
        assert!(!gallery.channel_by_name("scar").unwrap().active);
        assert!(gallery.channel_by_index(0).unwrap().active);
    }

    #[test]
    fn build_skips_videos_with_unknown_channel() {
        let mut catalog = catalog();
        catalog.videos[1].channel = 99;
        let gallery = Gallery::build(&catalog, &ViewState::default());
        assert_eq!(gallery.len(), 2);
        assert!(gallery.item("v2").is_none());
        // Remaining items keep working ids.
        assert!(gallery.item("v1").is_some());
        assert!(gallery.item("v3").is_some());
    }

    #[test]
    fn inline_descriptions_attach_at_build() {
        let gallery = Gallery::build(&catalog(), &ViewState::default());
        assert_eq!(gallery.item("v3").unwrap().description.as_deref(), Some("inline"));
        assert!(gallery.item("v1").unwrap().description.is_none());
    }

    #[test]
    fn visible_offsets_are_prefix_sums_of_visible_heights() {
        let mut gallery = Gallery::build(&catalog(), &ViewState::default());
        gallery.set_item_height("v1", 100.0);
        gallery.set_item_height("v2", 50.0);
        gallery.set_item_height("v3", 75.0);

        let offsets = gallery.visible_offsets();
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets[0].1, 0.0);
        assert_eq!(offsets[1].1, 100.0);
        assert_eq!(offsets[2].1, 150.0);

        // Hiding the middle channel removes its point and shifts the rest up.
        gallery.set_channel_visible("scar", false);
        let offsets = gallery.visible_offsets();
        assert_eq!(offsets.len(), 2);
        assert_eq!(offsets[1].1, 100.0);
    }

    #[test]
    fn toggle_affects_only_the_channel_items() {
        let mut gallery = Gallery::build(&catalog(), &ViewState::default());
        assert_eq!(gallery.set_channel_visible("grian", false), Some(2));
        assert!(!gallery.item("v1").unwrap().visible);
        assert!(gallery.item("v2").unwrap().visible);
        assert_eq!(gallery.set_channel_visible("nope", false), None);
    }

    #[test]
    fn description_sink_applies_and_skips_unknown() {
        let mut gallery = Gallery::build(&catalog(), &ViewState::default());
        gallery.apply_description("v1", "hello");
        assert_eq!(gallery.item("v1").unwrap().description.as_deref(), Some("hello"));
        // Unknown id: logged, skipped, nothing else changes.
        gallery.apply_description("ghost", "nope");
        assert!(gallery.item("ghost").is_none());
        // Pathological duplicate: last write wins.
        gallery.apply_description("v1", "replaced");
        assert_eq!(gallery.item("v1").unwrap().description.as_deref(), Some("replaced"));
    }

    #[test]
    fn adjacent_navigation_skips_hidden_items() {
        let mut gallery = Gallery::build(&catalog(), &ViewState::default());
        gallery.set_channel_visible("scar", false);
        assert_eq!(gallery.next_visible_after("v1").map(|i| i.id.as_str()), Some("v3"));
        assert_eq!(gallery.prev_visible_before("v3").map(|i| i.id.as_str()), Some("v1"));
        assert!(gallery.next_visible_after("v3").is_none());
        assert!(gallery.prev_visible_before("v1").is_none());
        assert!(gallery.next_visible_after("ghost").is_none());
    }

    #[test]
    fn date_headings_group_by_month() {
        let gallery = Gallery::build(&catalog(), &ViewState::default());
        // v1 and v2 are January 2021, v3 is February 2021.
        assert_eq!(
            gallery.date_headings(),
            vec![("January 2021".to_string(), 0), ("February 2021".to_string(), 2)]
        );
    }
}
