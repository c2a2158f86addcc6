use serde::{Deserialize, Serialize};

/// The primary series payload, served as one static JSON document.
///
/// This is the single source of truth for a browsing session: the channel
/// roster, the chronologically ordered video list, and (optionally) the
/// ordered list of description chunk hashes.
///
/// ```text
///   GET /data/{series}/{series}.json ──▶ Catalog ──▶ Gallery build
///                                          │
///                                          └─ descriptions? ──▶ chunk loader
/// ```
///
/// Wire field names are the short keys the static renderer emits (`t`, `ts`,
/// `ch`, `d`); the Rust side uses descriptive names via serde renames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Channels in legacy index order — `Video::channel` indexes this list.
    pub channels: Vec<Channel>,
    /// Videos in chronological render order.
    pub videos: Vec<Video>,
    /// Ordered description chunk hashes. Present only for series rendered
    /// with hash-addressed description payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Vec<String>>,
}

impl Catalog {
    /// Which description addressing mode this catalog declares.
    pub fn description_mode(&self) -> DescriptionMode {
        match &self.descriptions {
            Some(hashes) => DescriptionMode::Hashed(hashes.clone()),
            None => DescriptionMode::Indexed,
        }
    }
}

/// A content source publishing videos within a series.
///
/// Immutable once loaded. Keyed by `name` (stable key) and by its position
/// in `Catalog::channels` (legacy index key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Stable identifier used for visibility filtering and persisted state.
    pub name: String,
    /// Upstream channel id (e.g. the YouTube channel id).
    pub id: String,
    /// Display title.
    #[serde(rename = "t")]
    pub title: String,
    /// Avatar image reference.
    #[serde(default)]
    pub thumb: String,
}

/// One video entry in a series catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Upstream video id, unique within the series.
    pub id: String,
    /// Publish timestamp, seconds since the UTC epoch.
    #[serde(rename = "ts")]
    pub published_at: i64,
    /// Display title.
    #[serde(rename = "t")]
    pub title: String,
    /// Index into `Catalog::channels`.
    #[serde(rename = "ch")]
    pub channel: usize,
    /// Inline description, present only when the renderer chose to embed it
    /// rather than defer it to a chunk.
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// How description chunks for a series are addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionMode {
    /// A finite, pre-known ordered list of content-hash chunk ids, each
    /// served as a gzip-compressed JSON map.
    Hashed(Vec<String>),
    /// Sequentially numbered chunks 0, 1, 2, …; each response carries its
    /// own `done` flag.
    Indexed,
}

/// One entry in the host-supplied list of available series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    /// Series identifier (the `{series}` path component).
    pub id: String,
    /// Human-readable label for the series picker.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_wire_keys() {
        let json = r#"{
            "channels": [
                {"name": "grian", "id": "UC123", "t": "Grian", "thumb": "g.jpg"}
            ],
            "videos": [
                {"id": "abc", "ts": 1600000000, "t": "Episode 1", "ch": 0},
                {"id": "def", "ts": 1600100000, "t": "Episode 2", "ch": 0,
                 "d": "inline description"}
            ]
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.channels.len(), 1);
        assert_eq!(catalog.channels[0].title, "Grian");
        assert_eq!(catalog.videos[1].published_at, 1_600_100_000);
        assert_eq!(catalog.videos[1].channel, 0);
        assert_eq!(
            catalog.videos[1].description.as_deref(),
            Some("inline description")
        );
        assert_eq!(catalog.description_mode(), DescriptionMode::Indexed);
    }

    #[test]
    fn descriptions_list_selects_hashed_mode() {
        let json = r#"{
            "channels": [],
            "videos": [],
            "descriptions": ["aa11", "bb22"]
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(
            catalog.description_mode(),
            DescriptionMode::Hashed(vec!["aa11".into(), "bb22".into()])
        );
    }

    #[test]
    fn missing_thumb_defaults_empty() {
        let json = r#"{"name": "x", "id": "y", "t": "X"}"#;
        let ch: Channel = serde_json::from_str(json).unwrap();
        assert_eq!(ch.thumb, "");
    }
}
