use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Video-id → description text, the payload of one description chunk.
///
/// An ordered map so that apply order within a chunk is deterministic
/// regardless of upstream JSON key order.
pub type DescriptionMap = BTreeMap<String, String>;

/// One index-addressed description chunk.
///
/// Served as `/data/{series}/desc/{n}.json`. The loader requests chunk
/// `n + 1` only when this one resolved with `done == 0`; `done == 1` is the
/// server's completion signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub videos: DescriptionMap,
    /// 0 = more chunks follow, 1 = this is the last chunk.
    pub done: u8,
}

impl IndexedChunk {
    pub fn is_done(&self) -> bool {
        self.done != 0
    }
}
