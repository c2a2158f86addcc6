pub mod catalog;
pub mod chunk;
pub mod state;

pub use catalog::{Catalog, Channel, DescriptionMode, SeriesEntry, Video};
pub use chunk::{DescriptionMap, IndexedChunk};
pub use state::{StateMap, ViewState};
