pub mod debounce;
pub mod describe;
pub mod gallery;
pub mod session;
pub mod store;
pub mod timeline;

pub use debounce::Debouncer;
pub use gallery::{DescriptionSink, Gallery, GalleryItem};
pub use session::{SeriesGuard, SeriesSession, SeriesToken};
pub use store::StateStore;
pub use timeline::{LayoutProvider, Timeline, TimelinePoint};
