mod format;
mod ids;
mod track;

pub use format::{FileKind, PcmLayout};
pub use ids::TrackId;
pub use track::Track;
