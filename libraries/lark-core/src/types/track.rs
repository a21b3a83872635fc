/// Track descriptor
use crate::types::{FileKind, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A playable track
///
/// An opaque descriptor: a locator plus free-form tags. The playback core
/// never edits a track once it is in a playlist; build it fully with the
/// `with_*` methods first.
///
/// Ordering is total (locator, then id, then tags) and is used as the
/// tie-break when sorting a playlist by a caller-chosen key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Track {
    locator: PathBuf,
    id: TrackId,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

impl Track {
    /// Create a track with a freshly generated id
    pub fn new(locator: impl Into<PathBuf>) -> Self {
        Self::with_id(TrackId::generate(), locator)
    }

    /// Create a track with a caller-supplied id
    pub fn with_id(id: impl Into<TrackId>, locator: impl Into<PathBuf>) -> Self {
        Self {
            locator: locator.into(),
            id: id.into(),
            tags: BTreeMap::new(),
        }
    }

    /// Add or replace a tag
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Track identifier
    pub fn id(&self) -> &TrackId {
        &self.id
    }

    /// File locator
    pub fn locator(&self) -> &Path {
        &self.locator
    }

    /// Look up a tag value
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// All tags, sorted by key
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// File kind detected from the locator suffix
    pub fn file_kind(&self) -> Option<FileKind> {
        FileKind::from_path(&self.locator)
    }

    /// Display title: the `title` tag, else the file stem
    pub fn title(&self) -> String {
        if let Some(title) = self.tag("title") {
            return title.to_string();
        }
        self.locator
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.locator.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_file_different_ids_are_distinct() {
        let a = Track::new("/music/loop.ogg");
        let b = Track::new("/music/loop.ogg");
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn clone_keeps_identity() {
        let a = Track::with_id("a", "/music/a.mp3").with_tag("artist", "X");
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn ordering_uses_locator_first() {
        let a = Track::with_id("z", "/music/a.mp3");
        let b = Track::with_id("a", "/music/b.mp3");
        assert!(a < b);

        let c = Track::with_id("a", "/music/a.mp3");
        assert!(c < a, "same locator falls back to id");
    }

    #[test]
    fn title_falls_back_to_file_stem() {
        let plain = Track::with_id("1", "/music/Opening Theme.mp3");
        assert_eq!(plain.title(), "Opening Theme");

        let tagged = plain.clone().with_tag("title", "Overture");
        assert_eq!(tagged.title(), "Overture");
    }

    #[test]
    fn tags_are_readable() {
        let track = Track::with_id("1", "/music/a.ogg")
            .with_tag("artist", "Band")
            .with_tag("album", "Record");

        assert_eq!(track.tag("artist"), Some("Band"));
        assert_eq!(track.tag("genre"), None);
        assert_eq!(track.tags().len(), 2);
        assert_eq!(track.file_kind(), Some(FileKind::Ogg));
    }
}
