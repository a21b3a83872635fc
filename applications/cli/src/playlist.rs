/// Playlist construction from command-line paths
use crate::error::{CliError, Result};
use lark_core::Track;
use std::path::PathBuf;

/// Build tracks for `paths`, in the order given
///
/// Every track gets a `filename` tag and a `title` tag (the file stem), so
/// `--sort filename` and `--sort title` work without reading metadata.
pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Result<Vec<Track>> {
    let tracks: Vec<Track> = paths.into_iter().map(track_for).collect();
    if tracks.is_empty() {
        return Err(CliError::EmptyPlaylist);
    }
    Ok(tracks)
}

fn track_for(path: PathBuf) -> Track {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    let mut track = Track::new(path);
    let title = track.title();
    track = track.with_tag("title", title);
    if let Some(filename) = filename {
        track = track.with_tag("filename", filename);
    }
    track
}

/// Sort key for a tag name
pub fn tag_key(tag: &str) -> impl Fn(&Track) -> Option<String> + '_ {
    move |track| track.tag(tag).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_tags_file_names() {
        let tracks = from_paths(vec![
            PathBuf::from("/music/b side.ogg"),
            PathBuf::from("/music/A.MP3"),
        ])
        .unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].tag("filename"), Some("b side.ogg"));
        assert_eq!(tracks[0].tag("title"), Some("b side"));
        assert_eq!(tracks[1].tag("filename"), Some("A.MP3"));
        assert_ne!(tracks[0].id(), tracks[1].id());
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = from_paths(Vec::new());
        assert!(matches!(result, Err(CliError::EmptyPlaylist)));
    }

    #[test]
    fn tag_key_reads_tag() {
        let track = Track::new("/music/x.mp3").with_tag("artist", "Someone");
        assert_eq!(tag_key("artist")(&track), Some("Someone".to_string()));
        assert_eq!(tag_key("album")(&track), None);
    }
}
