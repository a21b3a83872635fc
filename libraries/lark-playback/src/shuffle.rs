//! Shuffle for the pending queue
//!
//! Pure random Fisher-Yates: each track has equal probability of landing at
//! any position.

use lark_core::Track;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Shuffle tracks in place
pub fn shuffle_tracks(tracks: &mut [Track]) {
    let mut rng = thread_rng();
    tracks.shuffle(&mut rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn create_test_tracks(count: usize) -> Vec<Track> {
        (0..count)
            .map(|i| Track::with_id(i.to_string(), format!("/music/{}.mp3", i)))
            .collect()
    }

    #[test]
    fn shuffle_preserves_tracks() {
        let mut tracks = create_test_tracks(20);
        let before: HashSet<_> = tracks.iter().map(|t| t.id().clone()).collect();

        shuffle_tracks(&mut tracks);

        let after: HashSet<_> = tracks.iter().map(|t| t.id().clone()).collect();
        assert_eq!(before, after);
        assert_eq!(tracks.len(), 20);
    }

    #[test]
    fn shuffle_changes_order() {
        let original = create_test_tracks(20);

        // 20! orderings; ten identical results in a row would be astronomically unlikely
        let changed = (0..10).any(|_| {
            let mut tracks = original.clone();
            shuffle_tracks(&mut tracks);
            tracks != original
        });
        assert!(changed);
    }

    #[test]
    fn shuffle_small_inputs() {
        let mut empty: Vec<Track> = Vec::new();
        shuffle_tracks(&mut empty);
        assert!(empty.is_empty());

        let mut single = create_test_tracks(1);
        shuffle_tracks(&mut single);
        assert_eq!(single[0].id().as_str(), "0");
    }
}
