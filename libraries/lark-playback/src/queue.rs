//! Pending queue
//!
//! Tracks still to play, consumed from the front.

use crate::shuffle::shuffle_tracks;
use lark_core::Track;
use std::collections::VecDeque;

/// Ordered tracks waiting to play
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    tracks: VecDeque<Track>,
}

impl PendingQueue {
    /// Create empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next track to play
    pub fn pop_front(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    /// Put a track back at the front (plays next)
    pub fn push_front(&mut self, track: Track) {
        self.tracks.push_front(track);
    }

    /// Replace the whole queue
    pub fn replace(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.clear();
        self.tracks.extend(tracks);
    }

    /// Randomize the order of every queued track
    pub fn shuffle(&mut self) {
        shuffle_tracks(self.tracks.make_contiguous());
    }

    /// Iterate in play order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Snapshot in play order
    pub fn to_vec(&self) -> Vec<Track> {
        self.iter().cloned().collect()
    }

    /// Number of queued tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_track(id: &str) -> Track {
        Track::with_id(id, format!("/music/{}.ogg", id))
    }

    fn ids(queue: &PendingQueue) -> Vec<&str> {
        queue.iter().map(|t| t.id().as_str()).collect()
    }

    #[test]
    fn consumes_from_front() {
        let mut queue = PendingQueue::new();
        queue.replace(vec![create_test_track("a"), create_test_track("b")]);

        assert_eq!(queue.pop_front().unwrap().id().as_str(), "a");
        assert_eq!(ids(&queue), vec!["b"]);
    }

    #[test]
    fn push_front_plays_next() {
        let mut queue = PendingQueue::new();
        queue.replace(vec![create_test_track("c")]);
        queue.push_front(create_test_track("b"));
        queue.push_front(create_test_track("a"));

        assert_eq!(ids(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn shuffle_keeps_every_track() {
        let mut queue = PendingQueue::new();
        queue.replace((0..50).map(|i| create_test_track(&i.to_string())));
        // Wrap around the ring buffer before shuffling
        queue.pop_front();
        queue.push_front(create_test_track("0"));

        queue.shuffle();

        let mut after: Vec<String> = queue.iter().map(|t| t.id().to_string()).collect();
        after.sort();
        let mut expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        expected.sort();
        assert_eq!(after, expected);
    }

    #[test]
    fn replace_with_nothing_empties() {
        let mut queue = PendingQueue::new();
        queue.replace(vec![create_test_track("a")]);
        queue.replace(Vec::new());
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }
}
