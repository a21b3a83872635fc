//! Playback state
//!
//! Every transition the controller performs is a plain `&mut self` method
//! here; the controller only adds locking and wake-ups around them.
//!
//! Without shuffle, `history ++ pending` always equals `original` between
//! transitions (a repeat refill starts a new pass and is the one exception).

use crate::error::{PlaybackError, Result};
use crate::history::History;
use crate::queue::PendingQueue;
use crate::transport::Transport;
use crate::types::{PlaybackConfig, PlayerStatus};
use lark_core::{Track, TrackId};
use std::sync::Arc;

pub(crate) struct PlaybackState {
    /// Playlist as last set by the caller
    original: Vec<Track>,
    pending: PendingQueue,
    history: History,
    /// Set iff `transport` is set
    current: Option<Track>,
    transport: Option<Arc<dyn Transport>>,
    paused: bool,
    shuffle: bool,
    repeat: bool,
    /// Never cleared once set
    quitting: bool,
}

impl PlaybackState {
    pub fn new(tracks: Vec<Track>, config: &PlaybackConfig) -> Self {
        let mut pending = PendingQueue::new();
        pending.replace(tracks.iter().cloned());
        if config.shuffle {
            pending.shuffle();
        }

        Self {
            original: tracks,
            pending,
            history: History::new(),
            current: None,
            transport: None,
            paused: config.start_paused,
            shuffle: config.shuffle,
            repeat: config.repeat,
            quitting: false,
        }
    }

    // ===== Run loop transitions =====

    /// Pop the next track, reshuffling what is left when shuffle is on
    pub fn take_next(&mut self) -> Option<Track> {
        if self.quitting {
            return None;
        }

        let track = self.pending.pop_front()?;
        if self.shuffle {
            self.pending.shuffle();
        }
        Some(track)
    }

    /// Make `track` current with its freshly opened transport
    pub fn begin(&mut self, track: Track, transport: Arc<dyn Transport>) {
        self.history.push(track.clone());
        self.current = Some(track);
        self.transport = Some(transport);
    }

    /// Record a track whose transport could not be built
    pub fn skip_failed(&mut self, track: Track) {
        self.history.push(track);
        self.clear_current();
    }

    /// Start another pass over the playlist
    ///
    /// Returns `false` when repeat is off or there is nothing to loop.
    pub fn refill_for_repeat(&mut self, history_limit: usize) -> bool {
        if !self.repeat || self.quitting || self.original.is_empty() {
            return false;
        }

        self.pending.replace(self.original.iter().cloned());
        if self.shuffle {
            self.pending.shuffle();
        }
        self.history.truncate_to_recent(history_limit);
        true
    }

    /// Drop the current track and its transport
    pub fn clear_current(&mut self) {
        self.current = None;
        self.transport = None;
    }

    /// Whether the run loop has nothing to do until a command arrives
    pub fn is_idle(&self) -> bool {
        !self.quitting && self.pending.is_empty() && (!self.repeat || self.original.is_empty())
    }

    // ===== Commands =====

    /// Forward a seek to the active transport
    pub fn seek(&self, position_ms: u64) {
        if let Some(transport) = &self.transport {
            transport.seek(position_ms);
        }
    }

    /// Stop the active transport so the run loop advances
    pub fn stop_transport(&self) {
        if let Some(transport) = &self.transport {
            transport.stop();
        }
    }

    /// Queue the track before the current one
    pub fn previous(&mut self) {
        if self.history.len() >= 2 {
            self.stop_transport();
            // Current goes back first, then the one before it lands in front
            for _ in 0..2 {
                if let Some(track) = self.history.pop() {
                    self.pending.push_front(track);
                }
            }
        } else if self.transport.is_some() && !self.history.is_empty() {
            if self.repeat {
                // Wrap around to the last track of the playlist; the current
                // track plays on and the wrapped one follows it
                if let Some((last, rest)) = self.original.split_last() {
                    let last = last.clone();
                    self.history.replace(rest.iter().cloned());
                    self.pending.replace([last]);
                }
            } else {
                if let Some(track) = self.history.pop() {
                    self.pending.push_front(track);
                }
                self.stop_transport();
            }
        }
    }

    /// Jump to `id`
    pub fn go_to(&mut self, id: &TrackId) -> Result<()> {
        let index = self
            .original
            .iter()
            .position(|t| t.id() == id)
            .ok_or_else(|| PlaybackError::NotFound(id.clone()))?;

        if self.shuffle {
            let mut tracks = self.original.clone();
            let target = tracks.remove(index);
            tracks.insert(0, target);
            self.pending.replace(tracks);
        } else {
            self.history.replace(self.original[..index].iter().cloned());
            self.pending.replace(self.original[index..].iter().cloned());
        }

        self.stop_transport();
        Ok(())
    }

    /// Replace the playlist, keeping the current track playing
    pub fn replace_playlist(&mut self, tracks: Vec<Track>) {
        if self.quitting {
            return;
        }
        self.install_playlist(tracks);
    }

    fn install_playlist(&mut self, tracks: Vec<Track>) {
        self.history.clear();
        self.pending.replace(tracks.iter().cloned());
        self.original = tracks;

        if self.shuffle {
            return;
        }

        let split = self.current.as_ref().and_then(|current| {
            self.original
                .iter()
                .position(|t| t.id() == current.id())
        });

        if let Some(index) = split {
            self.history
                .replace(self.original[..=index].iter().cloned());
            self.pending
                .replace(self.original[index + 1..].iter().cloned());
        }
    }

    /// Sort the playlist by `key`, ties broken by the track's own ordering
    pub fn sort_by<K, F>(&mut self, mut key: F, reverse: bool)
    where
        K: Ord,
        F: FnMut(&Track) -> K,
    {
        let mut sorted = self.original.clone();
        sorted.sort_by(|a, b| key(a).cmp(&key(b)).then_with(|| a.cmp(b)));
        if reverse {
            sorted.reverse();
        }
        self.replace_playlist(sorted);
    }

    /// Enter the terminal state
    pub fn quit(&mut self) {
        self.quitting = true;
        self.paused = false;
        self.stop_transport();
        self.install_playlist(Vec::new());
    }

    // ===== Flags =====

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        // Quitting releases the pause wait for good
        self.paused = paused && !self.quitting;
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        if shuffle && !self.shuffle {
            self.pending.shuffle();
        }
        self.shuffle = shuffle;
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    // ===== Snapshots =====

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn original(&self) -> &[Track] {
        &self.original
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> PlayerStatus {
        if self.quitting {
            PlayerStatus::Quit
        } else if self.current.is_none() {
            PlayerStatus::Idle
        } else if self.paused {
            PlayerStatus::Paused
        } else {
            PlayerStatus::Playing
        }
    }
}
