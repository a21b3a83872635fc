//! Playlist controller
//!
//! Owns the playback state and runs the playback loop. The loop holds the
//! state lock only to move from one track to the next; checkpoints are
//! stepped outside it so control commands from other threads are never
//! blocked behind a decode.

use crate::clock::ProgressClock;
use crate::error::{PlaybackError, Result};
use crate::events::ProgressSink;
use crate::state::PlaybackState;
use crate::transport::{DecoderTransport, Transport};
use crate::types::{PlaybackConfig, PlayerStatus};
use lark_core::{DecoderProvider, OutputSink, Track, TrackId};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Thread-safe handle to a playlist and its playback loop
///
/// Cloning is cheap and every clone controls the same playlist. One clone
/// calls [`run`](Self::run) on a dedicated thread; the others issue commands.
///
/// ```rust,no_run
/// use lark_core::{DecoderProvider, OutputSink, Track};
/// use lark_playback::{ChannelProgressSink, PlaylistController};
/// use std::sync::Arc;
///
/// fn start(output: Arc<dyn OutputSink>, decoders: Arc<dyn DecoderProvider>) {
///     let tracks = vec![Track::new("/music/a.ogg"), Track::new("/music/b.mp3")];
///     let controller = PlaylistController::new(output, decoders, tracks);
///
///     let (sink, events) = ChannelProgressSink::channel();
///     let runner = controller.clone();
///     let handle = std::thread::spawn(move || runner.run(&sink));
///
///     controller.set_paused(false);
///     println!("{:?}", events.recv());
///
///     controller.quitting();
///     handle.join().ok();
/// }
/// ```
#[derive(Clone)]
pub struct PlaylistController {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<PlaybackState>,
    /// Wakes the run loop out of its pause and idle waits
    changed: Condvar,
    clock: ProgressClock,
    output: Arc<dyn OutputSink>,
    decoders: Arc<dyn DecoderProvider>,
    config: PlaybackConfig,
}

/// What the run loop does next
enum Step {
    Play {
        track: Track,
        transport: Arc<dyn Transport>,
    },
    Failed {
        track: Track,
        error: PlaybackError,
    },
}

impl PlaylistController {
    /// Create a controller with default configuration
    ///
    /// Starts paused: the first track opens as soon as the loop runs, but
    /// no buffer is played until `set_paused(false)`.
    pub fn new(
        output: Arc<dyn OutputSink>,
        decoders: Arc<dyn DecoderProvider>,
        tracks: Vec<Track>,
    ) -> Self {
        Self::with_config(output, decoders, tracks, PlaybackConfig::default())
    }

    /// Create a controller with custom configuration
    pub fn with_config(
        output: Arc<dyn OutputSink>,
        decoders: Arc<dyn DecoderProvider>,
        tracks: Vec<Track>,
        config: PlaybackConfig,
    ) -> Self {
        let state = PlaybackState::new(tracks, &config);

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                changed: Condvar::new(),
                clock: ProgressClock::new(),
                output,
                decoders,
                config,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate state under the lock, then wake the run loop
    fn update<R>(&self, f: impl FnOnce(&mut PlaybackState) -> R) -> R {
        let result = {
            let mut state = self.lock();
            f(&mut state)
        };
        self.inner.changed.notify_all();
        result
    }

    // ===== Run loop =====

    /// Run the playback loop until [`quitting`](Self::quitting) is called
    ///
    /// Blocks the calling thread. Tracks that cannot be opened are reported
    /// to `sink` and skipped.
    pub fn run(&self, sink: &dyn ProgressSink) {
        tracing::info!("Playback loop started");

        let mut played_since_refill = false;
        while let Some(step) = self.next_step(&mut played_since_refill) {
            match step {
                Step::Play { track, transport } => {
                    played_since_refill = true;
                    self.play_track(&track, transport.as_ref(), sink);
                }
                Step::Failed { track, error } => {
                    tracing::warn!(
                        track = %track.id(),
                        locator = %track.locator().display(),
                        "Skipping track: {}",
                        error
                    );
                    sink.track_failed(&track, &error);
                }
            }
        }

        self.update(PlaybackState::clear_current);
        tracing::info!("Playback loop exited");
    }

    /// Wait for the next track and open it
    ///
    /// Returns `None` once quitting.
    fn next_step(&self, played_since_refill: &mut bool) -> Option<Step> {
        let mut state = self.lock();

        loop {
            if state.is_quitting() {
                return None;
            }

            if let Some(track) = state.take_next() {
                return Some(self.start_track(&mut state, track));
            }

            // A loop pass where nothing could be opened does not refill again
            if *played_since_refill && state.refill_for_repeat(self.inner.config.history_limit) {
                *played_since_refill = false;
                tracing::debug!(
                    tracks = state.original().len(),
                    history = state.history().len(),
                    "Playlist exhausted, repeating"
                );
                continue;
            }

            state.clear_current();

            let stalled = state.repeat() && !state.original().is_empty();
            if stalled {
                tracing::warn!("No playable track in playlist, waiting for changes");
            } else {
                tracing::debug!("Playlist exhausted, waiting");
            }

            state = self
                .inner
                .changed
                .wait_while(state, |s| {
                    if stalled {
                        !s.is_quitting() && s.pending().is_empty()
                    } else {
                        s.is_idle()
                    }
                })
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn start_track(&self, state: &mut PlaybackState, track: Track) -> Step {
        let opened = DecoderTransport::open(
            Arc::clone(&self.inner.output),
            self.inner.decoders.as_ref(),
            track.locator(),
            self.inner.config.buffer_size,
        );

        match opened {
            Ok(transport) => {
                let transport: Arc<dyn Transport> = Arc::new(transport);
                self.inner.clock.reset(transport.duration_ms());
                state.begin(track.clone(), Arc::clone(&transport));

                tracing::debug!(
                    track = %track.id(),
                    locator = %track.locator().display(),
                    duration_ms = transport.duration_ms(),
                    pending = state.pending().len(),
                    "Starting track"
                );
                Step::Play { track, transport }
            }
            Err(error) => {
                state.skip_failed(track.clone());
                Step::Failed { track, error }
            }
        }
    }

    /// Step `transport` to exhaustion, pausing and reporting along the way
    fn play_track(&self, track: &Track, transport: &dyn Transport, sink: &dyn ProgressSink) {
        sink.song_changed(track, transport);

        let duration_ms = transport.duration_ms();
        let interval = self.inner.config.progress_interval_ms;
        let mut next_report = interval;

        // Hold before the first buffer too
        self.wait_while_paused();
        for position in transport.checkpoints() {
            if position < next_report.saturating_sub(interval) {
                // Sought backwards: count the next interval from here
                next_report = position.saturating_add(interval);
            }
            if position > next_report {
                sink.time_advanced(position, duration_ms);
                next_report = position.saturating_add(interval);
            }
            self.inner.clock.advance(position);
            self.wait_while_paused();
        }

        tracing::debug!(
            track = %track.id(),
            stopped = transport.is_stopped(),
            "Track finished"
        );
    }

    fn wait_while_paused(&self) {
        let state = self.lock();
        if !state.is_paused() {
            return;
        }

        tracing::debug!("Paused");
        let _state = self
            .inner
            .changed
            .wait_while(state, |s| s.is_paused() && !s.is_quitting())
            .unwrap_or_else(PoisonError::into_inner);
        tracing::debug!("Resumed");
    }

    // ===== Transport commands =====

    /// Seek the current track to `position_ms`; no-op when idle
    pub fn seek(&self, position_ms: u64) {
        tracing::debug!(position_ms, "Seek requested");
        self.lock().seek(position_ms);
    }

    /// Skip to the next pending track
    ///
    /// Only stops the current transport; the run loop does the advancing.
    pub fn next(&self) {
        tracing::debug!("Next requested");
        self.update(|state| state.stop_transport());
    }

    /// Go back to the track before the current one
    ///
    /// On the first track this restarts it. With repeat on it instead queues
    /// the last track of the playlist to follow the current one.
    pub fn previous(&self) {
        tracing::debug!("Previous requested");
        self.update(PlaybackState::previous);
    }

    /// Jump to a track of the playlist
    ///
    /// # Errors
    /// `NotFound` if no track in the playlist has this id
    pub fn go_to(&self, id: &TrackId) -> Result<()> {
        tracing::debug!(track = %id, "Jump requested");
        self.update(|state| state.go_to(id))
    }

    // ===== Playlist commands =====

    /// Replace the playlist
    ///
    /// If the current track is in `tracks` (and shuffle is off) it keeps
    /// playing and the queue resumes after its new position.
    pub fn set_playlist(&self, tracks: Vec<Track>) {
        tracing::debug!(tracks = tracks.len(), "Replacing playlist");
        self.update(|state| state.replace_playlist(tracks));
    }

    /// Reorder the playlist by `key`
    ///
    /// Ties are broken by the tracks' own ordering, so the result is
    /// deterministic. `reverse` flips the whole order.
    pub fn sort_by<K, F>(&self, key: F, reverse: bool)
    where
        K: Ord,
        F: FnMut(&Track) -> K,
    {
        tracing::debug!(reverse, "Sorting playlist");
        self.update(|state| state.sort_by(key, reverse));
    }

    /// Stop playback for good and make `run` return
    ///
    /// Idempotent. The playlist, queue and history are emptied.
    pub fn quitting(&self) {
        tracing::info!("Quitting playback");
        self.update(PlaybackState::quit);
    }

    // ===== Flags =====

    pub fn set_paused(&self, paused: bool) {
        self.update(|state| state.set_paused(paused));
    }

    /// Flip the pause flag; returns the new value
    pub fn toggle_pause(&self) -> bool {
        self.update(|state| {
            let paused = !state.is_paused();
            state.set_paused(paused);
            state.is_paused()
        })
    }

    pub fn is_paused(&self) -> bool {
        self.lock().is_paused()
    }

    /// Enable or disable shuffle
    ///
    /// Enabling shuffles the pending queue right away.
    pub fn set_shuffle(&self, shuffle: bool) {
        self.update(|state| state.set_shuffle(shuffle));
    }

    pub fn shuffle(&self) -> bool {
        self.lock().shuffle()
    }

    pub fn set_repeat(&self, repeat: bool) {
        self.update(|state| state.set_repeat(repeat));
    }

    pub fn repeat(&self) -> bool {
        self.lock().repeat()
    }

    pub fn is_quitting(&self) -> bool {
        self.lock().is_quitting()
    }

    // ===== Output =====

    /// Output volume (0-100)
    pub fn volume(&self) -> u8 {
        self.inner.output.volume()
    }

    /// Set output volume (0-100, clamped)
    pub fn set_volume(&self, level: u8) {
        self.inner.output.set_volume(level);
    }

    // ===== Snapshots =====

    /// Playlist in the order last set
    pub fn playlist(&self) -> Vec<Track> {
        self.lock().original().to_vec()
    }

    /// Tracks still to play, in play order
    pub fn pending(&self) -> Vec<Track> {
        self.lock().pending().to_vec()
    }

    /// Tracks already played, oldest first
    pub fn history(&self) -> Vec<Track> {
        self.lock().history().to_vec()
    }

    pub fn current_song(&self) -> Option<Track> {
        self.lock().current().cloned()
    }

    /// Last decoded position and length of the current track, in ms
    ///
    /// Lock-free; may be momentarily stale.
    pub fn times(&self) -> (u64, u64) {
        self.inner.clock.times()
    }

    pub fn status(&self) -> PlayerStatus {
        self.lock().status()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for PlaylistController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistController")
            .field("status", &self.status())
            .field("times", &self.times())
            .finish_non_exhaustive()
    }
}
