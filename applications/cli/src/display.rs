/// Console rendering of playback events
use lark_playback::PlaybackEvent;

/// Format milliseconds as `m:ss`, or `h:mm:ss` past an hour
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    let (hours, minutes, seconds) = (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// One console line for an event; `None` for events not shown
pub fn describe(event: &PlaybackEvent) -> Option<String> {
    match event {
        PlaybackEvent::SongChanged { track, duration_ms } => Some(format!(
            "Playing: {} [{}]",
            track.title(),
            format_time(*duration_ms)
        )),
        PlaybackEvent::TrackFailed { track, message } => {
            Some(format!("Skipped: {} ({})", track.locator().display(), message))
        }
        PlaybackEvent::TimeAdvanced { .. } => None,
    }
}
