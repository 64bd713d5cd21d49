use crate::models::error::SessionError;

/// Lifecycle notifications for the host.
///
/// Every method has a no-op default, so hosts implement only what they
/// render. Callbacks may fire from loop or continuation threads, not the
/// thread that issued the command; implementations should marshal to the UI
/// thread if needed.
pub trait SessionDelegate: Send + Sync {
    fn on_start_recording(&self) {}

    fn on_stop_recording(&self) {}

    fn on_paused_recording(&self) {}

    fn on_resumed_recording(&self) {}

    fn on_clear_canvas(&self) {}

    fn on_start_audio_playback(&self) {}

    fn on_paused_audio_playback(&self) {}

    fn on_resumed_audio_playback(&self) {}

    fn on_end_audio_playback(&self) {}

    fn on_error_playing_audio(&self, _error: &SessionError) {}
}
