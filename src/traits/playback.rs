use crate::models::artifact::DecodedAudio;
use crate::models::error::SessionError;

/// Factory creating playback handles for decoded recordings.
pub trait PlaybackEngine: Send + Sync {
    fn create_player(
        &self,
        audio: &DecodedAudio,
    ) -> Result<Box<dyn PlaybackHandle>, SessionError>;
}

/// A playback handle over one decoded recording.
///
/// The session controller owns the handle exclusively; the playback clock
/// loop polls `position_secs` and `has_ended` once per frame.
pub trait PlaybackHandle: Send {
    /// Begin or resume playback from the current position.
    fn play(&mut self) -> Result<(), SessionError>;

    /// Pause playback, retaining the current position. Idempotent.
    fn pause(&mut self);

    /// Current playback position in seconds.
    fn position_secs(&self) -> f64;

    /// Move the cursor. Positions past the end clamp to the end.
    fn seek_to(&mut self, secs: f64);

    /// Whether the stream has played to its end since the last `play`.
    fn has_ended(&self) -> bool;
}
