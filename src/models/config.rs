use std::time::Duration;

/// Configuration for a visualizer session.
///
/// The defaults match the browser environment the session model comes from:
/// per-frame work at ~60 Hz and a one-second elapsed-time tick. Tests shrink
/// both to run the loops fast and deterministically.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Interval of the per-frame loops (amplitude sampling, playback clock).
    pub frame_interval: Duration,

    /// Interval of the elapsed-recording-time ticker. Coarser than the frame
    /// interval; the ticker re-anchors on every tick so a delayed tick does
    /// not desynchronize elapsed time from the wall clock.
    pub tick_interval: Duration,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_interval.is_zero() {
            return Err("frame interval must be positive".into());
        }
        if self.tick_interval.is_zero() {
            return Err("tick interval must be positive".into());
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            tick_interval: Duration::from_secs(1),
        }
    }
}
