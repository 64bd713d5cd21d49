/// Session phase state machine.
///
/// Phase transitions:
/// ```text
/// idle → recording ↔ recording-paused
///            ↓
///       processing → playback-ready → playing ↔ playback-paused
///                          ↑              ↓
///                          └── (ended) ───┘
/// ```
///
/// Clear is reachable from every phase and returns to `Idle`. An error is an
/// orthogonal flag on the session, not a phase: entering it forces a clear of
/// derived visualization state but the error value itself survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Recording,
    RecordingPaused,
    /// Capture stopped, final artifact delivery and decode in flight.
    Processing,
    PlaybackReady,
    Playing,
    PlaybackPaused,
}

impl SessionPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// A live capture exists (recording, possibly paused).
    pub fn is_capture_active(&self) -> bool {
        matches!(self, Self::Recording | Self::RecordingPaused)
    }

    pub fn is_recording_paused(&self) -> bool {
        matches!(self, Self::RecordingPaused)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// A decoded recording exists and playback controls apply.
    pub fn is_playback_phase(&self) -> bool {
        matches!(self, Self::PlaybackReady | Self::Playing | Self::PlaybackPaused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_active_covers_paused() {
        assert!(SessionPhase::Recording.is_capture_active());
        assert!(SessionPhase::RecordingPaused.is_capture_active());
        assert!(!SessionPhase::Processing.is_capture_active());
        assert!(!SessionPhase::Idle.is_capture_active());
    }

    #[test]
    fn playback_phases() {
        assert!(SessionPhase::PlaybackReady.is_playback_phase());
        assert!(SessionPhase::Playing.is_playback_phase());
        assert!(SessionPhase::PlaybackPaused.is_playback_phase());
        assert!(!SessionPhase::Recording.is_playback_phase());
    }
}
