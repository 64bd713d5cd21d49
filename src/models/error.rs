use thiserror::Error;

/// Errors that can occur during a recording/playback session.
///
/// At most one error is live on a session at a time. Errors are stored on the
/// session for the host to poll, never returned across the public boundary;
/// storing a new error first runs the clear-visualization path so stale
/// waveform/cursor data is never displayed alongside it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("capture device denied: {0}")]
    DeviceDenied(String),

    #[error("recorded artifact is empty")]
    EmptyArtifact,

    #[error("failed to decode recorded artifact: {0}")]
    DecodeFailure(String),

    #[error("audio playback failed: {0}")]
    PlaybackFailure(String),
}
