//! # voice-visualizer-core
//!
//! Platform-agnostic voice recording session core.
//!
//! Manages the lifecycle of a live audio capture session, publishes a stream
//! of amplitude snapshots for real-time visualization, and tracks playback of
//! the captured recording with a time-synchronized cursor. The embedding host
//! owns all rendering; this crate owns state, timing, and resource lifecycle.
//! Platform-specific backends (browser media APIs, cpal, WASAPI) implement
//! the capture/decode/playback traits and plug into the generic
//! `VisualizerSession`.
//!
//! ## Architecture
//!
//! ```text
//! voice-visualizer-core (this crate)
//! ├── traits/       ← CaptureProvider, MediaEncoder, AudioDecoder,
//! │                   PlaybackEngine, ArtifactSaver, HostEnvironment,
//! │                   SessionDelegate
//! ├── models/       ← SessionError, SessionPhase, SessionConfig,
//! │                   SampleFrame, RecordedArtifact, DecodedAudio
//! ├── session/      ← VisualizerSession (orchestrator), ResourceBundle,
//! │                   PeriodicTask
//! └── time_format   ← display formatters, MIME → file extension
//! ```

pub mod models;
pub mod session;
pub mod time_format;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::artifact::{
    ArtifactMetadata, DecodedAudio, RecordedArtifact, ENCODER_DURATION_SKEW_SECS,
};
pub use models::config::SessionConfig;
pub use models::error::SessionError;
pub use models::frame::SampleFrame;
pub use models::state::SessionPhase;
pub use session::controller::{SessionServices, VisualizerSession};
pub use session::resources::ResourceBundle;
pub use session::task::PeriodicTask;
pub use traits::capture::{AnalysisGraph, CaptureDevice, CaptureProvider, GrantCallback};
pub use traits::decoder::{AudioDecoder, DecodeCallback};
pub use traits::delegate::SessionDelegate;
pub use traits::encoder::{ArtifactCallback, MediaEncoder};
pub use traits::environment::{ArtifactSaver, HostEnvironment};
pub use traits::playback::{PlaybackEngine, PlaybackHandle};
