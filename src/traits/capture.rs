use crate::models::error::SessionError;
use crate::traits::encoder::{ArtifactCallback, MediaEncoder};

/// Continuation invoked when the capture-device request resolves.
///
/// The grant has unbounded, externally determined latency (permission
/// prompts, device enumeration) and may fire on any thread.
pub type GrantCallback =
    Box<dyn FnOnce(Result<Box<dyn CaptureDevice>, SessionError>) + Send + 'static>;

/// Interface for platform-specific capture backends.
///
/// Implemented by browser media-API shims, cpal wrappers, WASAPI backends.
/// The session controller requests a device asynchronously and then assembles
/// the rest of the resource bundle from it in dependency order: device →
/// analysis graph → sample accumulator → encoder.
pub trait CaptureProvider: Send + Sync {
    /// Request the capture device. Denial or device failure is delivered
    /// through the continuation as `SessionError::DeviceDenied`.
    fn request_device(&self, on_grant: GrantCallback);

    /// Attach an analysis graph to a granted device for real-time amplitude
    /// readings.
    fn build_graph(
        &self,
        device: &dyn CaptureDevice,
    ) -> Result<Box<dyn AnalysisGraph>, SessionError>;

    /// Create an encoder/muxer consuming the device's stream. The encoder
    /// delivers its final data blob through `on_artifact` exactly once, after
    /// `stop()`.
    fn build_encoder(
        &self,
        device: &dyn CaptureDevice,
        on_artifact: ArtifactCallback,
    ) -> Result<Box<dyn MediaEncoder>, SessionError>;
}

/// A live audio-input handle.
pub trait CaptureDevice: Send {
    /// Stop all tracks and release the device. Idempotent.
    fn stop_tracks(&mut self);
}

/// The audio-processing node providing real-time amplitude readings.
pub trait AnalysisGraph: Send {
    /// Length of one amplitude snapshot in bytes.
    fn bin_count(&self) -> usize;

    /// Read the current amplitude snapshot into `out` (`bin_count` bytes).
    ///
    /// Called once per frame from the sampling loop; keep it non-blocking.
    fn sample(&mut self, out: &mut [u8]);

    /// Detach the graph from its source. Idempotent.
    fn detach(&mut self);
}
