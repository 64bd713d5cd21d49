use crate::models::artifact::{DecodedAudio, RecordedArtifact};
use crate::traits::capture::{AnalysisGraph, CaptureDevice};
use crate::traits::encoder::MediaEncoder;
use crate::traits::playback::PlaybackHandle;

/// The set of live handles for one recording session.
///
/// Exclusively owned by the session controller; no handle ever escapes to
/// another component. Every field is optional and every release goes through
/// `Option::take`, so releasing an already-absent resource is a no-op and the
/// bundle can be torn down from any partially populated phase.
#[derive(Default)]
pub struct ResourceBundle {
    pub device: Option<Box<dyn CaptureDevice>>,
    pub graph: Option<Box<dyn AnalysisGraph>>,
    /// Reusable amplitude scratch buffer, sized to the graph's bin count.
    pub scratch: Vec<u8>,
    pub encoder: Option<Box<dyn MediaEncoder>>,
    pub artifact: Option<RecordedArtifact>,
    pub decoded: Option<DecodedAudio>,
    pub player: Option<Box<dyn PlaybackHandle>>,
}

impl ResourceBundle {
    /// Detach the capture-phase handles for release outside the state lock.
    ///
    /// The encoder's stop/discard may synchronously re-enter the session
    /// through the artifact continuation, so these handles must never be
    /// released while the state lock is held.
    pub fn take_capture(&mut self) -> CaptureResources {
        self.scratch.clear();
        CaptureResources {
            device: self.device.take(),
            graph: self.graph.take(),
            encoder: self.encoder.take(),
        }
    }

    /// Release everything, discarding any pending encoder data.
    pub fn teardown(mut self) {
        self.take_capture().release();
        if let Some(mut player) = self.player.take() {
            player.pause();
        }
        // artifact and decoded buffer are plain data; dropped with self.
    }
}

/// Capture-phase handles detached from the bundle, released in dependency
/// order: data producers stop before their consumers are released.
pub struct CaptureResources {
    device: Option<Box<dyn CaptureDevice>>,
    graph: Option<Box<dyn AnalysisGraph>>,
    encoder: Option<Box<dyn MediaEncoder>>,
}

impl CaptureResources {
    /// Finish a capture: stop the encoder (flushing the final data chunk to
    /// the artifact continuation), then detach the graph, then release the
    /// device tracks.
    pub fn finish(mut self) {
        if let Some(mut encoder) = self.encoder.take() {
            encoder.stop();
        }
        self.release_rest();
    }

    /// Abort a capture: discard the encoder's pending data, then release the
    /// rest in the same order.
    pub fn release(mut self) {
        if let Some(mut encoder) = self.encoder.take() {
            encoder.discard();
        }
        self.release_rest();
    }

    fn release_rest(&mut self) {
        if let Some(mut graph) = self.graph.take() {
            graph.detach();
        }
        if let Some(mut device) = self.device.take() {
            device.stop_tracks();
        }
    }
}
