/// Continuation receiving the encoder's final data blob.
///
/// Delivery is asynchronous: `MediaEncoder::stop` returns when capture has
/// stopped, not when the artifact is ready.
pub type ArtifactCallback = Box<dyn FnOnce(Vec<u8>) + Send + 'static>;

/// Encoder/muxer consuming the capture device's stream.
///
/// Mirrors the browser `MediaRecorder` contract: the final data blob is
/// emitted through the `ArtifactCallback` supplied at construction, exactly
/// once, some time after `stop()`. Only `stop` and `discard` may touch the
/// artifact continuation; `start`/`pause`/`resume` are plain control calls
/// and must not re-enter the session.
pub trait MediaEncoder: Send {
    fn start(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Stop encoding and flush the final data chunk to the artifact
    /// continuation.
    fn stop(&mut self);

    /// Stop encoding and drop the pending artifact without delivering it.
    /// Used when the session is cleared mid-recording. Idempotent.
    fn discard(&mut self);

    /// The content type this encoder produces (e.g. `audio/webm;codecs=opus`).
    fn mime_type(&self) -> String;
}
