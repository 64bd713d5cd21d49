use crate::models::artifact::DecodedAudio;
use crate::models::error::SessionError;

/// Continuation invoked when decoding resolves. May fire on any thread.
pub type DecodeCallback =
    Box<dyn FnOnce(Result<DecodedAudio, SessionError>) + Send + 'static>;

/// Opaque decoding service turning a recorded artifact into a sample-accurate
/// buffer.
///
/// Decoding has externally determined latency; failures are delivered through
/// the continuation as `SessionError::DecodeFailure`.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, bytes: Vec<u8>, on_done: DecodeCallback);
}
