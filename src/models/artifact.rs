use serde::{Deserialize, Serialize};

/// Fixed compensation subtracted from the decoder-reported duration.
///
/// Empirically measured container-header skew for the default encoder. This
/// is environment/encoder-dependent, not a universal truth; validate against
/// the target decoder before relying on it elsewhere.
pub const ENCODER_DURATION_SKEW_SECS: f64 = 0.06;

/// The raw encoded bytes produced by a finished capture, plus the encoder's
/// declared content type and export metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub metadata: ArtifactMetadata,
}

impl RecordedArtifact {
    pub fn new(bytes: Vec<u8>, mime_type: String) -> Self {
        let metadata = ArtifactMetadata::new(&mime_type, bytes.len());
        Self {
            bytes,
            mime_type,
            metadata,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Metadata describing a recorded artifact.
///
/// Serializable for JSON export to the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: String,
    pub created_at: String,
    pub mime_type: String,
    pub size_bytes: usize,
}

impl ArtifactMetadata {
    pub fn new(mime_type: &str, size_bytes: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            mime_type: mime_type.to_string(),
            size_bytes,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The sample-accurate in-memory form of a decoded artifact.
///
/// Enables playback and duration queries; samples are interleaved f32.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: f64,
    pub channels: u16,
    /// Duration as reported by the decoder, before skew compensation.
    pub duration_secs: f64,
}

impl DecodedAudio {
    /// Duration shown to the user: decoder duration minus the fixed encoder
    /// skew, never negative.
    pub fn display_duration(&self) -> f64 {
        (self.duration_secs - ENCODER_DURATION_SKEW_SECS).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn decoded(duration_secs: f64) -> DecodedAudio {
        DecodedAudio {
            samples: vec![0.0; 480],
            sample_rate: 48000.0,
            channels: 1,
            duration_secs,
        }
    }

    #[test]
    fn display_duration_subtracts_skew() {
        assert_abs_diff_eq!(decoded(3.0).display_duration(), 2.94, epsilon = 1e-9);
    }

    #[test]
    fn display_duration_never_negative() {
        assert_eq!(decoded(0.05).display_duration(), 0.0);
        assert_eq!(decoded(0.0).display_duration(), 0.0);
    }

    #[test]
    fn metadata_json_round_trip() {
        let artifact = RecordedArtifact::new(vec![1, 2, 3], "audio/webm".into());
        let json = artifact.metadata.to_json().unwrap();
        let parsed: ArtifactMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, artifact.metadata);
        assert_eq!(parsed.size_bytes, 3);
        assert_eq!(parsed.mime_type, "audio/webm");
    }
}
