//! Pure display formatters for the three clocks the host renders: decoded
//! recording duration, live recording elapsed time, and playback cursor.

/// Formats a decoded-recording duration in seconds as `M:SS`, growing to
/// `H:MM:SS` once the recording reaches an hour.
pub fn format_duration_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Formats elapsed recording time in milliseconds as `MM:SS`.
pub fn format_recording_time(ms: u128) -> String {
    let total = (ms / 1000) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Formats the playback cursor position in seconds as `MM:SS`.
pub fn format_recorded_audio_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Maps an encoder content type to a download filename extension.
///
/// Codec parameters after `;` are ignored. Unrecognized types fall back to
/// `.webm`, the default container of the reference encoder.
pub fn file_extension_from_mime(mime: &str) -> &'static str {
    let base = mime.split(';').next().unwrap_or("").trim();
    match base {
        "audio/webm" => ".webm",
        "audio/mp4" => ".mp4",
        "audio/mpeg" => ".mp3",
        "audio/ogg" => ".ogg",
        "audio/wav" | "audio/wave" | "audio/x-wav" => ".wav",
        "audio/aac" => ".aac",
        "audio/flac" => ".flac",
        _ => ".webm",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_under_an_hour() {
        assert_eq!(format_duration_time(0.0), "0:00");
        assert_eq!(format_duration_time(2.94), "0:02");
        assert_eq!(format_duration_time(65.0), "1:05");
        assert_eq!(format_duration_time(599.9), "9:59");
    }

    #[test]
    fn duration_with_hours() {
        assert_eq!(format_duration_time(3600.0), "1:00:00");
        assert_eq!(format_duration_time(3723.0), "1:02:03");
    }

    #[test]
    fn duration_negative_clamped() {
        assert_eq!(format_duration_time(-5.0), "0:00");
    }

    #[test]
    fn recording_time_from_millis() {
        assert_eq!(format_recording_time(0), "00:00");
        assert_eq!(format_recording_time(999), "00:00");
        assert_eq!(format_recording_time(61_000), "01:01");
        assert_eq!(format_recording_time(3_599_000), "59:59");
    }

    #[test]
    fn playback_cursor() {
        assert_eq!(format_recorded_audio_time(0.0), "00:00");
        assert_eq!(format_recorded_audio_time(12.7), "00:12");
        assert_eq!(format_recorded_audio_time(75.2), "01:15");
    }

    #[test]
    fn mime_extensions() {
        assert_eq!(file_extension_from_mime("audio/webm"), ".webm");
        assert_eq!(file_extension_from_mime("audio/webm;codecs=opus"), ".webm");
        assert_eq!(file_extension_from_mime("audio/mp4"), ".mp4");
        assert_eq!(file_extension_from_mime("audio/ogg; codecs=vorbis"), ".ogg");
        assert_eq!(file_extension_from_mime("audio/wave"), ".wav");
    }

    #[test]
    fn unknown_mime_falls_back() {
        assert_eq!(file_extension_from_mime(""), ".webm");
        assert_eq!(file_extension_from_mime("video/mp2t"), ".webm");
    }
}
