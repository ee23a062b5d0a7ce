//! Media file probing via ffprobe.
//!
//! Probing queries a file's stream/format metadata without decoding its
//! content: one `ffprobe` run with JSON output, parsed into [`ProbeData`].

use serde::Deserialize;
use std::path::Path;

use crate::command::Cmd;
use crate::Result;

/// Parsed output of an ffprobe run.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeData {
    /// Container-level fields (`-show_format`).
    pub format: Option<FormatData>,
    /// One entry per stream (`-show_streams`).
    #[serde(default)]
    pub streams: Vec<StreamData>,
}

/// Container-level metadata. ffprobe reports numeric fields as strings;
/// accessors on [`ProbeData`] parse them.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatData {
    pub format_name: Option<String>,
    pub duration: Option<String>,
    pub size: Option<String>,
    pub nb_streams: Option<u32>,
}

/// Per-stream metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamData {
    pub index: u32,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration: Option<String>,
    pub nb_frames: Option<String>,
    pub r_frame_rate: Option<String>,
    pub channels: Option<u32>,
    pub sample_rate: Option<String>,
}

impl ProbeData {
    /// The first video stream, if any.
    pub fn primary_video(&self) -> Option<&StreamData> {
        self.streams.iter().find(|s| s.is_video())
    }

    /// The first audio stream, if any.
    pub fn primary_audio(&self) -> Option<&StreamData> {
        self.streams.iter().find(|s| s.is_audio())
    }

    /// Duration in seconds: the container figure when present, otherwise the
    /// first stream that reports one.
    pub fn duration_secs(&self) -> Option<f64> {
        let container = self
            .format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(|s| s.parse().ok());
        container.or_else(|| self.streams.iter().find_map(|s| s.duration_secs()))
    }
}

impl StreamData {
    /// Whether this is a video stream.
    pub fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }

    /// Whether this is an audio stream.
    pub fn is_audio(&self) -> bool {
        self.codec_type.as_deref() == Some("audio")
    }

    /// Stream duration in seconds, if reported.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.as_deref().and_then(|s| s.parse().ok())
    }

    /// Number of frames, if reported.
    pub fn frame_count(&self) -> Option<u64> {
        self.nb_frames.as_deref().and_then(|s| s.parse().ok())
    }

    /// Frame rate in frames per second, if reported.
    pub fn frame_rate(&self) -> Option<f64> {
        self.r_frame_rate.as_deref().and_then(parse_frame_rate)
    }
}

/// Probe a media file.
pub fn probe(path: &Path) -> Result<ProbeData> {
    let json = Cmd::ffprobe()
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .run_captured()?;
    parse(&json)
}

fn parse(json: &str) -> Result<ProbeData> {
    Ok(serde_json::from_str(json)?)
}

fn parse_frame_rate(rate: &str) -> Option<f64> {
    let parts: Vec<&str> = rate.split('/').collect();
    if parts.len() == 2 {
        let num: f64 = parts[0].parse().ok()?;
        let den: f64 = parts[1].parse().ok()?;
        if den != 0.0 {
            return Some(num / den);
        }
    }
    rate.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_type": "video",
                "codec_name": "h264",
                "width": 1280,
                "height": 720,
                "duration": "5.280000",
                "nb_frames": "132",
                "r_frame_rate": "30000/1001"
            },
            {
                "index": 1,
                "codec_type": "audio",
                "codec_name": "aac",
                "channels": 2,
                "sample_rate": "44100",
                "duration": "5.312000"
            }
        ],
        "format": {
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "5.312000",
            "size": "1055736",
            "nb_streams": 2
        }
    }"#;

    #[test]
    fn parses_streams_and_format() {
        let data = parse(FIXTURE).unwrap();

        let video = data.primary_video().unwrap();
        assert_eq!(video.codec_name.as_deref(), Some("h264"));
        assert_eq!(video.width, Some(1280));
        assert_eq!(video.height, Some(720));
        assert_eq!(video.frame_count(), Some(132));
        assert!((video.frame_rate().unwrap() - 29.97).abs() < 0.01);

        let audio = data.primary_audio().unwrap();
        assert_eq!(audio.channels, Some(2));
        assert_eq!(audio.sample_rate.as_deref(), Some("44100"));
    }

    #[test]
    fn container_duration_takes_precedence() {
        let data = parse(FIXTURE).unwrap();
        assert_eq!(data.duration_secs(), Some(5.312));
    }

    #[test]
    fn stream_duration_is_the_fallback() {
        let data = parse(
            r#"{"streams": [{"index": 0, "codec_type": "video", "duration": "2.5"}]}"#,
        )
        .unwrap();
        assert_eq!(data.duration_secs(), Some(2.5));
    }

    #[test]
    fn tolerates_missing_fields() {
        let data = parse("{}").unwrap();
        assert!(data.format.is_none());
        assert!(data.streams.is_empty());
        assert_eq!(data.duration_secs(), None);
        assert!(data.primary_video().is_none());
    }

    #[test]
    fn rejects_non_json_output() {
        let err = parse("not json").unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[test]
    fn frame_rate_parsing() {
        assert_eq!(parse_frame_rate("24000/1001"), Some(23.976023976023978));
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        assert_eq!(parse_frame_rate("30/0"), None);
        assert_eq!(parse_frame_rate("invalid"), None);
    }
}
