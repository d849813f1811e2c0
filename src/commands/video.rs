use crate::concord::ConcordCam;
use crate::error::Result;
use crate::protocol::encode_patch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum VideoCodec {
    H264,
    H265,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum BitrateControl {
    Cbr,
    Vbr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Quality {
    Low,
    Medium,
    High,
}

/// Encoder configuration for one stream channel (0 = main, 1 = sub).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamSettings {
    pub channel: u8,
    pub codec: VideoCodec,
    /// `<width>x<height>`, e.g. `3840x2160`.
    pub resolution: String,
    pub fps: u32,
    /// kbit/s.
    pub bitrate: u32,
    pub bitrate_control: BitrateControl,
    pub quality: Quality,
    pub gop: u32,
}

/// Partial update for one stream channel; the channel identifier is added
/// by the setter, everything else is optional.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VideoStreamPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<VideoCodec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_control: Option<BitrateControl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gop: Option<u32>,
}

#[async_trait]
pub trait Video: Send + Sync {
    /// Get stream settings for a channel (0 = main, 1 = sub)
    async fn get_video_stream(&self, channel: u8) -> Result<VideoStreamSettings>;

    /// Apply a partial stream update to a channel
    async fn set_video_stream(&self, channel: u8, patch: &VideoStreamPatch) -> Result<()>;
}

#[async_trait]
impl Video for ConcordCam {
    async fn get_video_stream(&self, channel: u8) -> Result<VideoStreamSettings> {
        self.fetch(&format!("/api/v1/video/stream?channel={}", channel))
            .await
    }

    async fn set_video_stream(&self, channel: u8, patch: &VideoStreamPatch) -> Result<()> {
        let mut body = encode_patch(patch)?;
        body["channel"] = channel.into();
        self.apply("/api/v1/video/stream", Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn patch_carries_only_supplied_fields() {
        let patch = VideoStreamPatch {
            bitrate: Some(4096),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"bitrate": 4096}));
    }

    #[test]
    fn enums_use_vendor_spellings_on_the_wire() {
        assert_eq!(
            serde_json::to_value(VideoCodec::H265).unwrap(),
            json!("H265")
        );
        assert_eq!(
            serde_json::to_value(BitrateControl::Vbr).unwrap(),
            json!("VBR")
        );
        assert_eq!(serde_json::to_value(Quality::High).unwrap(), json!("high"));
    }

    #[test]
    fn enums_parse_case_insensitively_for_the_cli() {
        assert_eq!(VideoCodec::from_str("h264").unwrap(), VideoCodec::H264);
        assert_eq!(
            BitrateControl::from_str("cbr").unwrap(),
            BitrateControl::Cbr
        );
        assert_eq!(Quality::from_str("MEDIUM").unwrap(), Quality::Medium);
    }

    #[test]
    fn settings_record_round_trips() {
        let settings: VideoStreamSettings = serde_json::from_value(json!({
            "channel": 0,
            "codec": "H264",
            "resolution": "3840x2160",
            "fps": 25,
            "bitrate": 4096,
            "bitrate_control": "CBR",
            "quality": "high",
            "gop": 50
        }))
        .unwrap();
        assert_eq!(settings.codec, VideoCodec::H264);
        assert_eq!(settings.bitrate_control, BitrateControl::Cbr);
        assert_eq!(settings.quality, Quality::High);
    }
}
