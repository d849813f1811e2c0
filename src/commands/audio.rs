use crate::concord::ConcordCam;
use crate::error::Result;
use crate::protocol::encode_patch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum AudioCodec {
    #[serde(rename = "G711A")]
    #[strum(serialize = "G711A")]
    G711a,
    #[serde(rename = "AAC")]
    #[strum(serialize = "AAC")]
    Aac,
}

/// Audio encoder configuration for one stream channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    pub channel: u8,
    pub enabled: u8,
    pub codec: AudioCodec,
    /// Hz.
    pub sample_rate: u32,
    /// kbit/s.
    pub bitrate: u32,
    pub input_volume: u8,
    pub output_volume: u8,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AudioPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<AudioCodec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_volume: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_volume: Option<u8>,
}

#[async_trait]
pub trait Audio: Send + Sync {
    /// Get audio settings for a channel (0 = main, 1 = sub)
    async fn get_audio_settings(&self, channel: u8) -> Result<AudioSettings>;

    /// Apply a partial audio update to a channel
    async fn set_audio_settings(&self, channel: u8, patch: &AudioPatch) -> Result<()>;
}

#[async_trait]
impl Audio for ConcordCam {
    async fn get_audio_settings(&self, channel: u8) -> Result<AudioSettings> {
        self.fetch(&format!("/api/v1/audio/settings?channel={}", channel))
            .await
    }

    async fn set_audio_settings(&self, channel: u8, patch: &AudioPatch) -> Result<()> {
        let mut body = encode_patch(patch)?;
        body["channel"] = channel.into();
        self.apply("/api/v1/audio/settings", Some(body)).await
    }
}
