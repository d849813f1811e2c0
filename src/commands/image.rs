use crate::concord::ConcordCam;
use crate::error::Result;
use crate::protocol::encode_patch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExposureMode {
    Auto,
    Manual,
}

/// Picture tuning record. Sliders are 0-100, toggles are the vendor's 0/1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSettings {
    pub brightness: u8,
    pub contrast: u8,
    pub saturation: u8,
    pub hue: u8,
    pub sharpness: u8,
    pub flip: u8,
    pub mirror: u8,
    pub wdr: u8,
    pub exposure_mode: ExposureMode,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wdr: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_mode: Option<ExposureMode>,
}

#[async_trait]
pub trait ImageControl: Send + Sync {
    /// Get image settings (brightness, contrast, ...)
    async fn get_image_settings(&self) -> Result<ImageSettings>;

    /// Apply a partial image-settings update
    async fn set_image_settings(&self, patch: &ImagePatch) -> Result<()>;
}

#[async_trait]
impl ImageControl for ConcordCam {
    async fn get_image_settings(&self) -> Result<ImageSettings> {
        self.fetch("/api/v1/image/settings").await
    }

    async fn set_image_settings(&self, patch: &ImagePatch) -> Result<()> {
        self.apply("/api/v1/image/settings", Some(encode_patch(patch)?))
            .await
    }
}
