use crate::concord::ConcordCam;
use crate::error::Result;
use crate::protocol::encode_patch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OsdPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// On-screen display overlay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsdSettings {
    pub time_enabled: u8,
    pub time_position: OsdPosition,
    pub time_format: String,
    pub camera_name: String,
    pub camera_name_enabled: u8,
    pub camera_name_position: OsdPosition,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OsdPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_enabled: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_position: Option<OsdPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_name_enabled: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_name_position: Option<OsdPosition>,
}

#[async_trait]
pub trait Osd: Send + Sync {
    /// Get OSD settings
    async fn get_osd_settings(&self) -> Result<OsdSettings>;

    /// Apply a partial OSD update
    async fn set_osd_settings(&self, patch: &OsdPatch) -> Result<()>;
}

#[async_trait]
impl Osd for ConcordCam {
    async fn get_osd_settings(&self) -> Result<OsdSettings> {
        self.fetch("/api/v1/osd/settings").await
    }

    async fn set_osd_settings(&self, patch: &OsdPatch) -> Result<()> {
        self.apply("/api/v1/osd/settings", Some(encode_patch(patch)?))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn positions_use_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_value(OsdPosition::BottomRight).unwrap(),
            json!("bottom_right")
        );
        assert_eq!("top_left".parse::<OsdPosition>().unwrap(), OsdPosition::TopLeft);
    }
}
