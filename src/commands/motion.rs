use crate::concord::ConcordCam;
use crate::error::Result;
use crate::protocol::encode_patch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One rectangular detection region, in pixels of the main stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// Accepts the CLI spelling `x,y,width,height`.
impl FromStr for MotionRegion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| format!("Invalid region '{}', expected x,y,width,height", s))?;
        match parts.as_slice() {
            [x, y, width, height] => Ok(MotionRegion {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            }),
            _ => Err(format!("Invalid region '{}', expected x,y,width,height", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    pub enabled: u8,
    pub sensitivity: u8,
    #[serde(default)]
    pub regions: Vec<MotionRegion>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MotionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<u8>,
    /// `Some(vec![])` clears all regions; `None` leaves them untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<MotionRegion>>,
}

#[async_trait]
pub trait MotionDetection: Send + Sync {
    /// Get motion detection settings
    async fn get_motion_detection(&self) -> Result<MotionConfig>;

    /// Apply a partial motion-detection update
    async fn set_motion_detection(&self, patch: &MotionPatch) -> Result<()>;
}

#[async_trait]
impl MotionDetection for ConcordCam {
    async fn get_motion_detection(&self) -> Result<MotionConfig> {
        self.fetch("/api/v1/motion/detection").await
    }

    async fn set_motion_detection(&self, patch: &MotionPatch) -> Result<()> {
        self.apply("/api/v1/motion/detection", Some(encode_patch(patch)?))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn region_parses_from_cli_spelling() {
        let region: MotionRegion = "0, 0, 640,360".parse().unwrap();
        assert_eq!(
            region,
            MotionRegion {
                x: 0,
                y: 0,
                width: 640,
                height: 360
            }
        );
        assert!("0,0,640".parse::<MotionRegion>().is_err());
        assert!("a,b,c,d".parse::<MotionRegion>().is_err());
    }

    #[test]
    fn explicit_empty_region_list_is_sent() {
        let patch = MotionPatch {
            regions: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"regions": []})
        );
    }
}
