use crate::concord::ConcordCam;
use crate::error::Result;
use crate::protocol::encode_patch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Full network configuration as reported by the camera.
///
/// `dhcp` is the vendor's 0/1 flag; when it is 1 the static fields are
/// still reported but ignored by the camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub dhcp: u8,
    pub ip: String,
    pub netmask: String,
    pub gateway: String,
    pub dns1: String,
    pub dns2: String,
    pub http_port: u16,
    pub rtsp_port: u16,
}

/// Partial update for the network endpoint; unset fields are not sent and
/// the camera keeps their current values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns2: Option<String>,
}

#[async_trait]
pub trait Network: Send + Sync {
    /// Get network settings
    async fn get_network_settings(&self) -> Result<NetworkSettings>;

    /// Apply a partial network update. The client performs no cross-field
    /// validation; the camera is the source of truth for consistency.
    async fn set_network_settings(&self, patch: &NetworkPatch) -> Result<()>;
}

#[async_trait]
impl Network for ConcordCam {
    async fn get_network_settings(&self) -> Result<NetworkSettings> {
        self.fetch("/api/v1/system/network").await
    }

    async fn set_network_settings(&self, patch: &NetworkPatch) -> Result<()> {
        self.apply("/api/v1/system/network", Some(encode_patch(patch)?))
            .await
    }
}
