use crate::concord::ConcordCam;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Maintenance: Send + Sync {
    /// Reboot the camera
    async fn reboot(&self) -> Result<()>;

    /// Factory reset: erases all settings
    async fn factory_reset(&self) -> Result<()>;
}

#[async_trait]
impl Maintenance for ConcordCam {
    async fn reboot(&self) -> Result<()> {
        self.apply("/api/v1/system/reboot", None).await
    }

    async fn factory_reset(&self) -> Result<()> {
        self.apply("/api/v1/system/reset", None).await
    }
}
