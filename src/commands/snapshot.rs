use crate::concord::ConcordCam;
use crate::error::{ConcordError, Result};
use crate::protocol::unpack_envelope;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait Snapshot: Send + Sync {
    /// Capture a JPEG frame from a channel (0 = main, 1 = sub)
    async fn snapshot(&self, channel: u8) -> Result<Vec<u8>>;

    /// Capture a frame and write it to `path`; returns the frame bytes.
    /// The file is closed on every exit path, write failures included.
    async fn save_snapshot<P>(&self, channel: u8, path: P) -> Result<Vec<u8>>
    where
        P: AsRef<Path> + Send;
}

#[async_trait]
impl Snapshot for ConcordCam {
    async fn snapshot(&self, channel: u8) -> Result<Vec<u8>> {
        let (content_type, body) = self
            .fetch_bytes(&format!("/api/v1/snapshot?channel={}", channel))
            .await?;

        if content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
        {
            return Ok(body);
        }

        // Not an image; a camera-side failure comes back as an envelope,
        // so decode it to keep the typed error mapping.
        match unpack_envelope(&body) {
            Ok(_) => Err(ConcordError::ProtocolError(
                "Snapshot endpoint returned no image".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    async fn save_snapshot<P>(&self, channel: u8, path: P) -> Result<Vec<u8>>
    where
        P: AsRef<Path> + Send,
    {
        let frame = self.snapshot(channel).await?;
        tokio::fs::write(path, &frame).await?;
        Ok(frame)
    }
}
