use crate::concord::ConcordCam;
use crate::constants::DATE_FORMAT;
use crate::error::{ConcordError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read-only device identity and status record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInformation {
    pub model: String,
    pub hardware_version: String,
    pub firmware_version: String,
    pub serial_number: String,
    /// Seconds since boot.
    pub uptime: u64,
    /// Camera wall clock, vendor formatted (`%Y-%m-%d %H:%M:%S`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_time: Option<String>,
}

impl SystemInformation {
    pub fn uptime(&self) -> Duration {
        Duration::from_secs(self.uptime)
    }

    /// Parse the camera wall clock into local time.
    pub fn system_time(&self) -> Result<Option<DateTime<Local>>> {
        let Some(raw) = &self.system_time else {
            return Ok(None);
        };
        let naive = NaiveDateTime::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
            ConcordError::ProtocolError(format!("Error parsing system time: {}", e))
        })?;
        Ok(Some(DateTime::from_naive_utc_and_offset(
            naive,
            *Local::now().offset(),
        )))
    }
}

#[async_trait]
pub trait SystemInfo: Send + Sync {
    /// Get model, hardware/firmware versions, serial number and uptime
    async fn get_system_info(&self) -> Result<SystemInformation>;
}

#[async_trait]
impl SystemInfo for ConcordCam {
    async fn get_system_info(&self) -> Result<SystemInformation> {
        self.fetch("/api/v1/system/info").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_time_parses_vendor_format() {
        let info: SystemInformation = serde_json::from_str(
            r#"{
                "model": "CNC81BA-V4",
                "hardware_version": "1.0",
                "firmware_version": "3.2.1",
                "serial_number": "JA4K000123",
                "uptime": 86400,
                "system_time": "2024-05-01 12:30:00"
            }"#,
        )
        .unwrap();

        assert_eq!(info.uptime(), Duration::from_secs(86400));
        let time = info.system_time().unwrap().unwrap();
        assert_eq!(
            time.naive_utc().format(DATE_FORMAT).to_string(),
            "2024-05-01 12:30:00"
        );
    }

    #[test]
    fn system_time_is_optional() {
        let info: SystemInformation = serde_json::from_str(
            r#"{
                "model": "CNC81BA-V4",
                "hardware_version": "1.0",
                "firmware_version": "3.2.1",
                "serial_number": "JA4K000123",
                "uptime": 12
            }"#,
        )
        .unwrap();
        assert!(info.system_time().unwrap().is_none());
    }
}
