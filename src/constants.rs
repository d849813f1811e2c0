use phf::phf_map;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Vendor result codes returned in the `{"result": N, "data": {...}}` envelope.
pub static RESULT_CODES: phf::Map<u32, &'static str> = phf_map! {
    0u32 => "OK",
    1u32 => "Invalid parameters",
    2u32 => "Authentication failure",
    3u32 => "Permission denied",
    4u32 => "Resource not found",
    5u32 => "Internal device error",
    6u32 => "Device busy",
};

pub const OK_CODE: u32 = 0;

pub const HTTP_PORT: u16 = 80;
pub const RTSP_PORT: u16 = 554;

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const USER_AGENT: &str = concat!("concord-cam/", env!("CARGO_PKG_VERSION"));
