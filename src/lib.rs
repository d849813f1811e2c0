pub mod commands;
pub mod concord;
pub mod constants;
pub mod error;
pub mod protocol;

pub use commands::*;
pub use concord::ConcordCam;
pub use error::{ConcordError, Result};
