pub mod audio;
pub mod image;
pub mod maintenance;
pub mod motion;
pub mod network;
pub mod osd;
pub mod rtsp;
pub mod snapshot;
pub mod system_info;
pub mod video;

pub use audio::*;
pub use image::*;
pub use maintenance::*;
pub use motion::*;
pub use network::*;
pub use osd::*;
pub use rtsp::*;
pub use snapshot::*;
pub use system_info::*;
pub use video::*;
