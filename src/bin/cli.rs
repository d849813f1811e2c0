use clap::{Parser, Subcommand};
use concord_cam::commands::{
    Audio, AudioCodec, AudioPatch, BitrateControl, ExposureMode, ImageControl, ImagePatch,
    Maintenance, MotionDetection, MotionPatch, MotionRegion, Network, NetworkPatch, Osd,
    OsdPatch, OsdPosition, Quality, Snapshot, SystemInfo, Video, VideoCodec, VideoStreamPatch,
    SPS_PPS_WARNING,
};
use concord_cam::error::{ConcordError, Result};
use concord_cam::ConcordCam;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "concord-cam",
    version,
    about = "Configure Concord / Juan Optical IP cameras over their HTTP API"
)]
struct Cli {
    /// Camera IP address or hostname
    #[arg(short = 'i', long)]
    ip: String,

    /// Username (default: admin)
    #[arg(short = 'u', long, default_value = "admin")]
    username: String,

    /// Password (default: empty)
    #[arg(short = 'p', long, default_value = "")]
    password: String,

    /// HTTP port
    #[arg(long, default_value_t = 80)]
    port: u16,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get system information
    Info,

    /// Get network settings
    Network,

    /// Set network settings
    SetNetwork {
        /// Enable DHCP (0 or 1)
        #[arg(long)]
        dhcp: Option<u8>,
        /// Static IP address
        #[arg(long)]
        ip: Option<String>,
        /// Network mask
        #[arg(long)]
        netmask: Option<String>,
        /// Gateway IP
        #[arg(long)]
        gateway: Option<String>,
        /// Primary DNS
        #[arg(long)]
        dns1: Option<String>,
        /// Secondary DNS
        #[arg(long)]
        dns2: Option<String>,
    },

    /// Get video stream settings
    Video {
        /// Channel (0 = main, 1 = sub)
        #[arg(long, default_value_t = 0)]
        channel: u8,
    },

    /// Set video stream settings
    SetVideo {
        /// Channel (0 = main, 1 = sub)
        #[arg(long, default_value_t = 0)]
        channel: u8,
        /// Video codec (H264 or H265)
        #[arg(long)]
        codec: Option<VideoCodec>,
        /// Resolution (e.g. 3840x2160)
        #[arg(long)]
        resolution: Option<String>,
        /// Frames per second
        #[arg(long)]
        fps: Option<u32>,
        /// Bitrate in kbps
        #[arg(long)]
        bitrate: Option<u32>,
        /// Bitrate control mode (CBR or VBR)
        #[arg(long)]
        bitrate_control: Option<BitrateControl>,
        /// Quality preset (low, medium, high)
        #[arg(long)]
        quality: Option<Quality>,
        /// Group-of-pictures size
        #[arg(long)]
        gop: Option<u32>,
    },

    /// Get image settings
    Image,

    /// Set image settings
    SetImage {
        /// Brightness (0-100)
        #[arg(long)]
        brightness: Option<u8>,
        /// Contrast (0-100)
        #[arg(long)]
        contrast: Option<u8>,
        /// Saturation (0-100)
        #[arg(long)]
        saturation: Option<u8>,
        /// Hue (0-100)
        #[arg(long)]
        hue: Option<u8>,
        /// Sharpness (0-100)
        #[arg(long)]
        sharpness: Option<u8>,
        /// Flip image vertically (0 or 1)
        #[arg(long)]
        flip: Option<u8>,
        /// Mirror image horizontally (0 or 1)
        #[arg(long)]
        mirror: Option<u8>,
        /// Wide dynamic range (0 or 1)
        #[arg(long)]
        wdr: Option<u8>,
        /// Exposure mode (auto or manual)
        #[arg(long)]
        exposure_mode: Option<ExposureMode>,
    },

    /// Get motion detection settings
    Motion,

    /// Set motion detection settings
    SetMotion {
        /// Enable motion detection (0 or 1)
        #[arg(long)]
        enabled: Option<u8>,
        /// Sensitivity (0-100)
        #[arg(long)]
        sensitivity: Option<u8>,
        /// Detection region as x,y,width,height (repeatable; replaces all regions)
        #[arg(long = "region")]
        regions: Vec<MotionRegion>,
    },

    /// Get OSD settings
    Osd,

    /// Set OSD settings
    SetOsd {
        /// Camera name text
        #[arg(long)]
        camera_name: Option<String>,
        /// Show time overlay (0 or 1)
        #[arg(long = "show-time")]
        time_enabled: Option<u8>,
        /// Show camera name overlay (0 or 1)
        #[arg(long = "show-name")]
        camera_name_enabled: Option<u8>,
        /// Time overlay position (top_left, top_right, bottom_left, bottom_right)
        #[arg(long)]
        time_position: Option<OsdPosition>,
        /// Camera name overlay position
        #[arg(long)]
        name_position: Option<OsdPosition>,
        /// Time format string
        #[arg(long)]
        time_format: Option<String>,
    },

    /// Get audio settings
    Audio {
        /// Channel (0 = main, 1 = sub)
        #[arg(long, default_value_t = 0)]
        channel: u8,
    },

    /// Set audio settings
    SetAudio {
        /// Channel (0 = main, 1 = sub)
        #[arg(long, default_value_t = 0)]
        channel: u8,
        /// Enable audio (0 or 1)
        #[arg(long)]
        enabled: Option<u8>,
        /// Audio codec (G711A or AAC)
        #[arg(long)]
        codec: Option<AudioCodec>,
        /// Sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,
        /// Bitrate in kbps
        #[arg(long)]
        bitrate: Option<u32>,
        /// Input (microphone) volume (0-100)
        #[arg(long)]
        input_volume: Option<u8>,
        /// Output (speaker) volume (0-100)
        #[arg(long)]
        output_volume: Option<u8>,
    },

    /// Capture a JPEG snapshot
    Snapshot {
        /// Channel (0 = main, 1 = sub)
        #[arg(long, default_value_t = 0)]
        channel: u8,
        /// Output file; omit to write raw JPEG bytes to stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print the RTSP stream URL (no network call)
    RtspUrl {
        /// Stream channel (1 = main, 2 = sub)
        #[arg(long, default_value_t = 1)]
        channel: u8,
        /// Exclude credentials from the URL
        #[arg(long)]
        no_auth: bool,
    },

    /// Reboot the camera
    Reboot {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Factory reset (WARNING: erases all settings!)
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    let cam = ConcordCam::new(&cli.ip)
        .with_port(cli.port)
        .with_credentials(&cli.username, &cli.password)
        .with_timeout(Duration::from_secs(cli.timeout));

    match cli.command {
        Command::Info => print_record(&cam.get_system_info().await?),
        Command::Network => print_record(&cam.get_network_settings().await?),
        Command::SetNetwork {
            dhcp,
            ip,
            netmask,
            gateway,
            dns1,
            dns2,
        } => {
            let patch = NetworkPatch {
                dhcp,
                ip,
                netmask,
                gateway,
                dns1,
                dns2,
            };
            cam.set_network_settings(&patch).await?;
            println!("Network settings applied");
            Ok(())
        }
        Command::Video { channel } => print_record(&cam.get_video_stream(channel).await?),
        Command::SetVideo {
            channel,
            codec,
            resolution,
            fps,
            bitrate,
            bitrate_control,
            quality,
            gop,
        } => {
            let patch = VideoStreamPatch {
                codec,
                resolution,
                fps,
                bitrate,
                bitrate_control,
                quality,
                gop,
            };
            cam.set_video_stream(channel, &patch).await?;
            println!("Video settings applied to channel {}", channel);
            Ok(())
        }
        Command::Image => print_record(&cam.get_image_settings().await?),
        Command::SetImage {
            brightness,
            contrast,
            saturation,
            hue,
            sharpness,
            flip,
            mirror,
            wdr,
            exposure_mode,
        } => {
            let patch = ImagePatch {
                brightness,
                contrast,
                saturation,
                hue,
                sharpness,
                flip,
                mirror,
                wdr,
                exposure_mode,
            };
            cam.set_image_settings(&patch).await?;
            println!("Image settings applied");
            Ok(())
        }
        Command::Motion => print_record(&cam.get_motion_detection().await?),
        Command::SetMotion {
            enabled,
            sensitivity,
            regions,
        } => {
            let patch = MotionPatch {
                enabled,
                sensitivity,
                regions: if regions.is_empty() {
                    None
                } else {
                    Some(regions)
                },
            };
            cam.set_motion_detection(&patch).await?;
            println!("Motion detection settings applied");
            Ok(())
        }
        Command::Osd => print_record(&cam.get_osd_settings().await?),
        Command::SetOsd {
            camera_name,
            time_enabled,
            camera_name_enabled,
            time_position,
            name_position,
            time_format,
        } => {
            let patch = OsdPatch {
                time_enabled,
                time_position,
                time_format,
                camera_name,
                camera_name_enabled,
                camera_name_position: name_position,
            };
            cam.set_osd_settings(&patch).await?;
            println!("OSD settings applied");
            Ok(())
        }
        Command::Audio { channel } => print_record(&cam.get_audio_settings(channel).await?),
        Command::SetAudio {
            channel,
            enabled,
            codec,
            sample_rate,
            bitrate,
            input_volume,
            output_volume,
        } => {
            let patch = AudioPatch {
                enabled,
                codec,
                sample_rate,
                bitrate,
                input_volume,
                output_volume,
            };
            cam.set_audio_settings(channel, &patch).await?;
            println!("Audio settings applied to channel {}", channel);
            Ok(())
        }
        Command::Snapshot { channel, output } => match output {
            Some(path) => {
                eprintln!("Capturing snapshot from channel {}...", channel);
                let frame = cam.save_snapshot(channel, &path).await?;
                eprintln!("Snapshot saved to {} ({} bytes)", path.display(), frame.len());
                Ok(())
            }
            None => {
                let frame = cam.snapshot(channel).await?;
                let mut stdout = io::stdout().lock();
                stdout.write_all(&frame)?;
                stdout.flush()?;
                Ok(())
            }
        },
        Command::RtspUrl { channel, no_auth } => {
            println!("{}", cam.rtsp_url(channel, !no_auth));
            eprintln!("{}", SPS_PPS_WARNING);
            Ok(())
        }
        Command::Reboot { yes } => {
            if !yes {
                let answer = prompt_line("Are you sure you want to reboot the camera? (yes/no)")?;
                if !answer.eq_ignore_ascii_case("yes") {
                    println!("Reboot cancelled");
                    return Ok(());
                }
            }
            cam.reboot().await?;
            println!("Reboot requested");
            Ok(())
        }
        Command::Reset { yes } => {
            if !yes {
                println!("WARNING: this will erase ALL camera settings and return to factory defaults!");
                // Destructive confirmation must be typed exactly.
                if prompt_line("Type 'FACTORY RESET' to confirm")? != "FACTORY RESET" {
                    println!("Factory reset cancelled");
                    return Ok(());
                }
            }
            cam.factory_reset().await?;
            println!("Factory reset requested");
            Ok(())
        }
    }
}

fn print_record<T: Serialize>(record: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(record)
        .map_err(|e| ConcordError::ProtocolError(format!("Error encoding output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}: ", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
