use clap::Parser;
use concord_cam::commands::{
    ImageControl, MotionDetection, Network, Osd, Snapshot, SystemInfo, Video, SPS_PPS_WARNING,
};
use concord_cam::constants::RTSP_PORT;
use concord_cam::ConcordCam;
use std::process::ExitCode;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

/// Port of the community diagnostic script: probes connectivity, checks
/// authentication and enumerates every setting group to help troubleshoot
/// a camera.
#[derive(Parser, Debug)]
#[command(
    name = "concord-diagnose",
    version,
    about = "Run connectivity and configuration diagnostics against a camera"
)]
struct Cli {
    /// Camera IP address or hostname
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
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if diagnose(&cli).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn port_reachable(host: &str, port: u16, wait: Duration) -> bool {
    matches!(
        timeout(wait, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}

async fn diagnose(cli: &Cli) -> bool {
    println!("Diagnosing camera at {}", cli.ip);
    println!("{}", "=".repeat(60));

    let probe_wait = Duration::from_secs(5);

    println!("\n1. Network connectivity");
    if port_reachable(&cli.ip, cli.port, probe_wait).await {
        println!("  ✓ Port {} reachable", cli.port);
    } else {
        println!("  ✗ Cannot connect to port {}", cli.port);
        return false;
    }

    println!("\n2. RTSP port");
    if port_reachable(&cli.ip, RTSP_PORT, probe_wait).await {
        println!("  ✓ Port {} (RTSP) reachable", RTSP_PORT);
    } else {
        println!("  ⚠ Port {} (RTSP) not reachable", RTSP_PORT);
    }

    let cam = ConcordCam::new(&cli.ip)
        .with_port(cli.port)
        .with_credentials(&cli.username, &cli.password)
        .with_timeout(Duration::from_secs(cli.timeout));

    println!("\n3. Authentication");
    let info = match cam.get_system_info().await {
        Ok(info) => {
            println!("  ✓ Authentication successful");
            info
        }
        Err(e) => {
            println!("  ✗ Authentication failed: {}", e);
            println!("\nTroubleshooting tips:");
            println!("  - Verify the camera IP address");
            println!("  - Try the default credentials: admin / (empty)");
            println!("  - Check whether the password was changed");
            println!("  - Consider a factory reset");
            return false;
        }
    };

    println!("\n4. System information");
    println!("  Model: {}", info.model);
    println!("  Hardware version: {}", info.hardware_version);
    println!("  Firmware version: {}", info.firmware_version);
    println!("  Serial number: {}", info.serial_number);
    println!("  Uptime: {} seconds", info.uptime);

    println!("\n5. Network settings");
    match cam.get_network_settings().await {
        Ok(network) => {
            println!("  IP address: {}", network.ip);
            println!("  Netmask: {}", network.netmask);
            println!("  Gateway: {}", network.gateway);
            println!("  DNS1: {}", network.dns1);
            println!("  DNS2: {}", network.dns2);
            println!(
                "  DHCP: {}",
                if network.dhcp != 0 { "Enabled" } else { "Disabled" }
            );
            println!("  HTTP port: {}", network.http_port);
            println!("  RTSP port: {}", network.rtsp_port);
        }
        Err(e) => println!("  ✗ Error getting network settings: {}", e),
    }

    println!("\n6. Video settings");
    match cam.get_video_stream(0).await {
        Ok(video) => {
            println!("  Main stream:");
            println!("    Codec: {}", video.codec);
            println!("    Resolution: {}", video.resolution);
            println!("    FPS: {}", video.fps);
            println!("    Bitrate: {} kbps", video.bitrate);
            println!("    Quality: {}", video.quality);
        }
        Err(e) => println!("  ✗ Error getting video settings: {}", e),
    }
    match cam.get_video_stream(1).await {
        Ok(video) => {
            println!("  Sub stream:");
            println!("    Codec: {}", video.codec);
            println!("    Resolution: {}", video.resolution);
            println!("    FPS: {}", video.fps);
            println!("    Bitrate: {} kbps", video.bitrate);
        }
        Err(e) => println!("  Sub stream not available: {}", e),
    }

    println!("\n7. Image settings");
    match cam.get_image_settings().await {
        Ok(image) => {
            println!("  Brightness: {}", image.brightness);
            println!("  Contrast: {}", image.contrast);
            println!("  Saturation: {}", image.saturation);
            println!("  Sharpness: {}", image.sharpness);
            println!(
                "  WDR: {}",
                if image.wdr != 0 { "Enabled" } else { "Disabled" }
            );
            println!("  Exposure mode: {}", image.exposure_mode);
        }
        Err(e) => println!("  ⚠ Error getting image settings: {}", e),
    }

    println!("\n8. Motion detection");
    match cam.get_motion_detection().await {
        Ok(motion) => {
            println!(
                "  Enabled: {}",
                if motion.enabled != 0 { "Yes" } else { "No" }
            );
            println!("  Sensitivity: {}", motion.sensitivity);
            println!("  Regions: {} configured", motion.regions.len());
        }
        Err(e) => println!("  ⚠ Error getting motion detection settings: {}", e),
    }

    println!("\n9. OSD (on-screen display)");
    match cam.get_osd_settings().await {
        Ok(osd) => {
            println!(
                "  Time display: {}",
                if osd.time_enabled != 0 { "Enabled" } else { "Disabled" }
            );
            println!("  Camera name: {}", osd.camera_name);
            println!(
                "  Name display: {}",
                if osd.camera_name_enabled != 0 { "Enabled" } else { "Disabled" }
            );
        }
        Err(e) => println!("  ⚠ Error getting OSD settings: {}", e),
    }

    println!("\n10. RTSP stream URLs");
    println!("  Main stream: {}", cam.rtsp_url(1, false));
    println!("  Sub stream: {}", cam.rtsp_url(2, false));
    println!("  ⚠ {}", SPS_PPS_WARNING);

    println!("\n11. Snapshot capability");
    match cam.snapshot(0).await {
        Ok(frame) if !frame.is_empty() => {
            println!("  ✓ Snapshot captured successfully ({} bytes)", frame.len());
            println!("  Tip: use snapshots instead of RTSP for reliable image capture");
        }
        Ok(_) => println!("  ✗ Snapshot capture returned no data"),
        Err(e) => println!("  ✗ Error capturing snapshot: {}", e),
    }

    println!("\n{}", "=".repeat(60));
    println!("Diagnostics complete");
    println!("{}", "=".repeat(60));
    println!("\nSummary:");
    println!("  ✓ Camera is accessible and the API is functional");
    println!("  ⚠ RTSP streaming has known issues (missing SPS/PPS headers)");
    println!("  ✓ The HTTP snapshot API works as an alternative");

    true
}
