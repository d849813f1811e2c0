use concord_cam::{ConcordCam, Snapshot, Video, VideoStreamPatch};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        println!("Usage: {} <IP> <Username> <Password>", args[0]);
        return Ok(());
    }

    let ip = &args[1];
    let user = &args[2];
    let pass = &args[3];

    let cam = ConcordCam::new(ip)
        .with_credentials(user, pass)
        .with_timeout(Duration::from_secs(5));

    println!("--- STREAM CONFIGURATION ---");

    // 1. Current main stream settings
    println!("Retrieving main stream config...");
    match cam.get_video_stream(0).await {
        Ok(config) => println!("Current settings: {:#?}", config),
        Err(e) => eprintln!("Error: {}", e),
    }

    // 2. Lower the bitrate; only the supplied fields are sent
    let patch = VideoStreamPatch {
        bitrate: Some(4096),
        fps: Some(25),
        ..Default::default()
    };
    println!("\nApplying bitrate=4096 fps=25 to the main stream...");
    match cam.set_video_stream(0, &patch).await {
        Ok(()) => println!("Settings applied."),
        Err(e) => eprintln!("Error: {}", e),
    }

    // 3. Grab a frame to eyeball the result
    println!("\nCapturing a test snapshot...");
    match cam.save_snapshot(0, "test_frame.jpg").await {
        Ok(frame) => println!("Saved test_frame.jpg ({} bytes)", frame.len()),
        Err(e) => eprintln!("Error: {}", e),
    }

    Ok(())
}
