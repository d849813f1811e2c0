use concord_cam::{ConcordCam, Network, SystemInfo};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: {} <IP> [username] [password]", args[0]);
        println!("Example: cargo run --example device_info -- 192.168.1.10 admin pass123");
        return Ok(());
    }

    let ip = &args[1];
    let user = args.get(2).map(String::as_str).unwrap_or("admin");
    let pass = args.get(3).map(String::as_str).unwrap_or("");

    // 1. Build the client; nothing is sent until the first call
    let cam = ConcordCam::new(ip)
        .with_credentials(user, pass)
        .with_timeout(Duration::from_secs(5));

    // 2. Retrieve device identity
    println!("--- System Info ---");
    match cam.get_system_info().await {
        Ok(info) => println!("{:#?}", info),
        Err(e) => eprintln!("Error getting system info: {}", e),
    }

    // 3. Retrieve network configuration
    println!("\n--- Network Settings ---");
    match cam.get_network_settings().await {
        Ok(network) => println!("{:#?}", network),
        Err(e) => eprintln!("Error getting network settings: {}", e),
    }

    // 4. The RTSP URL is formatted locally, no request involved
    println!("\n--- RTSP URL ---");
    println!("{}", cam.rtsp_url(1, true));

    Ok(())
}
