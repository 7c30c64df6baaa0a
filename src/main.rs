use std::env;
use std::error::Error;

use clap::Parser;
use tokio::sync::mpsc;

use crate::config::DeviceProfile;
use crate::input::session::{ControllerUpdate, Session, SessionState};

mod config;
mod drivers;
mod input;

#[derive(Parser)]
#[command(name = "deckhand", version, about = "Controller normalization daemon for handheld gaming PCs")]
struct Args {
    /// Path to the controller hidraw device
    #[arg(short, long, default_value = "/dev/hidraw0")]
    device: String,

    /// Path to a device profile YAML file; defaults to the built-in profile
    #[arg(short, long)]
    profile: Option<String>,

    /// Enable legacy mouse pass-through (trackpad clicks inject synthetic
    /// mouse buttons)
    #[arg(long)]
    lizard_mouse: bool,

    /// Enable legacy button pass-through (keep the controller's built-in
    /// input mappings active)
    #[arg(long)]
    lizard_buttons: bool,

    /// Global vibration strength, 0.0..=1.0
    #[arg(long, default_value_t = 1.0)]
    vibration_strength: f64,

    /// Play the rumble test pattern N times after opening
    #[arg(long)]
    rumble_test: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting deckhand v{}", VERSION);

    let args = Args::parse();
    let profile = match args.profile.as_ref() {
        Some(path) => DeviceProfile::from_yaml_file(path)?,
        None => DeviceProfile::default(),
    };
    log::info!("Using device profile: {}", profile.name);

    let (updates_tx, mut updates_rx) = mpsc::channel(1024);
    let mut session = Session::new(args.device, profile, updates_tx);

    session.open().await;
    if session.state() != SessionState::Open {
        return Err("Failed to open controller session".into());
    }

    session.set_lizard_mouse(args.lizard_mouse);
    session.set_lizard_buttons(args.lizard_buttons).await;
    session.set_vibration_strength(args.vibration_strength).await;
    if let Some(repeat) = args.rumble_test {
        session.rumble(repeat);
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down");
                break;
            }
            update = updates_rx.recv() => {
                match update {
                    Some(ControllerUpdate::Inputs(state)) => {
                        log::trace!("Controller state: {state:?}");
                    }
                    Some(ControllerUpdate::Motion(sample)) => {
                        log::trace!("Motion sample: {sample:?}");
                    }
                    None => {
                        log::info!("Update channel closed");
                        break;
                    }
                }
            }
        }
    }

    session.close().await;
    log::info!("deckhand stopped");

    Ok(())
}
