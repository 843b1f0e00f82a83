use anyhow::Context;
use camfeed::{opener_for, AppState, CameraBackend, CameraManager, CamfeedConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Serve a webcam as a browser-controlled MJPEG feed
#[derive(Debug, Parser)]
#[command(name = "camfeed", version, about)]
struct Args {
    /// TOML configuration file; missing file means defaults
    #[arg(short, long, default_value = "camfeed.toml", env = "CAMFEED_CONFIG")]
    config: PathBuf,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Camera index
    #[arg(short, long)]
    device: Option<u32>,

    /// Where captured stills are written
    #[arg(long)]
    capture_path: Option<PathBuf>,

    /// Use the synthetic camera instead of a real device
    #[arg(long)]
    mock: bool,
}

impl Args {
    fn apply(self, config: &mut CamfeedConfig) {
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(device) = self.device {
            config.camera.device_index = device;
        }
        if let Some(path) = self.capture_path {
            config.storage.capture_path = path;
        }
        if self.mock {
            config.camera.backend = CameraBackend::Mock;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    camfeed::init_logging();
    let args = Args::parse();

    let mut config = CamfeedConfig::load_from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    log::info!(
        "{} {} using {} camera {}, captures to {:?}",
        camfeed::NAME,
        camfeed::VERSION,
        config.camera.backend.as_str(),
        config.camera.device_index,
        config.storage.capture_path
    );

    let opener = opener_for(&config.camera)?;
    let camera = Arc::new(CameraManager::new(opener));

    camfeed::web::serve(AppState::new(camera, config)).await?;
    Ok(())
}
