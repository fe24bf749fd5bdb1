mod analyze_cmd;
mod config;
mod doctor_cmd;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use textcam_gateway::{start_server, GatewayState, RecognizerSlot, ServerOptions};
use textcam_understanding::recognizer_from_env;

use config::Config;

#[derive(Parser)]
#[command(name = "textcam")]
#[command(about = "textcam: capture a photo, get its text back")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the recognition gateway and capture page
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Recognize the text in an image file through a running gateway
    Analyze {
        /// Image file used as the camera frame
        image: PathBuf,
        /// Gateway base URL
        #[arg(short, long)]
        gateway: Option<String>,
        /// Copy the full text to the clipboard (OSC 52)
        #[arg(short, long)]
        copy: bool,
    },
    /// Show whether a gateway is running and ready
    Status {
        #[arg(short, long)]
        gateway: Option<String>,
    },
    /// Check the OCR provider configuration
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            logging::init_logger(config.log_dir.as_deref(), &config.log_level);
            let config = Config {
                port: port.unwrap_or(config.port),
                bind_address: bind.unwrap_or(config.bind_address),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Analyze { image, gateway, copy } => {
            logging::init_logger(None::<&str>, &config.log_level);
            let gateway = gateway.unwrap_or(config.gateway_url);
            if !analyze_cmd::run(&image, &gateway, copy, config.camera_off_policy).await? {
                std::process::exit(1);
            }
        }
        Commands::Status { gateway } => {
            status_cmd::run(&gateway.unwrap_or(config.gateway_url)).await?;
        }
        Commands::Doctor => {
            if !doctor_cmd::run().await? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        max_body_bytes = config.max_body_bytes,
        "Starting textcam gateway"
    );

    // Built once; an unconfigured provider is kept as a refusal, not a startup failure.
    let recognizer = RecognizerSlot::from_result(recognizer_from_env());
    let state = GatewayState::new(recognizer);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.bind_address, config.port))?;

    start_server(
        addr,
        state,
        ServerOptions {
            max_body_bytes: config.max_body_bytes,
        },
    )
    .await
}
