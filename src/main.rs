use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use smokeland::core::config::{self, CliOverrides, SmokelandConfig};
use smokeland::tui;

#[derive(Parser)]
#[command(name = "smokeland", about = "Terminal chat client for the Smokeland Conversation Engine")]
struct Args {
    /// Query endpoint URL (overrides config file and SMOKELAND_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Start directly in the chat window
    #[arg(long)]
    skip_login: bool,

    /// Config file to read instead of ~/.smokeland/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the debug log
    #[arg(long, default_value = "smokeland.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger; the terminal belongs to the TUI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to default config: {}", e);
            eprintln!("Warning: {e}; using defaults");
            SmokelandConfig::default()
        }
    };

    let cli = CliOverrides {
        endpoint: args.endpoint,
        skip_login: args.skip_login,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Smokeland starting up (endpoint: {}, bot: {})",
        resolved.endpoint,
        resolved.bot_name
    );

    tui::run(resolved)
}
