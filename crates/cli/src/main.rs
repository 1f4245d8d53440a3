use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "linebot-echo")]
#[command(about = "LINE callback bot that echoes text and sticker messages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: LINEBOT_CONFIG_PATH or ~/.linebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the callback server (POST /callback). Credentials come from ChannelSecret / ChannelAccessToken or the config file.
    Serve {
        /// Config file path (default: LINEBOT_CONFIG_PATH or ~/.linebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default: PORT env, then config, then 8080)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Print this month's remaining message quota.
    Quota {
        /// Config file path (default: LINEBOT_CONFIG_PATH or ~/.linebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("linebot-echo {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("server failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Quota { config }) => {
            if let Err(e) = run_quota(config).await {
                log::error!("quota failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(linebot::config::default_config_path);
    let dir = linebot::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, path) = linebot::config::load_config(config_path)?;
    log::debug!("using config {}", path.display());
    config.server.port = match port {
        Some(p) => p,
        None => linebot::config::resolve_port(&config)?,
    };
    linebot::gateway::run_server(config).await
}

async fn run_quota(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let (config, _) = linebot::config::load_config(config_path)?;
    let client = linebot::line::LineClient::from_config(&config)?;
    let quota = client.message_quota().await?;
    match quota.kind {
        linebot::line::QuotaKind::None => println!("quota: unlimited"),
        linebot::line::QuotaKind::Limited => println!("quota: {}", quota.value),
    }
    Ok(())
}
