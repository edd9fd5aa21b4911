use clap::{Parser, Subcommand};
use lastfm_tools::config::DEFAULT_BASE_URL;
use lastfm_tools::server::McpServer;
use lastfm_tools::tools::catalogue;
use lastfm_tools::{Config, LastFmTools};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lastfm-mcp")]
#[command(about = "Last.fm listening data as MCP tools", long_about = None)]
struct Cli {
    /// Last.fm API key (can also be set via LASTFM_API_KEY env var)
    #[arg(long, env = "LASTFM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Username used when a tool call doesn't name one
    #[arg(long, env = "DEFAULT_USERNAME")]
    default_username: Option<String>,

    /// API endpoint
    #[arg(long, env = "LASTFM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve tools over stdio (the default)
    Serve,
    /// Print the tool catalogue
    Tools,
    /// Run a single tool and print its output
    Call {
        /// Tool name, e.g. get_top_artists
        tool: String,

        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve);

    if let Commands::Tools = command {
        let tools = catalogue(cli.default_username.as_deref());
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    let config = match Config::new(cli.api_key.unwrap_or_default()) {
        Ok(config) => config
            .with_default_username(cli.default_username)
            .with_base_url(cli.base_url),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let tools = LastFmTools::new(&config)?;

    match command {
        Commands::Serve => McpServer::new(tools).serve_stdio().await?,
        Commands::Call { tool, args } => {
            let args: serde_json::Value = serde_json::from_str(&args)?;
            match tools.call(&tool, args).await {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Tools => {}
    }

    Ok(())
}
