use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::BufReader;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use rschat::{
    ApiKey, ChatWorker, CompletionClient, HttpClientConfig, OpenRouterConfig, Provider,
    RequestBuilder, repl::Repl, server,
};

/// Chat with an OpenRouter model in the terminal, or serve the browser UI.
#[derive(Parser)]
#[command(name = "rschat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    chat: ChatArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ChatArgs {
    #[arg(long, default_value = rschat::provider::DEFAULT_MODEL)]
    model: String,

    #[arg(long, default_value_t = 1000)]
    max_tokens: u32,

    #[arg(long, default_value_t = 0.7)]
    temperature: f64,

    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds; requests never time out when omitted
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the browser UI from a directory
    Serve {
        #[arg(short, long, default_value_t = server::DEFAULT_PORT)]
        port: u16,

        #[arg(short, long, default_value = "web")]
        root: PathBuf,

        /// Do not open the UI in a browser once the server is up
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None => {
            chat(cli.chat).await?;
            // An interrupted session can leave stdin's blocking reader parked in a read.
            std::process::exit(0)
        }
        Some(Commands::Serve {
            port,
            root,
            no_open,
        }) => serve(port, root, !no_open).await,
    }
}

async fn chat(args: ChatArgs) -> Result<()> {
    let api_key = ApiKey::Default.resolve(Provider::OpenRouter)?;
    let mut config = OpenRouterConfig::new(api_key)
        .with_default_attribution()
        .with_http_config(HttpClientConfig {
            timeout: args.timeout.map(Duration::from_secs),
        });
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }

    let client = CompletionClient::new(config)?.with_request_builder(
        RequestBuilder::default()
            .with_model(args.model)
            .with_max_tokens(args.max_tokens)
            .with_temperature(args.temperature),
    );

    let mut chat = ChatWorker::spawn(client);
    let mut repl = Repl::new(BufReader::new(tokio::io::stdin()), std::io::stdout());
    let interrupted = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    repl.run_until(&mut chat, interrupted)
        .await
        .context("terminal session failed")?;
    chat.shutdown().await;
    Ok(())
}

async fn serve(port: u16, root: PathBuf, open_browser: bool) -> Result<()> {
    let listener = server::bind(port)
        .await
        .with_context(|| format!("failed to bind port {port}"))?;

    let url = format!("http://localhost:{port}");
    println!("🚀 DeepSeek AI Assistant Web Server running at:");
    println!("   Local:   {url}");
    println!("   Network: http://127.0.0.1:{port}");
    println!();
    println!("Press Ctrl+C to stop the server");

    if open_browser {
        if let Err(e) = webbrowser::open(&url) {
            warn!(error = %e, "Browser launch failed");
            println!("Could not open browser automatically: {e}");
        }
    }

    tokio::select! {
        result = server::serve(listener, root) => result.context("server failed")?,
        _ = tokio::signal::ctrl_c() => println!("\n👋 Shutting down the server..."),
    }
    Ok(())
}
