use anyhow::Result;
use clap::{ArgAction, Parser};
use sglang_mistral::app::{App, ChatRequest};
use sglang_mistral::models::{Config, OutputMode, DEFAULT_MAX_TOKENS};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "sglang-mistral")]
#[command(about = "Interact with SGLang Mistral model")]
#[command(after_help = "Examples:
  sglang-mistral --text \"Hello, how are you?\"
  sglang-mistral --image-url \"https://example.com/image.jpg\"
  sglang-mistral --text \"What's in these images?\" --image-url https://example.com/1.jpg --image-url https://example.com/2.jpg
  sglang-mistral --text \"What's in these images?\" --image-url https://example.com/1.jpg https://example.com/2.jpg
  sglang-mistral --host 192.168.1.100 --port 8080 --text \"Hello\"")]
struct CliArgs {
    /// Server host address (default: SGLANG_HOST or localhost).
    #[arg(long, visible_alias = "addr")]
    host: Option<String>,

    /// Server port (default: SGLANG_PORT or 30000).
    #[arg(long)]
    port: Option<u16>,

    /// Model name (default: SGLANG_MODEL or the bundled Mistral Small checkpoint).
    #[arg(long)]
    model: Option<String>,

    /// Maximum tokens in the response.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_TOKENS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_tokens: u32,

    /// Text message to send (defaults to a generic image prompt).
    #[arg(long)]
    text: Option<String>,

    /// Image URL to analyze; repeat the flag or list several URLs after it.
    #[arg(long = "image-url", value_name = "URL", num_args = 1.., action = ArgAction::Append)]
    image_urls: Vec<String>,

    /// Print the raw response body.
    #[arg(long, conflicts_with = "json")]
    raw: bool,

    /// Print the full response as indented JSON.
    #[arg(long)]
    json: bool,

    /// Only probe the server's health endpoint.
    #[arg(long)]
    health: bool,
}

impl CliArgs {
    fn config(&self) -> sglang_mistral::Result<Config> {
        Ok(Config::from_env()?.with_overrides(self.host.clone(), self.port, self.model.clone()))
    }

    fn chat_request(&self) -> ChatRequest {
        ChatRequest {
            text: self.text.clone(),
            image_urls: self.image_urls.clone(),
            mode: OutputMode::from_flags(self.raw, self.json),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sglang_mistral=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    debug!("Parsed arguments: {:?}", args);

    let app = match args.config().and_then(|config| App::new(&config, args.max_tokens)) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize client: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if args.health {
        if app.health_check().await {
            println!("healthy");
            return Ok(());
        }
        println!("unhealthy");
        std::process::exit(1);
    }

    match app.run(&args.chat_request()).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Request failed ({:?}): {}", e.kind(), e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
