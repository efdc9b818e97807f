use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, info};
use spamcheck::{
    DetectRequest, Detection, EndpointConfig, Fallback, RetryPolicy, SpamDetector, StatusRetry,
    http::{MAX_RETRIES, RETRY_DELAY_MS, TokioDelay, build_http_client},
    models::{DEFAULT_MODEL, MODELS, find_model},
    runtime::RealRuntime,
};
use std::io::Read;
use std::time::Duration;

/// spamcheck - Spam Email Detection
///
/// Send an email message to the spam-detection service and print its verdict.
///
/// The service address is read from the SPAMCHECK_API_URL environment variable
/// on every call. When it is unset, http://localhost:8000 is used unless
/// --no-fallback is given.
///
/// Examples:
///   spamcheck detect "You won a prize!"            # Check a message with model1
///   spamcheck detect --model model4 < email.txt    # Read the message from stdin
#[derive(Parser, Debug)]
#[command(author, version = env!("SPAMCHECK_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Service base URL (also via SPAMCHECK_API_URL)
    #[arg(
        long = "api-url",
        env = "SPAMCHECK_API_URL",
        value_name = "URL",
        global = true
    )]
    pub api_url: Option<String>,

    /// Fail instead of falling back to http://localhost:8000 when no URL is configured
    #[arg(long = "no-fallback", global = true)]
    pub no_fallback: bool,

    /// Attempts per request, the first one included
    #[arg(
        long = "retries",
        value_name = "N",
        default_value_t = MAX_RETRIES,
        global = true
    )]
    pub retries: usize,

    /// Fixed delay between attempts
    #[arg(
        long = "retry-delay-ms",
        value_name = "MS",
        default_value_t = RETRY_DELAY_MS,
        global = true
    )]
    pub retry_delay_ms: u64,

    /// Which error statuses are retried (network failures always are)
    #[arg(
        long = "retry-status",
        value_enum,
        default_value_t = StatusRetry::Never,
        global = true
    )]
    pub retry_status: StatusRetry,

    /// Per-request timeout (none by default)
    #[arg(long = "timeout-secs", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Classify a message as Spam or Not Spam
    Detect(DetectArgs),

    /// List the known classifier models
    Models,
}

#[derive(clap::Args, Debug)]
pub struct DetectArgs {
    /// The email message; read from stdin when omitted or "-"
    #[arg(value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Classifier model identifier
    #[arg(long, short = 'm', default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    fn endpoint(&self) -> EndpointConfig {
        let mut endpoint = EndpointConfig::default();
        if let Some(url) = &self.api_url {
            endpoint = endpoint.with_override(url.clone());
        }
        if self.no_fallback {
            endpoint = endpoint.with_fallback(Fallback::Disabled);
        }
        endpoint
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retries,
            delay: Duration::from_millis(self.retry_delay_ms),
            status_retry: self.retry_status,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Detect(args) => detect(&cli, args).await,
        Commands::Models => {
            print!("{}", render_models());
            Ok(())
        }
    }
}

async fn detect(cli: &Cli, args: &DetectArgs) -> Result<()> {
    let message = match args.message.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read message from stdin")?;
            buf
        }
        Some(message) => message.to_string(),
    };

    if message.trim().is_empty() {
        bail!("Message is empty. Please enter an email message to check.");
    }

    match find_model(&args.model) {
        Some(model) => debug!("Using {} ({})", model.id, model.name),
        None => info!("Model {} is not in the known list, sending it as-is", args.model),
    }

    let transport = build_http_client(cli.timeout_secs.map(Duration::from_secs))?;
    let detector = SpamDetector::new(RealRuntime, transport, TokioDelay)
        .with_endpoint(cli.endpoint())
        .with_retry_policy(cli.retry_policy());

    let detection = detector
        .detect(&DetectRequest::new(message, args.model.clone()))
        .await?;

    print!("{}", render_detection(&detection, args.json)?);
    Ok(())
}

fn render_detection(detection: &Detection, json: bool) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string(detection)?));
    }

    let mut out = format!("Result: {}\n", detection.result);
    if let Some(confidence) = detection.confidence {
        out.push_str(&format!("Confidence: {}\n", confidence));
    }
    Ok(out)
}

fn render_models() -> String {
    MODELS
        .iter()
        .map(|m| format!("{}\t{}\n", m.id, m.name))
        .collect()
}
