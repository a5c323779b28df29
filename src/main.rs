use clap::Parser;
use runware_imagegen::{
    logger::{self, LogLevel, LoggerConfig},
    storage, ConsoleSink, GenerationOutcome, GeneratorConfig, ImageGenerator, OutputFormat,
    RequestBuilder, RunwareClient,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Generate an image from a text prompt with the Runware API.
#[derive(Debug, Parser)]
#[command(name = "imagegen", version, about)]
struct Args {
    /// Prompt describing the image
    #[arg(required = true, num_args = 1..)]
    prompt: Vec<String>,

    /// Authenticate with this API key (saved for next time on success)
    #[arg(long, conflicts_with = "use_saved_key")]
    api_key: Option<String>,

    /// Authenticate with the key saved by a previous successful run
    #[arg(long)]
    use_saved_key: bool,

    /// Download the generated image to this path (extension defaults to the output format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("imagegen: {}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(args: Args) -> Result<GenerationOutcome, Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = GeneratorConfig::from_env();
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config
            .log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LogLevel::Warn)
    };
    logger::init_with_config(
        LoggerConfig::default()
            .with_level(level)
            .with_colors(!args.no_color),
    )?;

    if dotenv_loaded {
        log::debug!(".env file loaded");
    }
    config.validate()?;
    logger::log_config_info(&config);

    let client = RunwareClient::from_config(&config);
    let generator = ImageGenerator::initialize(
        RequestBuilder::with_uuid_ids(config.params.clone()),
        Arc::new(client.clone()),
        storage::open_store(&config),
        Arc::new(ConsoleSink::new().with_colors(!args.no_color)),
    )
    .await;

    let api_key = match (args.api_key, args.use_saved_key) {
        (Some(key), _) => Some(key),
        // An empty key makes the builder report the missing key.
        (None, true) => Some(generator.saved_api_key().unwrap_or_default()),
        (None, false) => config.api_key.clone(),
    };

    let prompt = args.prompt.join(" ");
    let result = generator.submit(&prompt, api_key.as_deref()).await;
    let outcome = GenerationOutcome::from(&result);

    match (&result, &args.output) {
        (Ok(url), Some(path)) => {
            Ok(save_output(&client, url, path, config.params.output_format).await)
        }
        _ => Ok(outcome),
    }
}

/// The image exists once generation succeeded, so a failed download is
/// reported on its own line and turns the run into a failure.
async fn save_output(
    client: &RunwareClient,
    url: &str,
    path: &Path,
    format: OutputFormat,
) -> GenerationOutcome {
    match client.save_image(url, path, format).await {
        Ok(saved) => {
            log::info!("💾 Image saved to {}", saved.display());
            GenerationOutcome::Success(url.to_string())
        }
        Err(e) => {
            log::error!("Could not save image: {}", e);
            eprintln!("imagegen: image generated at {} but not saved: {}", url, e);
            GenerationOutcome::Failure(e.to_string())
        }
    }
}
