use anyhow::{Context, Result};
use clap::Parser;
use speech_stream::{
    ensure_writable_directory, CancelToken, Config, CredentialProvider, EnvCredentials,
    FileAudioSink, SpeechSession, StaticCredential, WebSocketConnector,
};
use std::sync::Arc;
use tracing::{error, info, warn, Level};

#[derive(Parser)]
#[command(name = "speech-stream")]
#[command(about = "Stream text to a text-to-speech socket and save the audio")]
struct Args {
    /// Text to speak
    #[arg(default_value = "Hello world! This is a test of the ElevenLabs WebSocket API.")]
    text: String,

    /// Voice identifier (defaults to the configured voice)
    #[arg(long)]
    voice_id: Option<String>,

    /// Configuration file (without extension)
    #[arg(short, long, default_value = "config/speech-stream")]
    config: String,

    /// Output directory override
    #[arg(short, long)]
    output_dir: Option<String>,

    /// API key (otherwise read from the configured environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Session deadline in seconds (0 disables)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let mut cfg = Config::load(&args.config)?;
    if let Some(dir) = args.output_dir {
        cfg.output.directory = dir;
    }
    if let Some(secs) = args.timeout_secs {
        cfg.session.deadline_secs = secs;
    }

    let credentials: Arc<dyn CredentialProvider> = match args.api_key {
        Some(key) => Arc::new(StaticCredential::new(key)),
        None => Arc::new(EnvCredentials::new(cfg.api.key_env.clone())),
    };
    let api_key = credentials.credential().context("No API key available")?;

    info!("{} ready to use {}", cfg.service.name, cfg.api.host);
    info!("API key length: {}", api_key.len());

    let output_dir = cfg.output_dir();
    if let Err(e) = ensure_writable_directory(&output_dir).await {
        error!("Cannot access output directory {}: {}", output_dir.display(), e);
        error!("Run with appropriate permissions or pass --output-dir");
        return Err(e).context("Output directory is not writable");
    }
    info!("Confirmed write access to: {}", output_dir.display());

    let cancel = CancelToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling session");
            ctrl_c.cancel();
        }
    });

    let voice_id = args.voice_id.unwrap_or_else(|| cfg.api.voice_id.clone());
    let mut session = SpeechSession::new(
        cfg.session_config(),
        Arc::new(WebSocketConnector::new(cfg.api.key_header.clone())),
        credentials,
        Arc::new(FileAudioSink::new()),
    );

    info!("Converting text to speech: \"{}\"", args.text);
    let report = session
        .speak_text(&voice_id, &args.text, &cancel)
        .await
        .context("Text-to-speech failed")?;

    info!(
        "Text-to-speech completed ({:?}). Audio saved to: {}",
        report.termination,
        report.output_path.display()
    );
    println!("{}", report.output_path.display());
    println!("{}", serde_json::to_string_pretty(&report.stats)?);

    Ok(())
}
