use anyhow::Result;
use clap::Parser;
use trash_classifier::{config::Config, web::serve};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "trash-classifier")]
#[command(about = "ONNX-powered waste classification service")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0:8601")]
    bind: String,

    /// Path to the classifier model artifact
    #[arg(long, default_value = "models/trash_classifier.onnx")]
    model: String,

    /// Path to the Firestore credential file
    #[arg(long, default_value = "firebase_key.json")]
    credentials: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Use an in-process counter store instead of Firestore
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting waste classification service...");
    tracing::info!("Bind address: {}", args.bind);
    tracing::info!("Model artifact: {}", args.model);

    let config = Config::new(args.bind, args.model, args.credentials, args.offline)?;

    serve(config).await?;

    Ok(())
}
