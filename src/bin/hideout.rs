//! # Hideout Command-Line Client
//!
//! Drives the Hideout pages against the steganography service.
//!
//! ## Usage
//!
//! ```bash
//! hideout encode --image cover.png --message "hello world" --output-dir ./out
//! hideout decode --image hideout_encoded.png --key <KEY>
//! hideout download --file-id <FILE_ID> --output-dir ./out
//! hideout health
//! hideout view /chat
//! ```
//!
//! The service URL comes from `--api-url`, then `HIDEOUT_API_URL`, then the
//! `--config` file, then `http://localhost:8000`.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use hideout::common::config::ClientConfig;
use hideout::common::logging::init_logger;
use hideout::pages::{ChatPage, DecodePage, EncodePage, HomePage, Phase, Route, View};
use hideout::upload::{SelectedFile, Selection};
use hideout::validation::generate_filename;
use hideout::{HttpStegoClient, StegoService};

/// Command-line arguments for the client binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a client configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the steganography service
    #[arg(long)]
    api_url: Option<String>,

    /// Per-request timeout in seconds (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the landing page
    Home,
    /// Show the chat page
    Chat,
    /// Show the page behind a path (unknown paths show the landing page)
    View { path: String },
    /// Check that the service is up
    Health,
    /// Hide a message in an image
    Encode {
        /// Cover image (JPEG, PNG or WebP, max 10MB)
        #[arg(short, long)]
        image: PathBuf,
        /// Secret message (max 1000 characters)
        #[arg(short, long)]
        message: String,
        /// Also download the encoded image into this directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Reveal the message hidden in an encoded image
    Decode {
        /// Encoded image
        #[arg(short, long)]
        image: PathBuf,
        /// Decryption key printed by `encode`
        #[arg(short, long)]
        key: String,
    },
    /// Download a previously encoded image
    Download {
        #[arg(short, long)]
        file_id: String,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let config = match &args.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ClientConfig::default(),
    };

    Ok(config
        .with_env_override()
        .with_cli_overrides(args.api_url.clone(), args.timeout_secs))
}

fn read_image(path: &Path) -> anyhow::Result<SelectedFile> {
    SelectedFile::from_path(path).with_context(|| format!("failed to read {}", path.display()))
}

async fn encode(
    client: &HttpStegoClient,
    image: &Path,
    message: String,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut page = EncodePage::new();

    if page.select_file(read_image(image)?)? == Selection::Ignored {
        bail!("image selection was ignored");
    }
    page.set_message(message)?;
    page.submit(client).await?;

    println!("{}", page.render());

    if let Phase::Failed(error) = page.phase() {
        bail!("{}", error);
    }

    if let Some(dir) = output_dir {
        match page.download(client).await {
            Some(image) => {
                let path = image.save_to(&dir)?;
                println!("Encoded image saved to {}", path.display());
            }
            None => bail!(
                "{}",
                page.download_error().unwrap_or("Failed to download image")
            ),
        }
    }

    Ok(())
}

async fn decode(client: &HttpStegoClient, image: &Path, key: String) -> anyhow::Result<()> {
    let mut page = DecodePage::new();

    page.select_file(read_image(image)?)?;
    page.set_key(key);
    page.submit(client).await?;

    println!("{}", page.render());

    if let Phase::Failed(error) = page.phase() {
        bail!("Decoding Failed: {}", error);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();
    let config = load_config(&args)?;
    let client = HttpStegoClient::from_settings(&config.api);

    info!("🌐 Using steganography service at {}", client.base_url());

    match args.command {
        Command::Home => println!("{}", HomePage.render()),
        Command::Chat => println!("{}", ChatPage.render()),
        Command::View { path } => println!("{}", Route::from_path(&path).view().render()),
        Command::Health => {
            let status = client.health_check().await?;
            println!(
                "✅ {} is {}",
                status.service.as_deref().unwrap_or("service"),
                status.status.as_deref().unwrap_or("up")
            );
        }
        Command::Encode {
            image,
            message,
            output_dir,
        } => encode(&client, &image, message, output_dir).await?,
        Command::Decode { image, key } => decode(&client, &image, key).await?,
        Command::Download {
            file_id,
            output_dir,
        } => {
            let bytes = client.download(&file_id).await?;
            let path = output_dir.join(generate_filename("hideout_encoded", "png"));
            std::fs::write(&path, bytes)?;
            println!("Encoded image saved to {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Args::try_parse_from(["hideout", "--timeout-secs", "0", "health"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let args = Args::try_parse_from(["hideout", "--timeout-secs", "5", "health"]).unwrap();
        assert_eq!(args.timeout_secs, Some(5));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"[api]\nbase_url = \"http://from-file:9000\"\ntimeout_secs = 5\n",
        )
        .unwrap();
        let config_path = file.path().to_str().unwrap();

        let args = Args::try_parse_from([
            "hideout",
            "--config",
            config_path,
            "--api-url",
            "http://from-flag:6000",
            "--timeout-secs",
            "9",
            "health",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.api.base_url, "http://from-flag:6000");
        assert_eq!(config.api.timeout_secs, 9);
    }
}
