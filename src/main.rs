use anyhow::{bail, Context, Result};
use base64::Engine as _;
use clap::{Parser, Subcommand};
use curaserena_assistant::models::{AspectRatio, Config, Conversation, ImageOutcome};
use curaserena_assistant::site::{resolve_all, SITE_IMAGES};
use curaserena_assistant::{ChatAssistant, ClientHandle, ImageGenerator};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "curaserena-assistant")]
#[command(about = "Chat with Serena and generate website imagery")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send one message, or start an interactive chat when none is given.
    Chat {
        message: Option<String>,
    },
    /// Generate one image.
    Image {
        prompt: String,
        /// One of 1:1, 3:4, 4:3, 9:16, 16:9.
        #[arg(long, default_value = "1:1", value_parser = parse_aspect_ratio_arg)]
        aspect_ratio: AspectRatio,
        /// Write the decoded PNG here instead of printing the data URI.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate every image slot on the website.
    Prewarm,
}

fn parse_aspect_ratio_arg(input: &str) -> std::result::Result<AspectRatio, String> {
    input.parse().map_err(|e: curaserena_assistant::Error| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "curaserena_assistant=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = Config::from_env();
    let handle = Arc::new(ClientHandle::from_config(&config));

    match args.command {
        Command::Chat { message } => {
            let assistant = ChatAssistant::new(handle);
            match message {
                Some(message) => {
                    let reply = assistant.send_message(&message, &[]).await;
                    println!("{}", reply.text());
                }
                None => chat_loop(&assistant).await?,
            }
        }
        Command::Image {
            prompt,
            aspect_ratio,
            output,
        } => {
            let generator = ImageGenerator::new(handle);
            let outcome = generator.generate_image(&prompt, aspect_ratio).await;
            write_image(&outcome, output)?;
        }
        Command::Prewarm => {
            let generator = ImageGenerator::new(handle);
            let sources = resolve_all(&generator, &SITE_IMAGES).await;
            for (slot, src) in SITE_IMAGES.iter().zip(&sources) {
                let status = if src.starts_with("data:") {
                    "generated"
                } else {
                    "fallback"
                };
                println!("{} -> {}", slot.alt, status);
            }
            info!("Cached {} site images", generator.cache().len());
        }
    }

    Ok(())
}

async fn chat_loop(assistant: &ChatAssistant) -> Result<()> {
    println!("Serena è in linea. Scrivi /reset per ricominciare, /exit per uscire.");

    let mut conversation = Conversation::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        match message {
            "" => continue,
            "/exit" => break,
            "/reset" => {
                conversation.clear();
                println!("Conversazione azzerata.");
                continue;
            }
            _ => {}
        }

        let reply = assistant
            .send_message(message, conversation.turns())
            .await;
        if let Some(reason) = reply.degradation() {
            warn!("Showing fallback reply: {}", reason);
        }
        println!("Serena: {}", reply.text());

        conversation.push_user(message);
        conversation.push_assistant(reply.into_text());
    }

    Ok(())
}

fn write_image(outcome: &ImageOutcome, output: Option<PathBuf>) -> Result<()> {
    let uri = match outcome {
        ImageOutcome::Fallback(reason) => bail!("No image generated: {}", reason),
        ImageOutcome::Generated(uri) | ImageOutcome::Cached(uri) => uri,
    };

    match output {
        None => println!("{}", uri),
        Some(path) => {
            let payload = uri
                .split_once(',')
                .map(|(_, data)| data)
                .context("Malformed data URI")?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(payload)
                .context("Invalid base64 image payload")?;
            std::fs::write(&path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Saved image to {}", path.display());
        }
    }

    Ok(())
}
