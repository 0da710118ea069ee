//! wasend – command-line frontend for the client send pipeline.
//!
//! Drives [`wasend_client::SendPipeline`] against a running wasend-relay:
//! compose and send a message, verify the configured credential, and list
//! or clear the local history.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use wasend_client::{HttpRelay, JsonFileStore, SendPipeline};
use wasend_types::{Attachment, FileKind, MessageRecord, MessageStatus};

#[derive(Parser)]
#[command(name = "wasend", about = "Send WhatsApp messages through a wasend-relay")]
struct Cli {
    /// Full URL of the relay's send route.
    #[arg(long, env = "WASEND_RELAY_URL", default_value = "http://127.0.0.1:8787/send")]
    relay_url: String,

    /// Provider API key, forwarded to the relay with every request.
    #[arg(long, env = "WASEND_API_KEY")]
    api_key: Option<String>,

    /// Directory holding the local message history.
    #[arg(long, env = "WASEND_HISTORY_DIR")]
    history_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a message to a phone number.
    Send {
        /// Recipient phone number, e.g. +15551234567.
        #[arg(long)]
        to: String,

        /// Message text. May be empty when a file is attached.
        #[arg(long, default_value = "")]
        text: String,

        /// URL of a media attachment.
        #[arg(long)]
        file_url: Option<String>,

        /// MIME content type of the attachment, used to classify it as
        /// image, video, or document. Unrecognized types are documents.
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Verify the configured API key against the provider.
    Verify,

    /// Show the local message history, most recent first.
    History,

    /// Clear the local message history.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let history_dir = cli
        .history_dir
        .clone()
        .unwrap_or_else(JsonFileStore::default_dir);
    let store = Arc::new(JsonFileStore::new(&history_dir));
    let relay = Arc::new(HttpRelay::new(&cli.relay_url));
    // History and clear work without a credential; send and verify need one.
    let api_key = cli.api_key.clone().unwrap_or_default();
    let pipeline = SendPipeline::new(store, relay, api_key);

    match &cli.command {
        Command::Send {
            to,
            text,
            file_url,
            content_type,
        } => {
            require_api_key(&cli)?;
            let attachment = file_url.clone().map(|url| {
                let kind = content_type
                    .as_deref()
                    .map(FileKind::from_content_type)
                    .unwrap_or(FileKind::Document);
                Attachment::new(url, kind)
            });

            let submission = pipeline.submit(&to, &text, attachment).await?;
            println!("submitted {} (pending)", submission.record.id);

            match submission.finished().await {
                Some(record) => match record.status {
                    MessageStatus::Sent => println!("sent {}", record.id),
                    MessageStatus::Failed => {
                        println!(
                            "failed {}: {}",
                            record.id,
                            record.error.as_deref().unwrap_or("unknown error")
                        );
                        std::process::exit(1);
                    }
                    MessageStatus::Pending => unreachable!("relay call settled"),
                },
                None => anyhow::bail!("send task was torn down before completing"),
            }
        }

        Command::Verify => {
            require_api_key(&cli)?;
            let v = pipeline.verify().await?;
            println!(
                "{}: {}",
                if v.is_valid { "valid" } else { "invalid" },
                v.message.as_deref().unwrap_or("")
            );
            if !v.is_valid {
                std::process::exit(1);
            }
        }

        Command::History => {
            let records = pipeline.history().await?;
            if records.is_empty() {
                println!("history is empty");
            }
            for record in records {
                println!("{}", format_record(&record));
            }
        }

        Command::Clear => {
            pipeline.clear_history().await?;
            println!("history cleared");
        }
    }

    Ok(())
}

fn require_api_key(cli: &Cli) -> anyhow::Result<()> {
    cli.api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .map(|_| ())
        .context("no API key configured; pass --api-key or set WASEND_API_KEY")
}

fn format_record(record: &MessageRecord) -> String {
    let when = DateTime::<Utc>::from_timestamp_millis(record.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| record.timestamp.to_string());
    let status = match record.status {
        MessageStatus::Pending => "pending",
        MessageStatus::Sent => "sent",
        MessageStatus::Failed => "failed",
    };
    let mut line = format!("[{when}] {status:7} {} ", record.to);
    if !record.text.is_empty() {
        line.push_str(&format!("{:?} ", record.text));
    }
    if let Some(a) = &record.attachment {
        line.push_str(&format!("({:?} {}) ", a.kind(), a.url()));
    }
    if let Some(e) = &record.error {
        line.push_str(&format!("error: {e}"));
    }
    line.trim_end().to_owned()
}
