//! `publish`: append a raw message to the message log.

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use std::path::PathBuf;

use crate::application::connect_database;
use crate::adapters::sqlite::SqliteMessageLog;
use crate::domain::models::Config;
use crate::domain::ports::MessageLog;

/// Arguments for `publish`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["message", "file"])))]
pub struct PublishArgs {
    /// Target topic (defaults to the configured queue topic)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Target partition
    #[arg(short, long, default_value = "0")]
    pub partition: i32,

    /// Message body, sent as-is
    #[arg(short, long)]
    pub message: Option<String>,

    /// Read the message body from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl PublishArgs {
    fn payload(&self) -> Result<Vec<u8>> {
        match (&self.message, &self.file) {
            (Some(message), _) => Ok(message.clone().into_bytes()),
            (None, Some(path)) => {
                std::fs::read(path).with_context(|| format!("Failed to read message from {}", path.display()))
            }
            (None, None) => anyhow::bail!("Either --message or --file is required"),
        }
    }
}

/// Append one message to the log and print the receipt.
pub async fn execute(args: PublishArgs, config: Config, json_mode: bool) -> Result<()> {
    let payload = args.payload()?;
    if payload.is_empty() {
        anyhow::bail!("Message body cannot be empty");
    }
    let topic = args.topic.clone().unwrap_or_else(|| config.queue.topic.clone());

    let pool = connect_database(&config.database)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database.path))?;
    let log = SqliteMessageLog::new(pool.clone());
    let receipt = log.append(&topic, args.partition, &payload).await?;
    pool.close().await;

    if json_mode {
        let body = serde_json::json!({
            "topic": topic,
            "partition": receipt.partition,
            "offset": receipt.offset,
        });
        println!("{body}");
    } else {
        println!("Published to {topic} (partition {}, offset {})", receipt.partition, receipt.offset);
    }
    Ok(())
}
