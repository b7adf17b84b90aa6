//! CLI entry point for agent-relay.

use std::future::Future;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// agent-relay CLI
#[derive(Parser, Debug)]
#[command(name = "agent-relay", version, about = "Chat with a hosted agent application")]
pub struct Cli {
    /// Config file (default: ~/.agent-relay/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message, or read messages line by line from stdin
    Chat(ChatArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Session key; turns with the same key share one remote conversation
    #[arg(short, long, default_value = "cli")]
    pub session: String,

    /// Message (positional). Omit to start an interactive loop.
    pub message: Option<String>,
}

/// Interactive loop: prompt, read a line, answer it, repeat until EOF.
///
/// Blank lines are skipped. Returns the number of messages answered.
pub async fn run_repl<R, W, F, Fut>(input: R, mut output: W, mut answer: F) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = String>,
{
    let mut lines = input.lines();
    let mut answered = 0;
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let rendered = answer(line.to_string()).await;
        output.write_all(rendered.as_bytes()).await?;
        output.write_all(b"\n").await?;
        answered += 1;
    }
    Ok(answered)
}
