//! agent-relay CLI binary entry point.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use agent_relay::bot::AgentBot;
use agent_relay::cli::{run_repl, ChatArgs, Cli, Commands};
use agent_relay::config::RelayConfig;
use agent_relay::types::{ReplyOutcome, TurnContext};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {e}");
    }

    let result = match cli.command {
        Commands::Chat(args) => handle_chat(cli.config, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_chat(
    config_path: Option<std::path::PathBuf>,
    args: ChatArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = RelayConfig::load(config_path.as_deref())?;
    let bot = AgentBot::from_config(&config)?;

    if let Some(message) = args.message {
        let reply = bot.reply(&TurnContext::text(&args.session, message)).await;
        print_reply(&reply);
        return Ok(());
    }

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    run_repl(input, tokio::io::stdout(), |line| {
        let bot = &bot;
        let session = &args.session;
        async move { render_reply(&bot.reply(&TurnContext::text(session, line)).await) }
    })
    .await?;
    Ok(())
}

fn print_reply(reply: &ReplyOutcome) {
    println!("{}", render_reply(reply));
}

fn render_reply(reply: &ReplyOutcome) -> String {
    format!("[{}] {}", reply.kind(), reply.payload())
}
