mod commands;
mod gateway;
mod orchestrator;

use clap::{Parser, Subcommand};
use commands::CommandReplies;
use orchestrator::Orchestrator;
use parley_channels::telegram::TelegramChannel;
use parley_core::{
    config,
    traits::{Channel, Provider},
};
use parley_language::{HeuristicDetector, LanguagePipeline};
use parley_memory::SessionStore;
use parley_providers::{GoogleTranslator, OpenAiProvider};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "parley",
    version,
    about = "Parley: a multilingual chat bot relaying through OpenAI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot.
    Start,
    /// Check configuration and provider availability.
    Status,
    /// Send a one-shot message through the full pipeline.
    Ask {
        /// The message to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = config::load(&cli.config)?;

    match cli.command {
        Commands::Start => {
            let tg = &cfg.channel.telegram;
            if !tg.enabled {
                anyhow::bail!("Telegram is disabled. Enable [channel.telegram] in config.toml.");
            }
            if tg.bot_token.is_empty() {
                anyhow::bail!(
                    "Telegram bot token is empty. \
                     Set it in config.toml or the {} env var.",
                    config::TELEGRAM_TOKEN_ENV
                );
            }
            require_api_key(&cfg)?;

            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
            channels.insert("telegram".to_string(), Arc::new(TelegramChannel::new(tg)));

            let orchestrator = Arc::new(build_orchestrator(&cfg));
            let gw = Arc::new(gateway::Gateway::new(
                orchestrator,
                channels,
                CommandReplies::from_config(tg),
            ));

            println!("Parley: starting bot...");
            gw.run().await?;
        }
        Commands::Status => {
            println!("Parley status\n");
            println!("Config: {}", cli.config);
            println!(
                "Model: {} @ {} (temperature {})",
                cfg.provider.openai.model, cfg.provider.openai.base_url, cfg.provider.openai.temperature
            );
            println!("History window: {} turns", cfg.memory.max_turns);
            println!();

            println!(
                "  telegram: {}",
                match (cfg.channel.telegram.enabled, cfg.channel.telegram.bot_token.is_empty()) {
                    (false, _) => "disabled",
                    (true, true) => "enabled but missing bot_token",
                    (true, false) => "configured",
                }
            );

            let provider = OpenAiProvider::new(&cfg.provider.openai);
            println!(
                "  openai: {}",
                if cfg.provider.openai.api_key.is_empty() {
                    "missing api_key"
                } else if provider.is_available().await {
                    "available"
                } else {
                    "unreachable"
                }
            );
        }
        Commands::Ask { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: parley ask <message>");
            }
            require_api_key(&cfg)?;

            let orchestrator = build_orchestrator(&cfg);
            let reply = orchestrator.respond("cli", &message.join(" ")).await?;
            println!("{reply}");
        }
    }

    Ok(())
}

fn require_api_key(cfg: &config::Config) -> anyhow::Result<()> {
    if cfg.provider.openai.api_key.is_empty() {
        anyhow::bail!(
            "OpenAI API key is empty. Set it in config.toml or the {} env var.",
            config::OPENAI_KEY_ENV
        );
    }
    Ok(())
}

/// Wire the provider, language pipeline, and session store together.
fn build_orchestrator(cfg: &config::Config) -> Orchestrator {
    let provider: Arc<dyn Provider> = Arc::new(OpenAiProvider::new(&cfg.provider.openai));
    let language = LanguagePipeline::new(
        Arc::new(HeuristicDetector),
        Arc::new(GoogleTranslator::new(&cfg.translation)),
    )
    .with_pivot(cfg.translation.pivot_language.clone());

    Orchestrator::new(provider, language, SessionStore::new(cfg.memory.max_turns))
        .with_system_prompt(cfg.provider.openai.system_prompt.clone())
        .with_temperature(cfg.provider.openai.temperature)
}
