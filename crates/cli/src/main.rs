use clap::{Parser, Subcommand};
use parley::chat::{build_chat_items, ChatItem, RenderItem, TranscriptView};
use parley::context::{resolve_context_entries, AgentsFilesListResult};
use parley::i18n::Translator;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Estimate the token cost of text (reads stdin when no file is given).
    Estimate {
        /// Config file path (default: PARLEY_CONFIG_PATH or ~/.parley/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Text file to estimate.
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Print the estimate as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Assemble a chat snapshot (sessionKey, messages, toolMessages, stream, streamStartedAt) into render items.
    Transcript {
        /// Config file path (default: PARLEY_CONFIG_PATH or ~/.parley/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Snapshot JSON file.
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Include tool results and tool output (overrides chat.showThinking).
        #[arg(long)]
        show_thinking: bool,

        /// Print render items as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the context files resolved from an agents.files.list payload.
    Context {
        /// Config file path (default: PARLEY_CONFIG_PATH or ~/.parley/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// agents.files.list payload JSON file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("parley {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Estimate { config, file, json }) => {
            if let Err(e) = run_estimate(config, file, json) {
                log::error!("estimate failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Transcript {
            config,
            file,
            show_thinking,
            json,
        }) => {
            if let Err(e) = run_transcript(config, &file, show_thinking, json) {
                log::error!("transcript failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Context { config, file }) => {
            if let Err(e) = run_context(config, &file) {
                log::error!("context failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn load(config_path: Option<PathBuf>) -> anyhow::Result<(parley::config::Config, Translator)> {
    let (config, path) = parley::config::load_config(config_path)?;
    let tr = Translator::new(parley::config::resolve_language(&config));
    log::debug!(
        "using config {} (language {})",
        path.display(),
        tr.language().code()
    );
    Ok((config, tr))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    use anyhow::Context;
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing {}", path.display()))
}

fn run_estimate(config_path: Option<PathBuf>, file: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    use anyhow::Context;
    let (config, tr) = load(config_path)?;
    let text = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("reading stdin")?;
            s
        }
    };
    let est = parley::tokens::estimate_tokens_with(&text, config.tokens.chars_per_token);
    if json {
        println!("{}", serde_json::to_string_pretty(&est)?);
        return Ok(());
    }
    println!("{}: {}", tr.t("Characters"), est.chars);
    println!("{}: {}", tr.t("Words"), est.words);
    println!("{}: {}", tr.t("CJK chars"), est.cjk_chars);
    println!("{}: {}", tr.t("Estimated tokens"), est.tokens);
    Ok(())
}

fn run_transcript(
    config_path: Option<PathBuf>,
    file: &Path,
    show_thinking: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (config, _tr) = load(config_path)?;
    let raw: serde_json::Value = read_json(file)?;
    let view = snapshot_view(raw, &config, show_thinking)?;

    let items = build_chat_items(&view);
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    for item in &items {
        match item {
            RenderItem::Group(g) => {
                println!("[{}] {} message(s)  {}", g.role, g.messages.len(), g.key);
                for m in &g.messages {
                    println!("    {}  {}", m.key, preview(&m.message.content));
                }
            }
            RenderItem::Item(ChatItem::Stream { key, text, .. }) => {
                println!("[streaming] {}  {}", key, preview(&serde_json::Value::String(text.clone())));
            }
            RenderItem::Item(ChatItem::ReadingIndicator { key }) => {
                println!("[reading] {}", key);
            }
            RenderItem::Item(ChatItem::Message { key, .. }) => {
                println!("[message] {}", key);
            }
        }
    }
    Ok(())
}

/// Snapshot fields win over config; `--show-thinking` forces tool output on.
fn snapshot_view(
    raw: serde_json::Value,
    config: &parley::config::Config,
    show_thinking: bool,
) -> anyhow::Result<TranscriptView> {
    let mut view: TranscriptView = serde_json::from_value(raw.clone())?;
    if raw.get("sessionKey").is_none() {
        view.session_key = config.chat.default_session_key.clone();
    }
    if raw.get("historyLimit").is_none() {
        view.history_limit = config.chat.history_render_limit;
    }
    if raw.get("showThinking").is_none() {
        view.show_thinking = config.chat.show_thinking;
    }
    view.show_thinking |= show_thinking;
    Ok(view)
}

/// First line of text content, shortened for terminal output.
fn preview(content: &serde_json::Value) -> String {
    const MAX: usize = 60;
    let text = match content {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > MAX {
        format!("{}…", line.chars().take(MAX).collect::<String>())
    } else {
        line.to_string()
    }
}

fn run_context(config_path: Option<PathBuf>, file: &Path) -> anyhow::Result<()> {
    let (_config, tr) = load(config_path)?;
    let list: AgentsFilesListResult = read_json(file)?;
    let now = parley::format::now_ms();
    for entry in resolve_context_entries(Some(&list)) {
        let status = if entry.missing {
            tr.t("No context file yet.")
        } else {
            match entry.updated_at_ms {
                Some(ms) => tr.t_with(
                    "Last updated {time}",
                    &[("time", parley::format::format_ago(ms, now).as_str())],
                ),
                None => String::new(),
            }
        };
        println!(
            "{:<18} {:<28} {}",
            tr.t(entry.label_key),
            tr.t_with(entry.description_key, &[("file", entry.name.as_str())]),
            status
        );
    }
    Ok(())
}
