//! tedrag — terminal client for the TED RAG question-answering API.

use std::io::Write;
use std::path::PathBuf;

use tedrag_client::{HttpTransport, RagController, ReqwestTransport, UiSurface};
use tedrag_core::{ClientConfig, RenderMode};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::TerminalSurface;

fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var("TEDRAG_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(tedrag_core::config::DEFAULT_CONFIG_FILE))
}

fn print_help() {
    println!("tedrag — ask questions about TED talks");
    println!();
    println!("Usage: tedrag [--raw] [--config <file>] <command>");
    println!();
    println!("Commands:");
    println!("  stats                    Show retrieval settings");
    println!("  ask <question...>        Ask a question (JSON object in json input mode)");
    println!("  health                   Check the backend deployment");
    println!("  shell                    Interactive session (:stats, :health, :quit)");
    println!("  config [--save]          Print (or save) the effective configuration");
    println!("  help                     Show this help message");
    println!();
    println!("Environment: TEDRAG_API_BASE, TEDRAG_ORIGIN, TEDRAG_INPUT_MODE,");
    println!("             TEDRAG_RENDER_MODE, TEDRAG_CONFIG, RUST_LOG");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut raw = false;
    let mut config_path = None;
    let mut rest = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--raw" => raw = true,
            "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--config needs a file path");
                    std::process::exit(1);
                }
            },
            _ => rest.push(arg),
        }
    }

    let mut config = ClientConfig::load(&resolve_config_path(config_path))?;
    if raw {
        config.render_mode = RenderMode::Raw;
    }

    let Some(command) = rest.first().cloned() else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_help();
            return Ok(());
        }
        "config" => {
            if rest.get(1).map(String::as_str) == Some("--save") {
                config.save()?;
                println!("Saved configuration to {}", config.config_path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            return Ok(());
        }
        _ => {}
    }

    info!("API base: {} (origin {})", config.api_base, config.origin);
    let mut controller =
        RagController::from_config(ReqwestTransport::new(), TerminalSurface::new(), &config)?;

    let ok = match command.as_str() {
        "stats" => controller.fetch_stats().await.is_some(),
        "health" => controller.fetch_health().await.is_some(),
        "ask" => {
            let input = rest[1..].join(" ");
            controller.submit_question(&input).await.is_success()
        }
        "shell" => {
            run_shell(&mut controller, BufReader::new(tokio::io::stdin())).await?;
            true
        }
        other => {
            eprintln!("Unknown command: {}. Use 'tedrag help' for usage.", other);
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Read questions line by line until EOF or `:quit`. Failures are reported
/// and the loop continues.
async fn run_shell<T, U, R>(controller: &mut RagController<T, U>, input: R) -> anyhow::Result<()>
where
    T: HttpTransport,
    U: UiSurface,
    R: AsyncBufRead + Unpin,
{
    eprintln!(
        "Input mode: {:?}. Commands: :stats, :health, :quit",
        controller.input_mode()
    );
    let mut lines = input.lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match line.trim() {
            ":quit" | ":q" | ":exit" => break,
            ":stats" => {
                controller.fetch_stats().await;
            }
            ":health" => {
                controller.fetch_health().await;
            }
            _ => {
                controller.submit_question(&line).await;
            }
        }
    }

    Ok(())
}
