use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use evaldraft::cli::{Cli, CliCommand};
use evaldraft::config::Config;
use evaldraft::error::Result;
use evaldraft::export::{read_text, write_draft};
use evaldraft::pipeline::Aggregator;
use evaldraft::prompts::PromptEngine;
use evaldraft::sheet::OpinionSheet;
use evaldraft::summarizer::{HttpChatClient, ModelSummarizer};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_aggregator(config: Config) -> Result<Aggregator> {
    let summarizer_config = config.summarizer.clone();
    let prompt_path = config.prompt_path().map(Path::to_path_buf);
    let labels = config.labels.clone();
    let aggregator = Aggregator::new(config)?;

    if !summarizer_config.enabled {
        return Ok(aggregator);
    }
    match HttpChatClient::from_config(&summarizer_config) {
        Ok(client) => {
            info!(model = ?summarizer_config.model, "model summarizer enabled");
            let summarizer = ModelSummarizer::new(client, PromptEngine::new(prompt_path), labels);
            Ok(aggregator.with_summarizer(Box::new(summarizer)))
        }
        Err(e) => {
            warn!(error = %e, "model summarizer unavailable, using lexical pipeline");
            Ok(aggregator.with_unavailable_summarizer(e.to_string()))
        }
    }
}

fn emit(text: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => write_draft(path, text),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn run(cli: &Cli, config: Config) -> Result<()> {
    let aggregator = build_aggregator(config)?;

    match &cli.command {
        CliCommand::Draft {
            sheet,
            output,
            compress,
            json,
        } => {
            let sheet = OpinionSheet::load(sheet)?;
            let report = aggregator.run(&sheet);

            let final_text = if *compress {
                let compressed = aggregator.compress(&report)?;
                info!(
                    before = report.byte_len,
                    after = compressed.byte_len,
                    byte_limit = compressed.byte_limit,
                    "draft compressed"
                );
                compressed.text
            } else {
                report.draft.clone()
            };

            if *json {
                println!("{}", report.to_json(&final_text)?);
            } else {
                print!("{}", report.render_text());
                if *compress {
                    println!("\n== 압축본 ({} bytes) ==\n\n{final_text}", final_text.len());
                }
            }

            if let Some(path) = output {
                write_draft(path, &final_text)?;
            }
            Ok(())
        }
        CliCommand::Compress { input, output } => {
            let text = read_text(input)?;
            let compressed = aggregator.compress_text(&text)?;
            debug!(
                bytes = compressed.byte_len,
                byte_limit = compressed.byte_limit,
                "compressed input"
            );
            emit(&compressed.text, output.as_ref())
        }
        CliCommand::Check { input } => {
            let text = read_text(input)?;
            let missing = aggregator.check(&text);
            if missing.is_empty() {
                println!("모든 필수 문구가 포함되어 있습니다.");
            } else {
                for phrase in &missing {
                    println!("{phrase}");
                }
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    debug!(?config, "config loaded");

    if let Err(e) = run(&cli, config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
