use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use sectionfield_chrono::{parse_script, replay, tokens, ChronoAdapter, ChronoField, Config, DateAdapter, FieldEngine};
use serde_json::json;

#[derive(Parser)]
#[command(name = "sectionfield")]
#[command(about = "Replay keystrokes against a sectioned date/time field")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay one key script and print the resulting field
    Replay {
        #[command(flatten)]
        field: FieldArgs,
        /// Keys, e.g. "{Click:0}1315p"
        keys: String,
    },
    /// Interactive mode: each line is a key script applied to the same field
    Repl {
        #[command(flatten)]
        field: FieldArgs,
    },
    /// List the supported format tokens
    Tokens,
}

#[derive(Args)]
struct FieldArgs {
    /// Format string (defaults to the locale's date-time format)
    #[arg(short, long)]
    format: Option<String>,
    /// Locale code
    #[arg(short, long, default_value = "en-US")]
    locale: String,
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Fixed "now" (YYYY-MM-DDTHH:MM:SS)
    #[arg(long)]
    now: Option<String>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl FieldArgs {
    fn build(&self) -> anyhow::Result<ChronoField> {
        let mut config = match &self.config {
            Some(path) => Config::load_toml(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(format) = &self.format {
            config.format = Some(format.clone());
        }
        let mut adapter = ChronoAdapter::with_locale(&self.locale)?;
        if let Some(now) = &self.now {
            let now = adapter
                .parse_iso(now)
                .with_context(|| format!("invalid --now {now:?}"))?;
            adapter = adapter.with_now(now);
        }
        FieldEngine::new(adapter, config)
    }
}

fn print_field(field: &mut ChronoField, json: bool) {
    let changes = field.take_changes();
    let cx = field.context();
    let value = cx.value.as_ref().map(NaiveDateTime::to_string);
    if json {
        let out = json!({
            "text": cx.text,
            "value": value,
            "candidate": cx.candidate.as_ref().map(NaiveDateTime::to_string),
            "error": cx.error,
            "selection": cx.selection,
            "changes": changes.len(),
        });
        println!("{out}");
        return;
    }
    println!("  text:    {}", cx.text);
    println!("  value:   {}", value.as_deref().unwrap_or("-"));
    if let Some(error) = cx.error {
        println!("  error:   {error}");
    }
    println!("  changes: {}", changes.len());
}

fn run_repl(mut field: ChronoField, json: bool) -> anyhow::Result<()> {
    println!("sectionfield: {} (one key script per line, Ctrl-D to exit)", field.format());
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("error reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_script(&line) {
            Ok(steps) => {
                replay(&mut field, &steps);
                print_field(&mut field, json);
            }
            Err(e) => eprintln!("error: {e:#}"),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Replay { field, keys } => {
            let steps = parse_script(&keys)?;
            let mut engine = field.build()?;
            replay(&mut engine, &steps);
            print_field(&mut engine, field.json);
        }
        Commands::Repl { field } => {
            let engine = field.build()?;
            run_repl(engine, field.json)?;
        }
        Commands::Tokens => {
            let mut names: Vec<_> = tokens::TOKENS.entries().collect();
            names.sort_by_key(|(token, _)| **token);
            for (token, info) in names {
                println!("{token:<5} {:?} {:?}", info.section_type, info.content_type);
            }
        }
    }
    Ok(())
}
