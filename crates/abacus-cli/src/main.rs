#![deny(unsafe_code)]

//! Abacus CLI — scripted and line-oriented calculator.

use std::io::Write;
use std::path::{Path, PathBuf};

use abacus_config::AppConfig;
use abacus_core::{Calculator, Input, build_info, parse_sequence};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Abacus — a four-function calculator.
#[derive(Parser)]
#[command(name = "abacus", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "abacus.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Press a sequence of keys and print the display.
    Eval {
        /// Keys to press: sequences like `12+3=` or key names like `Enter`.
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        keys: Vec<String>,

        /// Print the full calculator state as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Read key sequences from stdin, one line at a time.
    Repl,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },

    /// Show version and build details.
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config).await?;

    // -v flags win over the configured level; RUST_LOG wins over both.
    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Eval { keys, json } => cmd_eval(&config, &keys, json)?,
        Commands::Repl => cmd_repl(&config).await?,
        Commands::Config { show } => cmd_config(&config, &cli.config, show)?,
        Commands::Version => println!("{}", build_info::build_report()),
    }

    Ok(())
}

fn cmd_eval(config: &AppConfig, keys: &[String], json: bool) -> Result<()> {
    let mut calc = Calculator::from_config(config);
    calc.apply_all(key_inputs(keys));
    println!("{}", render(&calc, json)?);
    Ok(())
}

async fn cmd_repl(config: &AppConfig) -> Result<()> {
    info!("Starting REPL");
    let mut calc = Calculator::from_config(config);
    let stdin = BufReader::new(tokio::io::stdin());
    repl(&mut calc, stdin, &mut std::io::stdout()).await
}

fn cmd_config(config: &AppConfig, config_path: &Path, show: bool) -> Result<()> {
    if show {
        let toml_str = toml::to_string_pretty(config).context("serializing configuration")?;
        println!("{toml_str}");
    } else if config_path.exists() {
        println!("Configuration at '{}' is valid.", config_path.display());
    } else {
        println!(
            "No configuration at '{}'; using defaults.",
            config_path.display()
        );
    }
    Ok(())
}

async fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load_or_default(path)
        .await
        .with_context(|| format!("loading config from '{}'", path.display()))
}

/// Turn command-line words into inputs.
///
/// A word that is a whole key name (`Enter`, `Backspace`, `Escape`) is
/// pressed as that key; anything else is read as a key sequence.
fn key_inputs(words: &[String]) -> Vec<Input> {
    words
        .iter()
        .flat_map(|word| match Input::from_key(word) {
            Some(input) if word.chars().count() > 1 => vec![input],
            _ => parse_sequence(word),
        })
        .collect()
}

fn render(calc: &Calculator, json: bool) -> Result<String> {
    if !json {
        return Ok(calc.current_display_value());
    }
    let value = serde_json::json!({
        "display": calc.current_display_value(),
        "expression": calc.expression(),
        "state": calc.state(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Apply each line as a key sequence, writing the display after it.
async fn repl<R, W>(calc: &mut Calculator, reader: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "quit" {
            break;
        }
        if line.is_empty() {
            continue;
        }
        debug!(line, "REPL input");
        calc.apply_all(parse_sequence(line));
        writeln!(out, "{}", calc.current_display_value())?;
    }
    info!("REPL finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use abacus_core::Operator;
    use abacus_test_utils::config::{TempConfigFile, TestConfigBuilder};
    use pretty_assertions::assert_eq;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_key_inputs_mixes_names_and_sequences() {
        let inputs = key_inputs(&words(&["12", "+", "3", "Enter"]));
        assert_eq!(
            inputs,
            vec![
                Input::Number('1'),
                Input::Number('2'),
                Input::Operator(Operator::Add),
                Input::Number('3'),
                Input::Calculate,
            ]
        );
    }

    #[test]
    fn test_key_inputs_single_char_c_is_clear() {
        assert_eq!(key_inputs(&words(&["c"])), vec![Input::Clear]);
    }

    #[test]
    fn test_key_inputs_skips_unknown() {
        assert_eq!(key_inputs(&words(&["Tab", "x"])), vec![]);
    }

    #[test]
    fn test_cli_accepts_leading_minus() {
        let cli = Cli::try_parse_from(["abacus", "eval", "5", "-", "3", "="]).unwrap();
        match cli.command {
            Commands::Eval { keys, json } => {
                assert_eq!(keys, words(&["5", "-", "3", "="]));
                assert!(!json);
            }
            _ => panic!("expected eval"),
        }
    }

    #[test]
    fn test_cli_eval_requires_keys() {
        assert!(Cli::try_parse_from(["abacus", "eval"]).is_err());
    }

    #[test]
    fn test_render_plain() {
        let mut calc = Calculator::new();
        calc.apply_all(key_inputs(&words(&["1000*3="])));
        assert_eq!(render(&calc, false).unwrap(), "3,000");
    }

    #[test]
    fn test_render_json() {
        let mut calc = Calculator::new();
        calc.apply_all(key_inputs(&words(&["7+"])));
        let value: serde_json::Value =
            serde_json::from_str(&render(&calc, true).unwrap()).unwrap();
        assert_eq!(value["display"], "7");
        assert_eq!(value["expression"], "7 +");
        assert_eq!(value["state"]["operator"], "+");
        assert_eq!(value["state"]["previous_input"], "7");
        assert_eq!(value["state"]["should_reset_display"], true);
    }

    #[test]
    fn test_render_uses_configured_separators() {
        let config = TestConfigBuilder::new().separators(".", ",").build();
        let mut calc = Calculator::from_config(&config);
        calc.apply_all(parse_sequence("1234.5"));
        assert_eq!(render(&calc, false).unwrap(), "1.234,5");
    }

    #[tokio::test]
    async fn test_repl_prints_after_each_line() {
        let mut calc = Calculator::new();
        let mut out = Vec::new();
        let input: &[u8] = b"12+3\n=\n\n/0=\nquit\n9\n";
        repl(&mut calc, input, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3\n15\nError\n");
    }

    #[tokio::test]
    async fn test_repl_stops_at_eof() {
        let mut calc = Calculator::new();
        let mut out = Vec::new();
        let input: &[u8] = b"2*21=";
        repl(&mut calc, input, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "42\n");
    }

    #[tokio::test]
    async fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(config.engine.precision, 8);
    }

    #[tokio::test]
    async fn test_load_config_invalid_file_is_error() {
        let file = TempConfigFile::with_toml("[engine]\nprecision = 99\n").await;
        let err = load_config(file.path()).await.unwrap_err();
        assert!(format!("{err:#}").contains("precision"));
    }

    #[test_log::test]
    fn test_cmd_config_missing_file() {
        let config = AppConfig::default();
        cmd_config(&config, Path::new("does-not-exist.toml"), false).unwrap();
        cmd_config(&config, Path::new("does-not-exist.toml"), true).unwrap();
    }
}
