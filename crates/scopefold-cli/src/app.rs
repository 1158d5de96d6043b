//! CLI Application logic
//!
//! Contains the command-line interface implementation. Command functions
//! write their report to the given writer so they can be driven from tests.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use scopefold_core::{Classifiers, CompileMode, LevelingEngine, PatternLexer, Rules};
use scopefold_selector::Selector;

/// Output format for leveled tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One tab-separated line per token
    #[default]
    Text,
    /// JSON array of tokens
    Json,
}

#[derive(Parser)]
#[command(name = "scopefold")]
#[command(author, version, about = "Scope selectors and indentation-aware token leveling", long_about = None)]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a rule file and report every section
    Check {
        /// Rule file (TOML, or JSON with a .json extension)
        rules: PathBuf,
    },

    /// Evaluate a selector against a scope list
    Match {
        /// Selector expression
        selector: String,

        /// Scopes, outer to inner
        #[arg(required = true)]
        scopes: Vec<String>,
    },

    /// Level a document and print its tokens
    Level {
        /// Input document
        input: PathBuf,

        /// Rule file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        rules: PathBuf,

        /// Pattern lexer file (TOML)
        #[arg(short, long)]
        lexer: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Treat invalid selectors and malformed sections as never matching
        #[arg(long)]
        lenient: bool,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments, installs logging and dispatches to the command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Check { rules } => {
            check_command(&rules, &mut out)?;
        }
        Commands::Match { selector, scopes } => {
            match_command(&selector, &scopes, &mut out)?;
        }
        Commands::Level {
            input,
            rules,
            lexer,
            format,
            lenient,
        } => {
            level_command(&input, &rules, &lexer, format, lenient, &mut out)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Execute the check command
///
/// Every section is compiled, so all malformed sections and invalid
/// selectors are reported before the command fails.
pub fn check_command(rules_path: &Path, out: &mut impl Write) -> Result<()> {
    let rules = Rules::load(rules_path)
        .with_context(|| format!("Failed to load rules: {}", rules_path.display()))?;
    let (classifiers, problems) = Classifiers::compile_with_report(&rules);

    writeln!(out, "Checking: {}", rules_path.display())?;
    let selectors = [
        ("assignment.single", &rules.assignment.single),
        ("assignment.multiple", &rules.assignment.multiple),
        ("assignment.separator", &rules.assignment.separator),
        ("declarations", &rules.declarations),
        ("dedentation", &rules.dedentation),
        ("punctuation.continuation", &rules.punctuation.continuation),
    ];
    for (section, source) in selectors {
        let malformed = rules.malformed.iter().any(|m| m.section == section);
        match source {
            Some(source) => writeln!(out, "  {section}: {source}")?,
            None if malformed => writeln!(out, "  {section}: (malformed)")?,
            None => writeln!(out, "  {section}: (unset)")?,
        }
    }
    writeln!(
        out,
        "  indentation: {}/{} entries",
        classifiers.indentation.len(),
        rules.indentation.len()
    )?;
    writeln!(
        out,
        "  symbols: {}/{} entries",
        classifiers.symbols.len(),
        rules.symbols.len()
    )?;

    if problems.is_empty() {
        writeln!(out, "✓ No issues found")?;
        return Ok(());
    }

    for problem in &problems {
        writeln!(out, "✗ {problem}")?;
    }
    anyhow::bail!(
        "{} problem(s) in {}",
        problems.len(),
        rules_path.display()
    );
}

/// Execute the match command
pub fn match_command(selector: &str, scopes: &[String], out: &mut impl Write) -> Result<()> {
    let selector = Selector::new(selector)
        .with_context(|| format!("Invalid selector: {selector}"))?;

    writeln!(out, "selector: {selector}")?;
    writeln!(out, "scopes: {}", scopes.join(" "))?;
    writeln!(out, "matches: {}", selector.matches(scopes))?;
    writeln!(out, "rank: {}", selector.rank(scopes))?;
    Ok(())
}

/// Execute the level command
pub fn level_command(
    input: &Path,
    rules_path: &Path,
    lexer_path: &Path,
    format: OutputFormat,
    lenient: bool,
    out: &mut impl Write,
) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input: {}", input.display()))?;
    let rules = Rules::load(rules_path)
        .with_context(|| format!("Failed to load rules: {}", rules_path.display()))?;
    let mode = if lenient {
        CompileMode::Lenient
    } else {
        CompileMode::Strict
    };
    let classifiers = Classifiers::compile(&rules, mode)
        .with_context(|| format!("Invalid rules: {}", rules_path.display()))?;

    let lexer_toml = fs::read_to_string(lexer_path)
        .with_context(|| format!("Failed to read lexer: {}", lexer_path.display()))?;
    let lexer = PatternLexer::from_toml_str(&lexer_toml)
        .with_context(|| format!("Invalid lexer: {}", lexer_path.display()))?;

    let tokens = LevelingEngine::new(&classifiers, &lexer)
        .level_document(&text)
        .with_context(|| format!("Failed to level: {}", input.display()))?;
    debug!(tokens = tokens.len(), input = %input.display(), "leveled input");

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text => {
            for token in &tokens {
                writeln!(
                    out,
                    "{}:{}-{}\t{}\t{}\t{:?}",
                    token.line,
                    token.start,
                    token.end,
                    token.level,
                    token.terminal_scope(),
                    token.text
                )?;
            }
        }
    }

    Ok(())
}
