use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use optline_core::{CommandGrammar, validate_grammar};
use optline_parser::{CommandLine, CommandLineParser, Whitespace};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for parse results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "optline")]
#[command(about = "Validate command grammars and parse command lines against them")]
#[command(version)]
struct Cli {
    /// Log parser decisions to stderr (overrides RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate one or more grammar files (JSON or YAML).
    Validate(ValidateArgs),
    /// Parse a command line against a grammar file and print the result.
    Parse(ParseArgs),
    /// Rewrite a grammar file in another format, chosen by extension.
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Grammar files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Grammar file (JSON or YAML).
    #[arg(long)]
    grammar: PathBuf,
    /// Do not enforce required options; keep an option left waiting for
    /// its value at the end of input.
    #[arg(long)]
    relaxed: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Whole command line, command name included, split on whitespace.
    #[arg(long, conflicts_with = "tokens")]
    line: Option<String>,
    /// Tokens following the command name.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Grammar file to read.
    input: PathBuf,
    /// Grammar file to write.
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Parse(args) => run_parse(args),
        Command::Convert(args) => run_convert(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

// stdout carries the results, logs go to stderr.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_grammar(path: &Path) -> Result<CommandGrammar, String> {
    let grammar =
        CommandGrammar::load(path).map_err(|e| format!("failed to load {}: {e}", path.display()))?;
    debug!(path = %path.display(), command = %grammar.name, "Loaded grammar");
    Ok(grammar)
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failures = Vec::new();
    for path in &args.inputs {
        let grammar = load_grammar(path)?;
        let errors = validate_grammar(&grammar);
        for error in &errors {
            failures.push(format!("{}: {error}", path.display()));
        }
    }

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("{failure}");
        }
        return Err(format!("{} validation error(s)", failures.len()));
    }

    println!("Validated {} grammar file(s).", args.inputs.len());
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let grammar = load_grammar(&args.grammar)?;
    let parser = CommandLineParser::new(grammar).map_err(|e| e.to_string())?;

    let line = match &args.line {
        Some(line) => parser.parse_line(line, &Whitespace, args.relaxed),
        None => {
            let mut tokens = Vec::with_capacity(args.tokens.len() + 1);
            tokens.push(parser.grammar().name.clone());
            tokens.extend(args.tokens);
            parser.parse_tokens(tokens.as_slice(), args.relaxed)
        }
    };

    println!("{}", format_line(&line, args.format)?);

    match line.error() {
        Some(error) => Err(error.to_string()),
        None => Ok(()),
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), String> {
    let grammar = load_grammar(&args.input)?;
    grammar
        .save(&args.output)
        .map_err(|e| format!("failed to write {}: {e}", args.output.display()))?;
    println!(
        "Converted {} to {}.",
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

fn format_line(line: &CommandLine, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(line).map_err(|e| e.to_string()),
        CliOutputFormat::Yaml => serde_yaml::to_string(line).map_err(|e| e.to_string()),
    }
}
