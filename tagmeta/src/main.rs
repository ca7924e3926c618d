use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, MietteHandlerOpts, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tagmeta_core::{Engine, EngineConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod repl;
mod sexpr;

use repl::{ReplConfig, ReplSession};

#[derive(Parser)]
#[command(
    name = "tagmeta",
    version,
    about = "Tag dispatch and typeclass elaboration for type-level programs",
    long_about = "tagmeta evaluates a small S-expression meta-language over opaque types, \
                  static constants and sequences, resolving every operation by tag dispatch.",
    before_help = format!("🏷️  TAGMETA v{}\n🧮 Type-level computation by tag dispatch\n", env!("CARGO_PKG_VERSION"))
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    engine: EngineArgs,

    /// Log dispatch decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct EngineArgs {
    /// Maximum nesting depth of operation calls
    #[arg(long, global = true, value_name = "N", default_value_t = tagmeta_core::config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum number of steps when walking a sequence
    #[arg(long, global = true, value_name = "N", default_value_t = tagmeta_core::config::DEFAULT_MAX_SEQUENCE_LENGTH)]
    max_sequence_length: usize,

    /// Disable memoization of operation results
    #[arg(long, global = true)]
    no_memoize: bool,
}

impl EngineArgs {
    fn to_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_max_depth(self.max_depth)
            .with_max_sequence_length(self.max_sequence_length)
            .with_memoize(!self.no_memoize)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate tagmeta programs and print the value of every top-level form
    Eval {
        /// Source files to evaluate (use '-' to read from stdin)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Parse tagmeta source files and display their AST
    Parse {
        /// Source files to parse (use '-' to read from stdin)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Show detailed span information in output
        #[arg(short, long)]
        spans: bool,
    },

    /// Start an interactive session
    Repl,
}

fn main() {
    setup_miette_handler();

    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let config = cli.engine.to_config();

    match cli.command {
        Some(Commands::Eval { files }) => handle_eval_command(files, config),
        Some(Commands::Parse { files, spans }) => handle_parse_command(files, spans),
        Some(Commands::Repl) => handle_repl_command(config),
        None => {
            Cli::parse_from(["tagmeta", "--help"]);
        }
    }
}

/// Configure miette for error reporting
fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .color(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

fn setup_logging(verbose: bool) {
    let default_directive = if verbose { "tagmeta=debug,tagmeta_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn handle_eval_command(files: Vec<PathBuf>, config: EngineConfig) {
    let mut success = true;

    for file_path in files {
        let mut engine = Engine::with_config(config.clone());
        let result = read_source(&file_path).and_then(|(source, source_name)| {
            let values = engine.evaluate_source_named(&source, &source_name)?;
            debug!(file = %source_name, forms = values.len(), "evaluated");
            for value in values {
                println!("{value}");
            }
            Ok(())
        });

        if let Err(e) = result {
            eprintln!("{:?}", e);
            success = false;
        }
    }

    if !success {
        process::exit(1);
    }
}

fn handle_parse_command(files: Vec<PathBuf>, spans: bool) {
    let mut success = true;
    let multiple_files = files.len() > 1;

    for file_path in files {
        let result = read_source(&file_path).and_then(|(source, source_name)| {
            let program = tagmeta_parser::parse_program_with_source(&source, Some(source_name.clone()))?;
            if spans {
                println!("{:#?}", program);
            } else {
                println!("{}", sexpr::format_program_as_sexpr(&program));
            }
            Ok(source_name)
        });

        match result {
            Ok(source_name) => {
                if multiple_files {
                    println!("✅ {}", source_name);
                }
            }
            Err(e) => {
                eprintln!("{:?}", e);
                success = false;
            }
        }
    }

    if !success {
        process::exit(1);
    }
}

fn handle_repl_command(config: EngineConfig) {
    let result = ReplSession::with_config(ReplConfig::default(), config).and_then(|mut session| session.run());

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        process::exit(1);
    }
}

/// Read a source file, or stdin for `-`, returning its text and display name
fn read_source(file_path: &Path) -> Result<(String, String)> {
    if file_path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).into_diagnostic()?;
        return Ok((buffer, "<stdin>".to_string()));
    }

    if !file_path.exists() {
        return Err(miette::miette!("File not found: {}", file_path.display()));
    }

    if file_path.extension().and_then(|s| s.to_str()) != Some("tm") {
        return Err(miette::miette!("Expected .tm file, got: {}", file_path.display()));
    }

    let source = fs::read_to_string(file_path).into_diagnostic()?;
    Ok((source, file_path.display().to_string()))
}
