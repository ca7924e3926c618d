//! Interactive REPL for the tagmeta meta-language
//!
//! Each complete input is parsed and elaborated on a single engine, so
//! `define`, `deftag` and `common_datatype` persist across lines. Input
//! continues over several lines until its brackets balance.

use miette::{Diagnostic, Report};
use rustyline::{DefaultEditor, error::ReadlineError};
use tagmeta_core::{Engine, EngineConfig, TagmetaError, Value};
use thiserror::Error;

/// Errors that can occur in the REPL
#[derive(Debug, Error, Diagnostic)]
pub enum ReplError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Tagmeta(#[from] TagmetaError),

    #[error("Readline error: {source}")]
    Readline {
        #[from]
        source: ReadlineError,
    },

    #[error("REPL command error: {message}")]
    #[diagnostic(help("Type :help for available commands"))]
    Command { message: String },
}

/// REPL configuration options
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub prompt: String,
    pub persist_history: bool,
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "tagmeta> ".to_string(),
            persist_history: true,
            history_file: Some(".tagmeta_history".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplStats {
    pub forms_evaluated: usize,
    pub errors_encountered: usize,
    pub commands_executed: usize,
}

/// Result of evaluating a line in the REPL
#[derive(Debug, PartialEq)]
pub enum ReplResult {
    /// Values of the top-level forms on the line
    Values(Vec<Value>),
    Command { message: String },
    Empty,
    Exit,
}

pub struct ReplSession {
    editor: DefaultEditor,
    engine: Engine,
    config: ReplConfig,
    stats: ReplStats,
}

impl ReplSession {
    pub fn with_config(config: ReplConfig, engine_config: EngineConfig) -> Result<Self, ReplError> {
        let mut editor = DefaultEditor::new()?;

        if config.persist_history {
            if let Some(ref history_file) = config.history_file {
                // A missing history file just means a fresh session
                let _ = editor.load_history(history_file);
            }
        }

        Ok(Self {
            editor,
            engine: Engine::with_config(engine_config),
            config,
            stats: ReplStats::default(),
        })
    }

    /// Start the REPL main loop
    pub fn run(&mut self) -> Result<(), ReplError> {
        self.print_welcome();

        while let Some(input) = self.read_input()? {
            match self.evaluate_line(&input) {
                Ok(ReplResult::Exit) => break,
                Ok(result) => self.display_result(result),
                Err(error) => {
                    self.stats.errors_encountered += 1;
                    eprintln!("{:?}", Report::new(error));
                }
            }
        }

        println!("Goodbye! 👋");
        self.save_history()?;
        Ok(())
    }

    /// Read one complete input, which may span several lines
    fn read_input(&mut self) -> Result<Option<String>, ReplError> {
        let mut input = String::new();

        loop {
            let prompt = if input.is_empty() { self.config.prompt.as_str() } else { "... " };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    if input.is_empty() && line.trim().is_empty() {
                        return Ok(Some(String::new()));
                    }
                    if !input.is_empty() {
                        input.push('\n');
                    }
                    input.push_str(&line);

                    if is_input_complete(&input) {
                        self.editor.add_history_entry(input.as_str())?;
                        return Ok(Some(input));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(ReplError::Readline { source: err }),
            }
        }
    }

    /// Evaluate a line of input
    pub fn evaluate_line(&mut self, line: &str) -> Result<ReplResult, ReplError> {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with(';') {
            return Ok(ReplResult::Empty);
        }
        if trimmed.starts_with(':') {
            return self.execute_command(trimmed);
        }

        let values = self.engine.evaluate_source_named(line, "<repl>")?;
        self.stats.forms_evaluated += values.len();
        Ok(ReplResult::Values(values))
    }

    fn execute_command(&mut self, command: &str) -> Result<ReplResult, ReplError> {
        self.stats.commands_executed += 1;

        let message = match command {
            ":help" | ":h" => help_message().to_string(),
            ":vars" => self.format_variables(),
            ":stats" => self.format_stats(),
            ":config" => self.format_config(),
            ":clear" => {
                self.engine.clear_bindings();
                "Bindings cleared".to_string()
            }
            ":quit" | ":q" | ":exit" => return Ok(ReplResult::Exit),
            unknown => {
                return Err(ReplError::Command {
                    message: format!("Unknown command: {unknown}"),
                })
            }
        };
        Ok(ReplResult::Command { message })
    }

    fn display_result(&self, result: ReplResult) {
        match result {
            ReplResult::Values(values) => {
                for value in values {
                    println!("{value}");
                }
            }
            ReplResult::Command { message } => println!("{message}"),
            ReplResult::Empty | ReplResult::Exit => {}
        }
    }

    fn print_welcome(&self) {
        println!("🏷️  tagmeta REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for commands, :quit to exit");
        println!();
    }

    fn save_history(&mut self) -> Result<(), ReplError> {
        if self.config.persist_history {
            if let Some(ref history_file) = self.config.history_file {
                self.editor.save_history(history_file)?;
            }
        }
        Ok(())
    }

    fn format_variables(&self) -> String {
        let lines: Vec<String> = self
            .engine
            .bindings()
            .map(|(name, value)| format!("  {name} = {value}"))
            .collect();

        if lines.is_empty() {
            "No bindings defined".to_string()
        } else {
            format!("Bindings:\n{}", lines.join("\n"))
        }
    }

    fn format_stats(&self) -> String {
        let cache = self.engine.stats();
        format!(
            r#"Session Statistics:
  Forms evaluated: {}
  Errors encountered: {}
  Commands executed: {}
  Cache hits: {}
  Cache misses: {}
  Cached results: {}"#,
            self.stats.forms_evaluated,
            self.stats.errors_encountered,
            self.stats.commands_executed,
            cache.hits,
            cache.misses,
            cache.entries
        )
    }

    fn format_config(&self) -> String {
        let config = self.engine.config();
        format!(
            r#"Engine Configuration:
  Max depth: {}
  Max sequence length: {}
  Memoize: {}
  History file: {}"#,
            config.max_depth,
            config.max_sequence_length,
            config.memoize,
            self.config.history_file.as_deref().unwrap_or("<none>")
        )
    }
}

/// Whether every bracket in `input` is closed, ignoring comments
fn is_input_complete(input: &str) -> bool {
    let mut depth: i64 = 0;
    for line in input.lines() {
        let code = line.split(';').next().unwrap_or("");
        for ch in code.chars() {
            match ch {
                '(' | '[' => depth += 1,
                ')' | ']' => depth -= 1,
                _ => {}
            }
        }
    }
    // Surplus closers are complete so the parser can report them
    depth <= 0
}

fn help_message() -> &'static str {
    r#"tagmeta REPL Commands:
  :help, :h           Show this help message
  :vars               List top-level bindings
  :clear              Remove all bindings
  :stats              Show session and cache statistics
  :config             Show engine limits
  :quit, :q, :exit    Exit the REPL

Examples:
  (define xs [1 2 3])           ; bind a list
  (at xs 1)                     ; positional access
  (at (map (pair a 1)) b 0)     ; key lookup with a default
  (less 1 2 3)                  ; chained comparison
  (find_if xs (lambda (greater _1 1)))

Use Ctrl+C to cancel input, Ctrl+D to exit."#
}
