//! REPL (Read-Eval-Print Loop) for Brisk

use crate::interp::{EnvRef, Environment, Interpreter};
use crate::lexer::{tokenize, TokenKind};
use crate::parser::parse;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

pub const PROMPT: &str = ">> ";
/// Typed alone on a line, leaves the shell
pub const EXIT: &str = "exit";
const HISTORY_FILE: &str = ".brisk_history";

/// Append `;` unless the line already ends a statement or opens a block
pub fn terminate_line(line: &str) -> String {
    if line.ends_with(';') || line.ends_with('{') {
        line.to_string()
    } else {
        format!("{line};")
    }
}

/// Open minus closed braces, counted on tokens so braces in strings are ignored
pub fn brace_balance(source: &str) -> i64 {
    tokenize(source)
        .iter()
        .map(|tok| match tok.kind {
            TokenKind::LBrace => 1,
            TokenKind::RBrace => -1,
            _ => 0,
        })
        .sum()
}

/// One top-level environment and the interpreter evaluating into it
pub struct Session {
    interpreter: Interpreter,
    env: EnvRef,
}

impl Session {
    pub fn new() -> Self {
        Session {
            interpreter: Interpreter::new(),
            env: Environment::new().into_ref(),
        }
    }

    /// Parse and evaluate `source`, returning the text to show, if any.
    ///
    /// Parse errors are listed one per line, tab-indented, and nothing is
    /// evaluated.
    pub fn eval(&mut self, source: &str) -> Option<String> {
        let (program, errors) = parse(source);
        if !errors.is_empty() {
            let lines: Vec<_> = errors.iter().map(|e| format!("\t{}", e.message)).collect();
            return Some(lines.join("\n"));
        }

        self.interpreter
            .eval_program(&program, &self.env)
            .map(|value| value.to_string())
    }

    pub fn env(&self) -> &EnvRef {
        &self.env
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new() -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            session: Session::new(),
            history_path,
        };

        if let Some(ref path) = repl.history_path
            && repl.editor.load_history(path).is_err()
        {
            log::debug!("no history loaded from {}", path.display());
        }

        Ok(repl)
    }

    /// Run commands in the session before the interactive loop.
    ///
    /// Returns false once an `exit` command is seen.
    pub fn run_commands(&mut self, commands: &[String]) -> bool {
        for command in commands {
            if command.trim() == EXIT {
                return false;
            }
            if let Some(output) = self.session.eval(&terminate_line(command)) {
                println!("{output}");
            }
        }
        true
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("Hello! This is the Brisk programming language!");
        println!("Type in any Brisk commands below\n");

        loop {
            let source = match self.read_input() {
                Ok(Some(source)) => source,
                Ok(None) => break,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            };

            if let Some(output) = self.session.eval(&source) {
                println!("{output}");
            }
        }

        if let Some(ref path) = self.history_path
            && let Err(err) = self.editor.save_history(path)
        {
            log::warn!("could not save history to {}: {err}", path.display());
        }

        Ok(())
    }

    /// Read lines until braces balance. `None` means the user typed `exit`.
    fn read_input(&mut self) -> RlResult<Option<String>> {
        let mut source = String::new();
        let mut prompt = PROMPT.to_string();

        loop {
            let line = self.editor.readline(&prompt)?;
            if line.trim() == EXIT {
                return Ok(None);
            }
            if !line.trim().is_empty() {
                let _ = self.editor.add_history_entry(line.as_str());
            }

            if !source.is_empty() {
                source.push('\n');
            }
            source.push_str(&terminate_line(&line));

            let balance = brace_balance(&source);
            if balance <= 0 {
                return Ok(Some(source));
            }
            prompt = "\t".repeat(balance as usize);
        }
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
