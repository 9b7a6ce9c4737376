//! Interactive expression session

use miette::{IntoDiagnostic, Result as MietteResult};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::diagnostics::{Result, ScriptError};
use crate::interp::eval::Statement;
use crate::interp::env::Scope;
use crate::parser::parse;
use crate::value::Value;

const HELP: &str = "\
Commands:
  :help, :h    Show this help
  :vars        List bound variables
  :quit, :q    Exit the REPL
Anything else is evaluated as an expression, `$name := expr` or `output expr`.";

/// Bindings that persist between lines
pub struct Session {
    scope: Scope,
}

fn display(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(Value::identity)
            .collect::<Vec<_>>()
            .join(","),
        other => other.identity(),
    }
}

impl Session {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scope: Scope::initial()?,
        })
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Evaluate one input line. Assignments produce no output.
    pub fn eval_line(&mut self, line: &str) -> Result<Option<String>> {
        let line = line.trim();
        match line {
            "" => return Ok(None),
            ":help" | ":h" => return Ok(Some(HELP.to_string())),
            ":vars" => return Ok(Some(self.scope.names().join(" "))),
            _ => {}
        }

        match Statement::parse(line) {
            Ok(Statement::Assign { name, expression }) => {
                let value = parse(expression, &mut self.scope)?;
                debug!(name, value = %value, "bound");
                self.scope.assign(name, value);
                Ok(None)
            }
            Ok(Statement::Output { expression }) => {
                Ok(Some(display(&parse(expression, &mut self.scope)?)))
            }
            Ok(_) => Err(ScriptError::syntax(
                "Block statements are only available in scripts",
            )),
            Err(_) => Ok(Some(display(&parse(line, &mut self.scope)?))),
        }
    }
}

/// Read-evaluate-print loop on the terminal
pub fn run_repl() -> MietteResult<()> {
    println!("HighScore REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let mut session = Session::new()?;
    let mut editor = DefaultEditor::new().into_diagnostic()?;

    loop {
        match editor.readline("hs> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).into_diagnostic()?;
                if matches!(trimmed, ":quit" | ":q") {
                    break;
                }
                match session.eval_line(trimmed) {
                    Ok(Some(text)) => println!("{text}"),
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).into_diagnostic(),
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_persist() {
        let mut session = Session::new().unwrap();
        assert_eq!(session.eval_line("$x := 4").unwrap(), None);
        assert_eq!(session.eval_line("$x * 2").unwrap(), Some("8".to_string()));
        assert_eq!(session.eval_line("output [$x, 1]").unwrap(), Some("4,1".to_string()));
    }

    #[test]
    fn test_block_statements_rejected() {
        let mut session = Session::new().unwrap();
        assert!(session.eval_line("if true:").is_err());
    }

    #[test]
    fn test_vars_lists_keys() {
        let mut session = Session::new().unwrap();
        let vars = session.eval_line(":vars").unwrap().unwrap();
        assert!(vars.contains("$KEYS"));
    }
}
