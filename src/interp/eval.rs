//! Statement execution

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::env::Scope;
use crate::blocks::{Block, structure};
use crate::diagnostics::{Result, ScriptError};
use crate::lexer::split::split_once_top_level;
use crate::parser::parse;
use crate::render::{NotationRenderer, RenderLog};
use crate::value::Value;

/// One script line, classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    If { condition: &'a str },
    Else,
    For { variable: &'a str, iterable: &'a str },
    Output { expression: &'a str },
    Render { notation: &'a str, destination: &'a str },
    Assign { name: &'a str, expression: &'a str },
}

/// `$` followed by one or more of `[A-Za-z0-9_]`
fn is_variable_name(text: &str) -> bool {
    text.strip_prefix('$').is_some_and(|name| {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

fn malformed(statement: &str) -> ScriptError {
    ScriptError::syntax(format!("Invalid or incomplete '{statement}' syntax"))
}

impl<'a> Statement<'a> {
    /// Classify a trimmed statement line
    pub fn parse(line: &'a str) -> Result<Self> {
        let keyword = line
            .split(|c: char| c.is_whitespace() || c == ':')
            .next()
            .unwrap_or_default();

        match keyword {
            "if" => {
                let condition = line["if".len()..]
                    .strip_suffix(':')
                    .map(str::trim)
                    .filter(|c| !c.is_empty() && !c.contains(':'))
                    .ok_or_else(|| malformed("if"))?;
                Ok(Statement::If { condition })
            }
            "else" => match line["else".len()..].trim() {
                ":" => Ok(Statement::Else),
                _ => Err(ScriptError::syntax(
                    "Invalid or malformed else statement",
                )),
            },
            "for" => {
                let header = line["for".len()..]
                    .strip_suffix(':')
                    .ok_or_else(|| malformed("for"))?;
                let (variable, iterable) = header
                    .split_once(" in ")
                    .map(|(v, i)| (v.trim(), i.trim()))
                    .filter(|(v, i)| is_variable_name(v) && !i.is_empty())
                    .ok_or_else(|| malformed("for"))?;
                Ok(Statement::For { variable, iterable })
            }
            "output" => {
                let expression = line["output".len()..].trim();
                if expression.is_empty() {
                    return Err(malformed("output"));
                }
                Ok(Statement::Output { expression })
            }
            "render" => {
                let (notation, destination) =
                    split_once_top_level(&line["render".len()..], " as ")?
                        .map(|(n, d)| (n.trim(), d.trim()))
                        .filter(|(n, d)| !n.is_empty() && !d.is_empty())
                        .ok_or_else(|| malformed("render"))?;
                Ok(Statement::Render {
                    notation,
                    destination,
                })
            }
            _ => {
                let assignment = line.split_once(":=").and_then(|(name, expression)| {
                    let (name, expression) = (name.trim(), expression.trim());
                    (is_variable_name(name) && !expression.is_empty()).then_some((name, expression))
                });
                match assignment {
                    Some((name, expression)) => Ok(Statement::Assign { name, expression }),
                    None => Err(ScriptError::syntax("Unrecognised structure")),
                }
            }
        }
    }

    fn opens_block(&self) -> bool {
        matches!(
            self,
            Statement::If { .. } | Statement::Else | Statement::For { .. }
        )
    }
}

/// Outcome of the most recent `if` at the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Latch {
    Taken,
    NotTaken,
    None,
}

/// Script interpreter
pub struct Interpreter<R: NotationRenderer = RenderLog> {
    scope: Scope,
    renderer: R,
    output_dir: PathBuf,
    /// Output log, one entry per `output` statement
    output: Vec<String>,
}

impl Interpreter<RenderLog> {
    /// Interpreter that records render requests instead of writing files
    pub fn new() -> Result<Self> {
        Self::with_renderer(RenderLog::new())
    }
}

impl<R: NotationRenderer> Interpreter<R> {
    pub fn with_renderer(renderer: R) -> Result<Self> {
        Ok(Interpreter {
            scope: Scope::initial()?,
            renderer,
            output_dir: PathBuf::new(),
            output: Vec::new(),
        })
    }

    /// Directory render destinations are resolved against
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Get the output log
    pub fn get_output(&self) -> &[String] {
        &self.output
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Structure and run a whole script, returning the output log
    pub fn run(&mut self, source: &str) -> Result<&[String]> {
        let blocks = structure(source);
        info!(statements = blocks.len(), "running script");
        self.interpret(&blocks)?;
        info!(outputs = self.output.len(), "script finished");
        Ok(&self.output)
    }

    /// Run a block forest at the current scope depth
    pub fn interpret(&mut self, blocks: &[Block]) -> Result<()> {
        let mut latch = Latch::None;
        for block in blocks {
            self.execute(block, &mut latch)
                .map_err(|e| e.at_line(block.number))?;
        }
        Ok(())
    }

    /// Run `blocks` inside a fresh frame, binding `binding` first when given
    fn run_nested(&mut self, blocks: &[Block], binding: Option<(&str, Value)>) -> Result<()> {
        self.scope.push_scope();
        if let Some((name, value)) = binding {
            self.scope.define(name, value);
        }
        let result = self.interpret(blocks);
        self.scope.pop_scope();
        result
    }

    fn evaluate(&mut self, expression: &str) -> Result<Value> {
        parse(expression, &mut self.scope)
    }

    fn execute(&mut self, block: &Block, latch: &mut Latch) -> Result<()> {
        let statement = Statement::parse(&block.line)?;
        debug!(line = block.number, statement = %block.line, "executing");

        if !statement.opens_block() && !block.children.is_empty() {
            return Err(ScriptError::syntax(format!(
                "Unexpected indented block after '{}'",
                block.line
            )));
        }

        match statement {
            Statement::If { condition } => {
                let taken = match self.evaluate(condition)? {
                    Value::Boolean(b) => b,
                    other => {
                        return Err(ScriptError::type_error(format!(
                            "Condition must be a boolean, not {}",
                            other.kind()
                        )));
                    }
                };
                if taken {
                    self.run_nested(&block.children, None)?;
                    *latch = Latch::Taken;
                } else {
                    *latch = Latch::NotTaken;
                }
                return Ok(());
            }
            Statement::Else => {
                let previous = std::mem::replace(latch, Latch::None);
                return match previous {
                    Latch::NotTaken => self.run_nested(&block.children, None),
                    Latch::Taken => Ok(()),
                    Latch::None => Err(ScriptError::syntax(
                        "Invalid or malformed else statement (no corresponding 'if')",
                    )),
                };
            }
            _ => *latch = Latch::None,
        }

        match statement {
            Statement::For { variable, iterable } => {
                let value = self.evaluate(iterable)?;
                let Some(Value::Array(items)) = value.to_array()? else {
                    return Err(ScriptError::type_error(format!(
                        "cannot coalesce type {} to array",
                        value.kind()
                    )));
                };
                for item in items.iter() {
                    self.run_nested(&block.children, Some((variable, item.clone())))?;
                }
            }
            Statement::Output { expression } => {
                let entry = match self.evaluate(expression)? {
                    Value::Array(items) => items
                        .iter()
                        .map(Value::identity)
                        .collect::<Vec<_>>()
                        .join(","),
                    other => other.identity(),
                };
                debug!(entry = %entry, "output");
                self.output.push(entry);
            }
            Statement::Assign { name, expression } => {
                let value = self.evaluate(expression)?;
                self.scope.assign(name, value);
            }
            Statement::Render {
                notation,
                destination,
            } => self.render(notation, destination)?,
            Statement::If { .. } | Statement::Else => {}
        }
        Ok(())
    }

    fn render(&mut self, notation: &str, destination: &str) -> Result<()> {
        let subject = self.evaluate(notation)?;
        let destination = self.evaluate(destination)?;

        let Some(Value::String(path)) = destination.to_string_value()? else {
            return Err(ScriptError::render(format!(
                "Invalid type specified for destination path for render: {}",
                destination.kind()
            )));
        };
        let notation = match subject {
            Value::Notation(notation) => notation,
            other => {
                return Err(ScriptError::render(format!(
                    "The data to render must be notation (received {})",
                    other.kind()
                )));
            }
        };

        let target = self.output_dir.join(path);
        debug!(target = %target.display(), "render request");
        self.renderer.render(&notation, &target)
    }
}
