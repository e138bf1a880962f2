//! Positional command surface shared by the binaries.
//!
//! `wallrot <command> [params...]`: the command name picks a [`CommandName`],
//! each parameter is coerced on its own (float, then integer, then boolean,
//! else text) and the pair is checked into an [`Invocation`] before any
//! wallpaper directory is touched.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString};

use crate::apply::Painter;
use crate::error::{CommandError, SelectorError};
use crate::selector::Selector;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text,
}

/// A command-line parameter with its coerced value. The raw text is kept so
/// a wallpaper called `2024.jpg` or `42` can still be looked up by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub raw: String,
    pub value: Value,
}

impl Param {
    pub fn parse(raw: &str) -> Param {
        let value = if is_float(raw) {
            raw.parse().map(Value::Float).unwrap_or(Value::Text)
        } else if is_int(raw) {
            raw.parse().map(Value::Int).unwrap_or(Value::Text)
        } else {
            match raw {
                "true" | "True" => Value::Bool(true),
                "false" | "False" => Value::Bool(false),
                _ => Value::Text,
            }
        };

        Param {
            raw: raw.to_string(),
            value,
        }
    }

    fn as_int(&self) -> Result<i64, CommandError> {
        match self.value {
            Value::Int(i) => Ok(i),
            _ => Err(CommandError::InvalidArgument {
                value: self.raw.clone(),
                expected: "an integer",
            }),
        }
    }
}

fn digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

// -?\d+
fn is_int(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && digits(s)
}

// -?\d*\.\d+
fn is_float(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    match s.split_once('.') {
        Some((whole, frac)) => digits(whole) && !frac.is_empty() && digits(frac),
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum CommandName {
    GetState,
    GetIndex,
    GetPath,
    LoadInc,
    LoadDec,
    LoadName,
    LoadStep,
    LoadIndex,
    Load,
    Reload,
}

impl CommandName {
    /// Accepted parameter counts.
    pub fn arity(self) -> RangeInclusive<usize> {
        match self {
            CommandName::LoadName | CommandName::LoadIndex => 1..=1,
            // Step defaults to 1.
            CommandName::LoadStep => 0..=1,
            _ => 0..=0,
        }
    }
}

/// A validated command, ready to run against a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    GetState,
    GetIndex,
    GetPath,
    LoadInc,
    LoadDec,
    LoadName(String),
    LoadStep(i64),
    LoadIndex(i64),
    Load,
    Reload,
}

impl Invocation {
    pub fn parse(command: &str, params: &[Param]) -> Result<Invocation, CommandError> {
        let name = CommandName::from_str(command)
            .map_err(|_| CommandError::InvalidCommand(command.to_string()))?;

        if !name.arity().contains(&params.len()) {
            return Err(CommandError::InvalidArity);
        }

        let invocation = match name {
            CommandName::GetState => Invocation::GetState,
            CommandName::GetIndex => Invocation::GetIndex,
            CommandName::GetPath => Invocation::GetPath,
            CommandName::LoadInc => Invocation::LoadInc,
            CommandName::LoadDec => Invocation::LoadDec,
            CommandName::LoadName => Invocation::LoadName(params[0].raw.clone()),
            CommandName::LoadStep => match params.first() {
                Some(step) => Invocation::LoadStep(step.as_int()?),
                None => Invocation::LoadStep(1),
            },
            CommandName::LoadIndex => Invocation::LoadIndex(params[0].as_int()?),
            CommandName::Load => Invocation::Load,
            CommandName::Reload => Invocation::Reload,
        };

        Ok(invocation)
    }

    /// Runs the command, returning whatever it has to print.
    pub fn run<P: Painter>(
        self,
        selector: &mut Selector<P>,
    ) -> Result<Option<Output>, SelectorError> {
        match self {
            Invocation::GetState => return Ok(Some(Output::Lines(selector.get_state().to_vec()))),
            Invocation::GetIndex => return Ok(Some(Output::Index(selector.get_index()))),
            Invocation::GetPath => return Ok(Some(Output::Path(selector.get_path().to_path_buf()))),
            Invocation::LoadInc => selector.load_inc()?,
            Invocation::LoadDec => selector.load_dec()?,
            Invocation::LoadName(name) => selector.load_name(&name)?,
            Invocation::LoadStep(step) => selector.load_step(step)?,
            Invocation::LoadIndex(index) => selector.load_index(index)?,
            Invocation::Load => selector.load()?,
            Invocation::Reload => selector.reload()?,
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Lines(Vec<String>),
    Index(usize),
    Path(PathBuf),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Lines(lines) => write!(f, "{}", lines.join("\n")),
            Output::Index(index) => write!(f, "{index}"),
            Output::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Commands understood by `wallrot-settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum MaintenanceCommand {
    /// Create the settings file if it is missing.
    Rebuild,
}

impl MaintenanceCommand {
    pub fn parse(command: &str) -> Result<Self, CommandError> {
        Self::from_str(command).map_err(|_| CommandError::InvalidCommand(command.to_string()))
    }
}
