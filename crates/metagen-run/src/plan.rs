//! Generation plans: an ordered list of session steps read from TOML.
//!
//! ```toml
//! [[step]]
//! start = "Metagen.Source.MyApiRequestDto"
//!
//! [[step]]
//! broadcast = [{type = "String"}, "Name"]
//!
//! [[step]]
//! complete = true
//! ```

use std::str::FromStr;

use metagen::{Arg, Session, TemplateResolver, TypeName};
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PlanError {
    #[error("Plan could not be parsed")]
    #[diagnostic(code(metagen_run::plan::parse))]
    Parse(#[source] toml::de::Error),

    #[error("Step {index} must set exactly one of `start`, `broadcast` or `complete = true`")]
    #[diagnostic(
        code(metagen_run::plan::invalid_step),
        help("Split the step into one `[[step]]` table per action.")
    )]
    InvalidStep { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Start(String),
    Broadcast(Vec<Arg>),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlan {
    #[serde(default, rename = "step")]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    start: Option<String>,
    broadcast: Option<Vec<RawArg>>,
    complete: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawArg {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Type {
        #[serde(rename = "type")]
        name: String,
    },
}

impl From<RawArg> for Arg {
    fn from(arg: RawArg) -> Self {
        match arg {
            RawArg::Bool(b) => Arg::Bool(b),
            RawArg::Int(n) => Arg::Int(n),
            RawArg::Float(n) => Arg::Float(n),
            RawArg::Str(s) => Arg::Str(s.into()),
            RawArg::Type { name } => Arg::Type(TypeName::new(name)),
        }
    }
}

impl FromStr for Plan {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: RawPlan = toml::from_str(s).map_err(PlanError::Parse)?;

        let steps = raw
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| match step {
                RawStep {
                    start: Some(id),
                    broadcast: None,
                    complete: None,
                } => Ok(Step::Start(id)),
                RawStep {
                    start: None,
                    broadcast: Some(args),
                    complete: None,
                } => Ok(Step::Broadcast(args.into_iter().map(Arg::from).collect())),
                RawStep {
                    start: None,
                    broadcast: None,
                    complete: Some(true),
                } => Ok(Step::Complete),
                _ => Err(PlanError::InvalidStep { index: index + 1 }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { steps })
    }
}

impl Plan {
    /// Applies every step in order, stopping at the first failure.
    pub fn run<R: TemplateResolver>(&self, session: &mut Session<R>) -> Result<(), metagen::Error> {
        for step in &self.steps {
            match step {
                Step::Start(id) => session.start(id)?,
                Step::Broadcast(args) => session.broadcast(args)?,
                Step::Complete => session.complete()?,
            }
        }

        Ok(())
    }
}
