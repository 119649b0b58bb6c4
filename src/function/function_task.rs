//! Function definitions read from task documents.
//!
//! ```text
//! function
//!   inputs: x1, x2
//!   outputs: x1*sin(x2), cos(x1 + x2), (x2+1)*exp(x1-2*x2)
//!   output_names: a, b, c        // optional
//! settings                       // optional section
//!   loglevel: info               // off, none, error, warn, info, debug, trace
//! ```
//! # Example
//! ```
//! use RustedFunctions::function::function_task::FunctionTask;
//! let task: FunctionTask = "function\n inputs: x\n outputs: x^2, 2*x".parse().unwrap();
//! let f = task.build().unwrap();
//! assert_eq!(f.evaluate(&[3.0]).unwrap(), vec![9.0, 6.0]);
//! ```
use crate::Utils::logger::{init_logger, level_from_name};
use crate::Utils::task_parser::{DocumentMap, SectionMap, parse_document_as_strings};
use crate::function::function_errors::FunctionError;
use crate::function::function_handle::Function;
use crate::function::symbolic_function::SymbolicFunction;
use log::{LevelFilter, info, warn};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

const FUNCTION_SECTION: &str = "function";
const SETTINGS_SECTION: &str = "settings";
const FUNCTION_KEYS: [&str; 3] = ["inputs", "outputs", "output_names"];
const SETTINGS_KEYS: [&str; 1] = ["loglevel"];

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("cannot read task file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("task document syntax error: {0}")]
    Syntax(String),
    #[error("task document has no '{0}' section")]
    MissingSection(String),
    #[error("section '{section}' has no '{key}' key")]
    MissingKey { section: String, key: String },
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error(transparent)]
    Function(#[from] FunctionError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTask {
    pub inputs: Vec<String>,
    pub formulas: Vec<String>,
    pub output_names: Option<Vec<String>>,
    pub loglevel: Option<LevelFilter>,
}

impl FunctionTask {
    pub fn parse_task(document: &str) -> Result<Self, TaskError> {
        let document = parse_document_as_strings(document).map_err(TaskError::Syntax)?;
        Self::from_document(&document)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TaskError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TaskError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("reading task file {}", path.display());
        Self::parse_task(&text)
    }

    fn from_document(document: &DocumentMap) -> Result<Self, TaskError> {
        for title in document.keys() {
            if title != FUNCTION_SECTION && title != SETTINGS_SECTION {
                warn!("unknown section '{}' in task document is ignored", title);
            }
        }
        let function = document
            .get(FUNCTION_SECTION)
            .ok_or_else(|| TaskError::MissingSection(FUNCTION_SECTION.to_string()))?;
        warn_unknown_keys(FUNCTION_SECTION, function, &FUNCTION_KEYS);
        let inputs = required(function, FUNCTION_SECTION, "inputs")?;
        let formulas = required(function, FUNCTION_SECTION, "outputs")?;
        let output_names = function.get("output_names").cloned();

        let loglevel = match document.get(SETTINGS_SECTION) {
            Some(settings) => {
                warn_unknown_keys(SETTINGS_SECTION, settings, &SETTINGS_KEYS);
                match settings.get("loglevel").map(|v| v.as_slice()) {
                    None => None,
                    Some([level]) => Some(level_from_name(level).ok_or_else(|| {
                        TaskError::InvalidValue {
                            key: "loglevel".to_string(),
                            message: format!("unknown level '{}'", level),
                        }
                    })?),
                    Some(other) => {
                        return Err(TaskError::InvalidValue {
                            key: "loglevel".to_string(),
                            message: format!("expected one level, got {}", other.len()),
                        });
                    }
                }
            }
            None => None,
        };

        Ok(FunctionTask {
            inputs,
            formulas,
            output_names,
            loglevel,
        })
    }

    /// Builds the symbolic function described by the task.
    pub fn build(&self) -> Result<Function, TaskError> {
        let mut function = SymbolicFunction::new(self.inputs.as_slice(), self.formulas.as_slice())?;
        if let Some(names) = &self.output_names {
            function = function.with_output_description(names.as_slice())?;
        }
        Ok(Function::new(function))
    }

    /// Starts the terminal logger if the task asks for one, see [`init_logger`].
    pub fn init_logging(&self) -> bool {
        match self.loglevel {
            Some(level) => init_logger(level),
            None => false,
        }
    }
}

impl FromStr for FunctionTask {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionTask::parse_task(s)
    }
}

fn required(section: &SectionMap, title: &str, key: &str) -> Result<Vec<String>, TaskError> {
    section
        .get(key)
        .cloned()
        .ok_or_else(|| TaskError::MissingKey {
            section: title.to_string(),
            key: key.to_string(),
        })
}

fn warn_unknown_keys(title: &str, section: &SectionMap, known: &[&str]) {
    for key in section.keys() {
        if !known.contains(&key.as_str()) {
            warn!("unknown key '{}' in section '{}' is ignored", key, title);
        }
    }
}
