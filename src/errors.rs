use thiserror::Error;

/// A single field that failed validation inside a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub key: &'static str,
    pub label: &'static str,
    pub message: String,
}

/// Failures reported by the wizard engine. None of these are fatal: the
/// wizard state stays usable after every variant except `AlreadySubmitted`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Complete \"{step}\" before continuing")]
    StepIncomplete {
        index: usize,
        step: &'static str,
        fields: Vec<FieldIssue>,
    },
    #[error("Step {index} does not exist (this form has {total} steps)")]
    StepOutOfRange { index: usize, total: usize },
    #[error("Form `{0}` defines no steps")]
    NoSteps(&'static str),
    #[error("Submit is only available from the final step")]
    NotAtFinalStep,
    #[error("Submission failed: {0}")]
    Submission(#[source] ApiError),
    #[error("Form has already been submitted")]
    AlreadySubmitted,
    #[error("Could not assemble payload: {0}")]
    Assembly(String),
}

/// Failures talking to the REST collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Server responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Invalid listing criteria.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("`{value}` is not an option for filter `{filter}` (expected one of: {options})")]
    UnknownOption {
        filter: &'static str,
        value: String,
        options: String,
    },
    #[error("Unknown filter `{0}`")]
    UnknownFilter(String),
    #[error("Unknown sort key `{0}`")]
    UnknownSortKey(String),
}

/// Error type that captures local data store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Failures loading or updating the CLI configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unknown configuration key `{0}`")]
    UnknownKey(String),
    #[error("Invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },
}

/// Top-level error surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("Unknown command `{command}`{}", suggestion_suffix(.suggestion))]
    UnknownCommand {
        command: String,
        suggestion: Option<String>,
    },
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Input error: {0}")]
    Input(#[from] std::io::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("Invalid command line: {0}")]
    Parse(#[from] shell_words::ParseError),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|candidate| format!(". Did you mean `{candidate}`?"))
        .unwrap_or_default()
}
