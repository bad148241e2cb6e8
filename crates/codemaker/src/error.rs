use codemaker_core::parse::ParseError;

/// Errors that abort a whole generation run.
///
/// Per-file publish problems are deliberately not represented here: they
/// are contained to the file and recorded on the pipeline result as
/// outcomes.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0} environment variable not set")]
    ConfigMissing(&'static str),

    #[error("chat completion request failed: {0}")]
    UpstreamUnavailable(String),

    #[error("chat completion response malformed: {0}")]
    UpstreamMalformed(String),

    #[error("could not parse model reply: {0}")]
    Parse(#[from] ParseError),
}
