use serde::Deserialize;

/// Errors surfaced by the parser.
///
/// Malformed markup is never an error: the grammar is closed under a
/// literal-text fallback, so any byte sequence yields a valid document. Only
/// front matter that fails to parse as YAML, violated internal invariants in
/// the list assembler, and I/O failures reach the caller.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(#[from] serde_yaml::Error),

    #[error("parsing error: {0}")]
    Parse(String),

    #[error("PEG parsing error: {0}")]
    Grammar(#[from] peg::error::ParseError<peg::str::LineCol>),

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Helper for creating internal invariant errors from list assembly.
    #[must_use]
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariant(message.into())
    }
}

// Fixture files store errors as plain messages; compare via Display.
impl<'de> Deserialize<'de> for Error {
    fn deserialize<D>(deserializer: D) -> Result<Error, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let message = String::deserialize(deserializer)?;
        Ok(Error::Parse(message))
    }
}
