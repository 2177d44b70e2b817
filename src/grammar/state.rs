/// Per-parse mutable state threaded through the grammar.
///
/// A `ParserState` belongs to exactly one parse invocation; concurrent
/// parses each own their own instance.
#[derive(Debug, Default)]
pub(crate) struct ParserState {
    /// Warnings collected during parsing for post-parse emission.
    /// PEG backtracking can fire the same warning several times; storing
    /// them here with deduplication and emitting after parsing avoids
    /// duplicates.
    pub(crate) warnings: Vec<String>,
}

impl ParserState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Collect a warning for post-parse emission. Deduplicates by message.
    pub(crate) fn add_warning(&mut self, message: String) {
        if !self.warnings.contains(&message) {
            self.warnings.push(message);
        }
    }

    /// Emit all collected warnings via tracing. Call after parsing completes.
    pub(crate) fn emit_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("{warning}");
        }
    }
}
