mod document;
mod state;

pub(crate) use document::document_parser;
pub(crate) use state::ParserState;
