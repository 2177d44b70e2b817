#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
//! Parser for an `AsciiDoc`-family markup language.
//!
//! The parser transforms a UTF-8 source document into an abstract syntax
//! tree of block and inline elements. The AST is the handoff contract to
//! downstream renderers: every node is a tagged variant carrying its own
//! attribute map, and cross-references resolve through the document's
//! element-reference table.
//!
//! The grammar is a PEG (ordered choice with syntactic predicates) built
//! with the `peg` crate; a post-parse assembly pass nests sections, folds
//! flat list items into trees, wraps the preamble and collects element
//! references. Malformed markup never fails a parse — the grammar's last
//! resort at every level is literal text.
//!
//! # Quick Start
//!
//! ```rust
//! use adoc_parser::{Block, parse};
//!
//! let content = r#"= Document Title
//!
//! This is a paragraph.
//!
//! == Section Title
//!
//! This is a subsection."#;
//!
//! let document = parse(content).unwrap();
//! assert_eq!(document.attributes.get_str("doctitle"), Some("Document Title"));
//! assert!(document.elements.iter().any(|block| matches!(block, Block::Section(_))));
//! ```

use std::{borrow::Cow, path::Path};

use tracing::instrument;

mod error;
mod frontmatter;
pub(crate) mod grammar;
mod model;
#[cfg(test)]
mod proptests;

use grammar::ParserState;

pub use error::Error;
pub use model::{
    ATTR_ADMONITION_KIND, ATTR_ID, ATTR_IMAGE_ALT, ATTR_IMAGE_HEIGHT, ATTR_IMAGE_WIDTH,
    ATTR_LAYOUT, ATTR_LINK_TEXT, ATTR_LITERAL, ATTR_START, ATTR_TITLE, ATTR_VERSE,
    ATTR_VERSE_AUTHOR, ATTR_VERSE_TITLE, AdmonitionKind, AttributeName, AttributeSubstitution,
    AttributeValue, BlankLine, Block, BlockImage, BlockKind, BulletStyle, CrossReference,
    DelimitedBlock, Document, DocumentAttributeDeclaration, DocumentAttributeReset,
    DocumentAttributes, ElementAttributes, ElementReference, ElementReferences, EscapedQuotedText,
    ImageMacro, InlineImage, InlineNode, LabeledList, LabeledListItem, Link, ListLevel,
    LiteralBlock, NUMBERING_STYLES, NumberingStyle, OrderedList, OrderedListItem, Paragraph,
    Passthrough, PassthroughKind, Preamble, QuotedText, QuotedTextKind, Section, SectionLevel,
    SectionTitle, SingleLineComment, StringElement, TableOfContentsMacro, UnorderedList,
    UnorderedListItem,
};

/// Parse a whole document.
///
/// Any byte sequence yields a valid [`Document`]; the only inputs that fail
/// are documents whose front matter is not valid YAML.
///
/// # Example
///
/// ```
/// let document = adoc_parser::parse("just a paragraph").unwrap();
/// assert_eq!(document.elements.len(), 1);
/// ```
///
/// # Errors
/// Returns an error when the front matter is malformed YAML.
#[instrument(skip(input))]
pub fn parse(input: &str) -> Result<Document, Error> {
    let input = normalize_line_endings(input);
    let mut state = ParserState::new();
    let result = match grammar::document_parser::document(&input, &mut state) {
        Ok(document) => document,
        Err(error) => {
            tracing::error!(?error, "error parsing document content");
            Err(Error::Parse(error.to_string()))
        }
    };
    state.emit_warnings();
    result
}

/// Parse a single block; used by tests and by renderers that parse
/// fragments.
///
/// Input that does not form a recognizable block degrades to a paragraph of
/// literal text.
///
/// # Errors
/// Returns an error only when an internal invariant is violated during list
/// assembly.
#[instrument(skip(input))]
pub fn parse_block(input: &str) -> Result<Block, Error> {
    let input = normalize_line_endings(input);
    let mut state = ParserState::new();
    let result = match grammar::document_parser::document_block(&input, &mut state) {
        Ok(block) => block,
        Err(error) => {
            tracing::debug!(?error, "input is not a single block, falling back to a paragraph");
            Ok(fallback_paragraph(&mut state, &input))
        }
    };
    state.emit_warnings();
    result
}

/// Parse a single line of inline content.
///
/// # Example
///
/// ```
/// use adoc_parser::InlineNode;
///
/// let elements = adoc_parser::parse_inline("some *bold* text").unwrap();
/// assert_eq!(elements.len(), 3);
/// assert!(matches!(elements[1], InlineNode::QuotedText(_)));
/// ```
///
/// # Errors
/// The inline grammar is closed under literal text; errors are not expected
/// for any input.
#[instrument(skip(input))]
pub fn parse_inline(input: &str) -> Result<Vec<InlineNode>, Error> {
    let input = normalize_line_endings(input);
    let mut state = ParserState::new();
    match grammar::document_parser::inline_elements(&input, &mut state) {
        Ok(elements) => Ok(elements),
        Err(error) => {
            tracing::error!(?error, "error parsing inline content");
            Err(Error::Parse(error.to_string()))
        }
    }
}

/// Parse a raw section title (`== Title`) without its section body; used by
/// renderers.
///
/// # Errors
/// Returns an error when the input is not a section title line.
#[instrument(skip(input))]
pub fn parse_section_title(input: &str) -> Result<SectionTitle, Error> {
    let input = normalize_line_endings(input);
    let mut state = ParserState::new();
    match grammar::document_parser::raw_section_title(&input, &mut state) {
        Ok(title) => Ok(title),
        Err(error) => {
            tracing::error!(?error, "error parsing section title");
            Err(Error::Parse(error.to_string()))
        }
    }
}

/// Parse a document from a file.
///
/// # Errors
/// Returns an error when the file cannot be read or its front matter is
/// malformed YAML.
#[instrument(skip(file_path))]
pub fn parse_file<P: AsRef<Path>>(file_path: P) -> Result<Document, Error> {
    let input = std::fs::read_to_string(file_path)?;
    parse(&input)
}

/// Parse a document from a reader.
///
/// # Errors
/// Returns an error when reading fails or the front matter is malformed
/// YAML.
#[instrument(skip(reader))]
pub fn parse_from_reader<R: std::io::Read>(mut reader: R) -> Result<Document, Error> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse(&input)
}

fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Build a literal-text paragraph from input the block grammar rejected.
fn fallback_paragraph(state: &mut ParserState, input: &str) -> Block {
    let mut lines = Vec::new();
    for line in input.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match grammar::document_parser::inline_elements(line.trim_end(), state) {
            Ok(elements) => lines.push(elements),
            Err(_) => lines.push(vec![InlineNode::string(line.trim_end())]),
        }
    }
    if lines.is_empty() {
        return Block::BlankLine(BlankLine);
    }
    Block::Paragraph(Paragraph {
        attributes: ElementAttributes::default(),
        lines,
    })
}
