//! The data models for parsed documents.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub(crate) mod attributes;
pub(crate) mod document;
pub(crate) mod inlines;
pub(crate) mod lists;

pub use attributes::*;
pub use document::*;
pub use inlines::*;
pub use lists::*;

/// The nesting level of a section. Level 0 is the document title and appears
/// at most once; body sections use levels 1 through 5.
pub type SectionLevel = u8;

/// A `Block` is a top-level structural unit of a document.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Preamble(Preamble),
    Section(Section),
    Paragraph(Paragraph),
    DelimitedBlock(DelimitedBlock),
    LiteralBlock(LiteralBlock),
    BlockImage(BlockImage),
    OrderedList(OrderedList),
    UnorderedList(UnorderedList),
    LabeledList(LabeledList),
    BlankLine(BlankLine),
    TableOfContentsMacro(TableOfContentsMacro),
    DocumentAttributeDeclaration(DocumentAttributeDeclaration),
    DocumentAttributeReset(DocumentAttributeReset),
    SingleLineComment(SingleLineComment),
}

/// The kind of admonition, from a `[NOTE]` masquerade or a `NOTE: ` prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmonitionKind {
    Tip,
    Note,
    Important,
    Warning,
    Caution,
}

impl AdmonitionKind {
    /// The source marker for this kind, e.g. `NOTE`.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            AdmonitionKind::Tip => "TIP",
            AdmonitionKind::Note => "NOTE",
            AdmonitionKind::Important => "IMPORTANT",
            AdmonitionKind::Warning => "WARNING",
            AdmonitionKind::Caution => "CAUTION",
        }
    }
}

impl FromStr for AdmonitionKind {
    type Err = ();

    fn from_str(marker: &str) -> Result<Self, Self::Err> {
        match marker {
            "TIP" => Ok(AdmonitionKind::Tip),
            "NOTE" => Ok(AdmonitionKind::Note),
            "IMPORTANT" => Ok(AdmonitionKind::Important),
            "WARNING" => Ok(AdmonitionKind::Warning),
            "CAUTION" => Ok(AdmonitionKind::Caution),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for AdmonitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdmonitionKind::Tip => write!(f, "tip"),
            AdmonitionKind::Note => write!(f, "note"),
            AdmonitionKind::Important => write!(f, "important"),
            AdmonitionKind::Warning => write!(f, "warning"),
            AdmonitionKind::Caution => write!(f, "caution"),
        }
    }
}

/// The kind of a delimited block, keyed by its delimiter line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Fenced,
    Listing,
    Example,
    Comment,
    Verse,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Fenced => write!(f, "fenced"),
            BlockKind::Listing => write!(f, "listing"),
            BlockKind::Example => write!(f, "example"),
            BlockKind::Comment => write!(f, "comment"),
            BlockKind::Verse => write!(f, "verse"),
        }
    }
}

/// A `Preamble` wraps the blocks preceding the first section of a document
/// that has at least one section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Preamble {
    pub elements: Vec<Block>,
}

/// A `Section` is a titled span of blocks; its content holds every block up
/// to the next section of the same or a shallower level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub level: SectionLevel,
    pub title: SectionTitle,
    pub elements: Vec<Block>,
}

/// A `SectionTitle` carries the title's inline content and its element ID
/// (explicit, or synthesized from the title text).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionTitle {
    pub attributes: ElementAttributes,
    pub content: Vec<InlineNode>,
}

impl SectionTitle {
    /// Build a section title. Without an explicit ID, one is synthesized by
    /// lowercasing the plain text and replacing runs of non-alphanumerics
    /// with `_`.
    #[must_use]
    pub(crate) fn new(content: Vec<InlineNode>, explicit_id: Option<String>) -> Self {
        let mut attributes = ElementAttributes::default();
        let id = explicit_id.unwrap_or_else(|| synthesize_id(&inlines::plain_text(&content)));
        attributes.set(ATTR_ID, id.into());
        SectionTitle {
            attributes,
            content,
        }
    }

    /// The element ID of this title.
    #[must_use]
    pub fn id(&self) -> &str {
        self.attributes.get_str(ATTR_ID).unwrap_or("")
    }
}

/// Lowercase the text and replace every run of non-alphanumeric characters
/// with a single `_`.
#[must_use]
pub(crate) fn synthesize_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    let mut gap = false;
    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            if gap && !id.is_empty() {
                id.push('_');
            }
            gap = false;
            id.extend(c.to_lowercase());
        } else {
            gap = true;
        }
    }
    id
}

/// A `Paragraph` is one or more contiguous non-blank lines of inline content.
///
/// `lines` is non-empty, with a single exception: the paragraph inside an
/// empty verse block keeps an empty line list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub attributes: ElementAttributes,
    pub lines: Vec<Vec<InlineNode>>,
}

/// A `DelimitedBlock` is bounded by matching delimiter lines; an unclosed
/// block terminates at end of input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DelimitedBlock {
    pub kind: BlockKind,
    pub attributes: ElementAttributes,
    pub elements: Vec<Block>,
}

/// A `LiteralBlock` preserves its content verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiteralBlock {
    pub content: String,
}

/// A `BlockImage` is a standalone `image::…[…]` macro line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockImage {
    pub r#macro: ImageMacro,
    pub attributes: ElementAttributes,
}

/// A `BlankLine` marks a block boundary; a run of blank lines in the source
/// collapses into a single marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankLine;

/// A `TableOfContentsMacro` marks where the table of contents is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContentsMacro;

/// A `:name: value` line declaring a document attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentAttributeDeclaration {
    pub name: AttributeName,
    pub value: String,
}

/// A `:name!:` line resetting a document attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentAttributeReset {
    pub name: AttributeName,
}

/// A `// text` line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SingleLineComment {
    pub content: String,
}
