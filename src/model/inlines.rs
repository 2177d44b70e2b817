//! Inline node types: the contents of paragraph lines, titles and list items.

use serde::{Deserialize, Serialize};

use super::attributes::{ATTR_IMAGE_ALT, ATTR_IMAGE_HEIGHT, ATTR_IMAGE_WIDTH, ElementAttributes};

/// An `InlineNode` is a fragment of a single logical line of content.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InlineNode {
    StringElement(StringElement),
    QuotedText(QuotedText),
    EscapedQuotedText(EscapedQuotedText),
    Passthrough(Passthrough),
    CrossReference(CrossReference),
    Link(Link),
    InlineImage(InlineImage),
    AttributeSubstitution(AttributeSubstitution),
}

impl InlineNode {
    /// Build a plain string element.
    #[must_use]
    pub fn string(content: impl Into<String>) -> Self {
        InlineNode::StringElement(StringElement {
            content: content.into(),
        })
    }
}

/// A `StringElement` is a run of plain text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StringElement {
    pub content: String,
}

/// The kind of quoted text markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotedTextKind {
    Bold,
    Italic,
    Monospace,
}

/// A `QuotedText` is bold, italic or monospace content, possibly nested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotedText {
    pub kind: QuotedTextKind,
    pub elements: Vec<InlineNode>,
}

/// An `EscapedQuotedText` is quoted-text markup whose interpretation was
/// prevented by a leading backslash; its elements render verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EscapedQuotedText {
    pub elements: Vec<InlineNode>,
}

impl EscapedQuotedText {
    /// Build the literal rendition of escaped markup.
    ///
    /// One backslash per punctuation character is consumed by the escape;
    /// extra backslashes pass through verbatim. The punctuation is restored
    /// on both sides of the content.
    #[must_use]
    pub(crate) fn new(
        backslashes: &str,
        punctuation: &str,
        elements: Vec<InlineNode>,
    ) -> InlineNode {
        let kept = if backslashes.len() > punctuation.len() {
            &backslashes[punctuation.len()..]
        } else {
            ""
        };
        let mut all = Vec::with_capacity(elements.len() + 3);
        if !kept.is_empty() {
            all.push(InlineNode::string(kept));
        }
        all.push(InlineNode::string(punctuation));
        all.extend(elements);
        all.push(InlineNode::string(punctuation));
        InlineNode::EscapedQuotedText(EscapedQuotedText {
            elements: merge_inlines(all),
        })
    }
}

/// The kind of passthrough markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassthroughKind {
    SinglePlus,
    TriplePlus,
    Macro,
}

/// A `Passthrough` shields its content from further substitution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Passthrough {
    pub kind: PassthroughKind,
    pub elements: Vec<InlineNode>,
}

/// A `CrossReference` points at an element ID defined elsewhere in the
/// document; resolution happens at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossReference {
    pub id: String,
}

/// A `Link` is an absolute (`https://…`) or relative (`link:…[]`) link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub attributes: ElementAttributes,
}

impl Link {
    /// The display text of the link (empty when none was given).
    #[must_use]
    pub fn text(&self) -> &str {
        self.attributes.get_str(super::ATTR_LINK_TEXT).unwrap_or("")
    }
}

/// An `InlineImage` is an `image:…[…]` macro within a line of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InlineImage {
    pub r#macro: ImageMacro,
}

/// An `ImageMacro` holds the target path and attributes of an image macro,
/// shared between the inline and block forms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageMacro {
    pub path: String,
    pub attributes: ElementAttributes,
}

impl ImageMacro {
    /// Build an image macro; when no `alt` text was given, derive it from the
    /// filename stem.
    #[must_use]
    pub(crate) fn new(path: &str, mut attributes: ElementAttributes) -> Self {
        let alt_is_empty = attributes
            .get_str(ATTR_IMAGE_ALT)
            .map_or(true, str::is_empty);
        if alt_is_empty {
            let filename = path.rsplit('/').next().unwrap_or(path);
            let stem = match filename.rfind('.') {
                Some(0) | None => filename,
                Some(index) => &filename[..index],
            };
            attributes.set(ATTR_IMAGE_ALT, stem.into());
        }
        ImageMacro {
            path: path.to_string(),
            attributes,
        }
    }

    /// The `alt` text of the image.
    #[must_use]
    pub fn alt(&self) -> &str {
        self.attributes.get_str(ATTR_IMAGE_ALT).unwrap_or("")
    }

    /// The `width` of the image, when given.
    #[must_use]
    pub fn width(&self) -> &str {
        self.attributes.get_str(ATTR_IMAGE_WIDTH).unwrap_or("")
    }

    /// The `height` of the image, when given.
    #[must_use]
    pub fn height(&self) -> &str {
        self.attributes.get_str(ATTR_IMAGE_HEIGHT).unwrap_or("")
    }
}

/// A `{name}` reference to a document attribute, substituted at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeSubstitution {
    pub name: String,
}

/// Merge adjacent string elements into single runs of text.
///
/// The grammar emits characters and words piecemeal; downstream consumers
/// expect contiguous text as one `StringElement`.
#[must_use]
pub(crate) fn merge_inlines(elements: Vec<InlineNode>) -> Vec<InlineNode> {
    let mut merged: Vec<InlineNode> = Vec::with_capacity(elements.len());
    for element in elements {
        match (merged.last_mut(), element) {
            (
                Some(InlineNode::StringElement(previous)),
                InlineNode::StringElement(StringElement { content }),
            ) => {
                previous.content.push_str(&content);
            }
            (_, element) => merged.push(element),
        }
    }
    merged
}

/// Collect the plain text of a sequence of inline nodes, ignoring markup.
#[must_use]
pub(crate) fn plain_text(elements: &[InlineNode]) -> String {
    let mut text = String::new();
    collect_plain_text(elements, &mut text);
    text
}

fn collect_plain_text(elements: &[InlineNode], text: &mut String) {
    for element in elements {
        match element {
            InlineNode::StringElement(StringElement { content }) => text.push_str(content),
            InlineNode::QuotedText(QuotedText { elements, .. })
            | InlineNode::EscapedQuotedText(EscapedQuotedText { elements })
            | InlineNode::Passthrough(Passthrough { elements, .. }) => {
                collect_plain_text(elements, text);
            }
            InlineNode::CrossReference(CrossReference { id }) => text.push_str(id),
            InlineNode::Link(Link { url, .. }) => text.push_str(url),
            InlineNode::InlineImage(InlineImage { r#macro }) => text.push_str(&r#macro.path),
            InlineNode::AttributeSubstitution(AttributeSubstitution { name }) => {
                text.push_str(name);
            }
        }
    }
}
