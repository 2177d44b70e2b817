//! The document root and the post-parse assembly pass.
//!
//! The grammar emits a flat block list; this module reshapes it: front
//! matter and header attributes are merged into the document attribute map,
//! leading non-section blocks are wrapped into a preamble, the table of
//! contents is inserted per the `toc` attribute, and element IDs are
//! collected into the cross-reference lookup table.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{
    ATTR_ID, AttributeValue, Block, DocumentAttributes, Preamble, Section, SectionTitle,
    TableOfContentsMacro,
};
use crate::frontmatter::FrontMatter;

/// Maps every element ID defined in the document to the node that defined
/// it. Renderers resolve cross-references through this table.
pub type ElementReferences = FxHashMap<String, ElementReference>;

/// The node an element ID points at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementReference {
    SectionTitle(SectionTitle),
    Block(Box<Block>),
}

/// A `Document` is the root of the parsed tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub attributes: DocumentAttributes,
    pub element_references: ElementReferences,
    pub elements: Vec<Block>,
}

impl Document {
    /// Assemble the document from the flat parse output.
    #[must_use]
    pub(crate) fn new(
        front_matter: Option<FrontMatter>,
        header: Option<DocumentHeader>,
        blocks: Vec<Block>,
    ) -> Document {
        tracing::debug!(count = blocks.len(), "assembling document");
        let mut attributes = DocumentAttributes::default();
        if let Some(front_matter) = front_matter {
            for (name, value) in front_matter.content {
                attributes.set(name, value);
            }
        }
        if let Some(header) = header {
            for (name, value) in header.content {
                attributes.set(name, value);
            }
        }

        let mut elements = insert_preamble(blocks);
        if let Some(toc) = attributes.get("toc").cloned() {
            insert_table_of_contents(&mut elements, &toc);
        }

        let mut element_references = ElementReferences::default();
        collect_element_references(&elements, &mut element_references);

        Document {
            attributes,
            element_references,
            elements,
        }
    }
}

/// Wrap the blocks preceding the first section into a preamble. Documents
/// without sections, or with nothing before the first section, are left
/// unchanged.
fn insert_preamble(blocks: Vec<Block>) -> Vec<Block> {
    let first_section = blocks
        .iter()
        .position(|block| matches!(block, Block::Section(_)));
    match first_section {
        None | Some(0) => blocks,
        Some(index) => {
            tracing::debug!(count = index, "wrapping leading blocks into a preamble");
            let mut blocks = blocks;
            let rest = blocks.split_off(index);
            let mut elements = vec![Block::Preamble(Preamble { elements: blocks })];
            elements.extend(rest);
            elements
        }
    }
}

/// Insert the table-of-contents macro at the position selected by the `toc`
/// attribute.
fn insert_table_of_contents(elements: &mut Vec<Block>, toc: &AttributeValue) {
    let placement = match toc {
        AttributeValue::String(value) => value.as_str(),
        AttributeValue::None => "",
        other => {
            tracing::warn!(%other, "invalid value for 'toc' attribute");
            return;
        }
    };
    match placement {
        "" | "auto" => {
            elements.insert(0, Block::TableOfContentsMacro(TableOfContentsMacro));
        }
        "preamble" => {
            if let Some(index) = elements
                .iter()
                .position(|block| matches!(block, Block::Preamble(_)))
            {
                elements.insert(index + 1, Block::TableOfContentsMacro(TableOfContentsMacro));
            } else {
                tracing::warn!("'toc=preamble' requested but the document has no preamble");
            }
        }
        // The toc::[] macro in the body marks the position itself.
        "macro" => {}
        other => {
            tracing::warn!(value = %other, "invalid value for 'toc' attribute");
        }
    }
}

/// Record every element ID in the tree. The first definition wins; later
/// duplicates are logged and left out.
fn collect_element_references(elements: &[Block], references: &mut ElementReferences) {
    for element in elements {
        match element {
            Block::Section(Section {
                title, elements, ..
            }) => {
                let id = title.id();
                if !id.is_empty() {
                    record_reference(
                        references,
                        id.to_string(),
                        ElementReference::SectionTitle(title.clone()),
                    );
                }
                collect_element_references(elements, references);
            }
            Block::Preamble(Preamble { elements })
            | Block::DelimitedBlock(super::DelimitedBlock { elements, .. }) => {
                collect_element_references(elements, references);
            }
            Block::OrderedList(list) => {
                record_block_id(element, &list.attributes, references);
                for item in &list.items {
                    collect_element_references(&item.elements, references);
                }
            }
            Block::UnorderedList(list) => {
                record_block_id(element, &list.attributes, references);
                for item in &list.items {
                    collect_element_references(&item.elements, references);
                }
            }
            Block::LabeledList(list) => {
                record_block_id(element, &list.attributes, references);
                for item in &list.items {
                    collect_element_references(&item.elements, references);
                }
            }
            Block::Paragraph(paragraph) => {
                record_block_id(element, &paragraph.attributes, references);
            }
            Block::BlockImage(image) => {
                record_block_id(element, &image.attributes, references);
            }
            _ => {}
        }
    }
}

fn record_block_id(
    block: &Block,
    attributes: &super::ElementAttributes,
    references: &mut ElementReferences,
) {
    if let Some(id) = attributes.get_str(ATTR_ID) {
        record_reference(
            references,
            id.to_string(),
            ElementReference::Block(Box::new(block.clone())),
        );
    }
}

fn record_reference(references: &mut ElementReferences, id: String, reference: ElementReference) {
    if references.contains_key(&id) {
        tracing::warn!(%id, "duplicate element ID, keeping the first definition");
        return;
    }
    references.insert(id, reference);
}

/// The parsed document header: title, authors and revision, flattened into
/// document attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct DocumentHeader {
    pub(crate) content: Vec<(String, AttributeValue)>,
}

impl DocumentHeader {
    /// Flatten the header parts into attribute entries: `doctitle`, author
    /// fields (with `_N` suffixes for authors 2..N) and revision fields.
    pub(crate) fn new(
        title: &str,
        authors: Vec<Author>,
        revision: Option<Revision>,
        attribute_entries: Vec<(String, Option<String>)>,
    ) -> DocumentHeader {
        let mut content: Vec<(String, AttributeValue)> = Vec::new();
        content.push(("doctitle".to_string(), title.trim().into()));
        for (index, author) in authors.iter().enumerate() {
            let suffix = if index == 0 {
                String::new()
            } else {
                format!("_{}", index + 1)
            };
            let mut push = |key: &str, value: &str| {
                if !value.is_empty() {
                    content.push((format!("{key}{suffix}"), value.into()));
                }
            };
            push("firstname", &author.first_name);
            push("middlename", &author.middle_name);
            push("lastname", &author.last_name);
            push("author", &author.full_name);
            push("authorinitials", &author.initials);
            push("email", &author.email);
        }
        if let Some(revision) = revision {
            let mut push = |key: &str, value: &str| {
                if !value.is_empty() {
                    content.push((key.to_string(), value.into()));
                }
            };
            push("revnumber", &revision.number);
            push("revdate", &revision.date);
            push("revremark", &revision.remark);
        }
        for (name, value) in attribute_entries {
            match value {
                Some(value) => content.push((name, value.into())),
                // A reset in the header removes any earlier declaration.
                None => content.retain(|(key, _)| key != &name),
            }
        }
        DocumentHeader { content }
    }
}

/// One author from the header's author line.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Author {
    pub(crate) full_name: String,
    pub(crate) initials: String,
    pub(crate) first_name: String,
    pub(crate) middle_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
}

impl Author {
    /// Build an author from up to three name parts and an optional email.
    /// Underscores in name parts read as spaces.
    pub(crate) fn new(
        part1: &str,
        part2: Option<&str>,
        part3: Option<&str>,
        email: Option<&str>,
    ) -> Author {
        let clean = |part: &str| part.trim().replace('_', " ");
        let first = clean(part1);
        let (middle, last) = match (part2, part3) {
            (Some(middle), Some(last)) => (clean(middle), clean(last)),
            (Some(last), None) => (String::new(), clean(last)),
            _ => (String::new(), String::new()),
        };

        let mut full_name = first.clone();
        for part in [&middle, &last] {
            if !part.is_empty() {
                full_name.push(' ');
                full_name.push_str(part);
            }
        }
        let initials = [&first, &middle, &last]
            .iter()
            .filter_map(|part| part.chars().next())
            .collect::<String>();

        Author {
            full_name,
            initials,
            first_name: first,
            middle_name: middle,
            last_name: last,
            email: email.map(str::trim).unwrap_or_default().to_string(),
        }
    }
}

/// The revision line of the header.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Revision {
    pub(crate) number: String,
    pub(crate) date: String,
    pub(crate) remark: String,
}

impl Revision {
    /// Build a revision, stripping the `v` prefix from the number and
    /// trimming all parts.
    pub(crate) fn new(number: &str, date: Option<&str>, remark: Option<&str>) -> Revision {
        let number = number
            .trim()
            .trim_start_matches(['v', 'V'])
            .trim()
            .to_string();
        Revision {
            number,
            date: date.map(str::trim).unwrap_or_default().to_string(),
            remark: remark.map(str::trim).unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementAttributes, InlineNode, Paragraph};
    use pretty_assertions::assert_eq;

    fn paragraph(text: &str) -> Block {
        Block::Paragraph(Paragraph {
            attributes: ElementAttributes::default(),
            lines: vec![vec![InlineNode::string(text)]],
        })
    }

    fn section(level: u8, title: &str) -> Block {
        Block::Section(Section {
            level,
            title: SectionTitle::new(vec![InlineNode::string(title)], None),
            elements: vec![],
        })
    }

    #[test]
    fn preamble_wraps_leading_blocks() {
        let document = Document::new(
            None,
            None,
            vec![paragraph("intro"), section(1, "first")],
        );
        assert_eq!(document.elements.len(), 2);
        let Block::Preamble(preamble) = &document.elements[0] else {
            panic!("expected a preamble, got {:?}", document.elements[0]);
        };
        assert_eq!(preamble.elements, vec![paragraph("intro")]);
    }

    #[test]
    fn no_preamble_without_sections() {
        let document = Document::new(None, None, vec![paragraph("only"), paragraph("text")]);
        assert!(document
            .elements
            .iter()
            .all(|block| !matches!(block, Block::Preamble(_))));
    }

    #[test]
    fn no_preamble_when_document_starts_with_a_section() {
        let document = Document::new(None, None, vec![section(1, "first"), section(1, "second")]);
        assert!(matches!(document.elements[0], Block::Section(_)));
    }

    #[test]
    fn toc_auto_inserts_at_front() {
        let header = DocumentHeader {
            content: vec![("toc".to_string(), "".into())],
        };
        let document = Document::new(None, Some(header), vec![paragraph("p"), section(1, "s")]);
        assert!(matches!(
            document.elements[0],
            Block::TableOfContentsMacro(_)
        ));
    }

    #[test]
    fn toc_preamble_inserts_after_preamble() {
        let header = DocumentHeader {
            content: vec![("toc".to_string(), "preamble".into())],
        };
        let document = Document::new(None, Some(header), vec![paragraph("p"), section(1, "s")]);
        assert!(matches!(document.elements[0], Block::Preamble(_)));
        assert!(matches!(
            document.elements[1],
            Block::TableOfContentsMacro(_)
        ));
    }

    #[test]
    #[tracing_test::traced_test]
    fn toc_preamble_without_preamble_warns_and_skips() {
        let header = DocumentHeader {
            content: vec![("toc".to_string(), "preamble".into())],
        };
        let document = Document::new(None, Some(header), vec![paragraph("p")]);
        assert!(!document
            .elements
            .iter()
            .any(|block| matches!(block, Block::TableOfContentsMacro(_))));
        assert!(logs_contain("no preamble"));
    }

    #[test]
    fn toc_macro_value_inserts_nothing() {
        let header = DocumentHeader {
            content: vec![("toc".to_string(), "macro".into())],
        };
        let document = Document::new(None, Some(header), vec![paragraph("p"), section(1, "s")]);
        assert!(!document
            .elements
            .iter()
            .any(|block| matches!(block, Block::TableOfContentsMacro(_))));
    }

    #[test]
    fn element_references_collect_section_titles() {
        let document = Document::new(None, None, vec![section(1, "a title")]);
        let reference = document.element_references.get("a_title").unwrap();
        assert!(matches!(reference, ElementReference::SectionTitle(_)));
    }

    #[test]
    fn element_references_collect_block_ids() {
        let mut attributes = ElementAttributes::default();
        attributes.set(ATTR_ID, "img-foo".into());
        let block = Block::Paragraph(Paragraph {
            attributes,
            lines: vec![vec![InlineNode::string("x")]],
        });
        let document = Document::new(None, None, vec![block]);
        assert!(document.element_references.contains_key("img-foo"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn duplicate_element_ids_keep_first_definition() {
        let document = Document::new(
            None,
            None,
            vec![section(1, "same title"), section(1, "same title")],
        );
        assert_eq!(document.element_references.len(), 1);
        assert!(logs_contain("duplicate element ID"));
    }

    #[test]
    fn header_flattens_authors_with_suffixes() {
        let header = DocumentHeader::new(
            "The Title",
            vec![
                Author::new("John", Some("Foo"), Some("Doe"), Some("jdoe@example.com")),
                Author::new("Jane", Some("Doe"), None, None),
            ],
            Some(Revision::new("v1.0", Some("2020-01-01"), Some("first cut"))),
            vec![],
        );
        let lookup = |key: &str| {
            header
                .content
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.to_string())
        };
        assert_eq!(lookup("doctitle").as_deref(), Some("The Title"));
        assert_eq!(lookup("author").as_deref(), Some("John Foo Doe"));
        assert_eq!(lookup("authorinitials").as_deref(), Some("JFD"));
        assert_eq!(lookup("email").as_deref(), Some("jdoe@example.com"));
        assert_eq!(lookup("author_2").as_deref(), Some("Jane Doe"));
        assert_eq!(lookup("lastname_2").as_deref(), Some("Doe"));
        assert_eq!(lookup("revnumber").as_deref(), Some("1.0"));
        assert_eq!(lookup("revdate").as_deref(), Some("2020-01-01"));
        assert_eq!(lookup("revremark").as_deref(), Some("first cut"));
    }

    #[test]
    fn author_underscores_read_as_spaces() {
        let author = Author::new("Mary_Jane", Some("Watson"), None, None);
        assert_eq!(author.first_name, "Mary Jane");
        assert_eq!(author.last_name, "Watson");
        assert_eq!(author.full_name, "Mary Jane Watson");
        assert_eq!(author.initials, "MW");
    }
}
