//! Invariants that must hold for any input:
//!
//! - parsing terminates and yields a document (front matter aside)
//! - every element ID in the tree appears in the reference table
//! - descendant sections are strictly deeper than their ancestors
//! - list siblings share a level; nested lists are strictly deeper

use proptest::prelude::*;

use crate::{
    ATTR_ID, Block, Document, ElementAttributes, parse, parse_block, parse_inline,
    model::{ListLevel, SectionLevel},
};

use super::generators::{any_document_string, structured_document, unicode_document};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// The parser never panics, no matter how malformed the input.
    #[test]
    fn parser_never_panics(input in any_document_string()) {
        let _ = parse(&input);
    }

    /// Inputs without front matter always produce a document.
    #[test]
    fn parse_is_total_without_front_matter(input in structured_document()) {
        prop_assert!(parse(&input).is_ok());
    }

    #[test]
    fn block_parser_never_panics(input in any_document_string()) {
        let _ = parse_block(&input);
    }

    #[test]
    fn inline_parser_is_total(input in any_document_string()) {
        prop_assert!(parse_inline(&input).is_ok());
    }

    #[test]
    fn parser_handles_unicode(input in unicode_document()) {
        let _ = parse(&input);
    }

    /// Every element ID in any node's attributes is a key in the document's
    /// reference table.
    #[test]
    fn element_ids_are_all_registered(input in structured_document()) {
        if let Ok(document) = parse(&input) {
            verify_ids_registered(&document, &document.elements);
        }
    }

    /// Sections nest strictly: every descendant is deeper than its ancestor.
    #[test]
    fn section_levels_increase_downward(input in structured_document()) {
        if let Ok(document) = parse(&input) {
            verify_section_nesting(&document.elements, None);
        }
    }

    /// List siblings share a level; child lists are strictly deeper.
    #[test]
    fn list_levels_are_consistent(input in structured_document()) {
        if let Ok(document) = parse(&input) {
            verify_list_levels(&document.elements);
        }
    }
}

fn verify_ids_registered(document: &Document, elements: &[Block]) {
    for element in elements {
        match element {
            Block::Section(section) => {
                assert_id_registered(document, section.title.attributes.get_str(ATTR_ID));
                verify_ids_registered(document, &section.elements);
            }
            Block::Preamble(preamble) => verify_ids_registered(document, &preamble.elements),
            Block::DelimitedBlock(block) => {
                verify_ids_registered(document, &block.elements);
            }
            Block::Paragraph(paragraph) => {
                assert_attributes_registered(document, &paragraph.attributes);
            }
            Block::BlockImage(image) => {
                assert_attributes_registered(document, &image.attributes);
            }
            Block::OrderedList(list) => {
                assert_attributes_registered(document, &list.attributes);
                for item in &list.items {
                    verify_ids_registered(document, &item.elements);
                }
            }
            Block::UnorderedList(list) => {
                assert_attributes_registered(document, &list.attributes);
                for item in &list.items {
                    verify_ids_registered(document, &item.elements);
                }
            }
            Block::LabeledList(list) => {
                assert_attributes_registered(document, &list.attributes);
                for item in &list.items {
                    verify_ids_registered(document, &item.elements);
                }
            }
            _ => {}
        }
    }
}

fn assert_attributes_registered(document: &Document, attributes: &ElementAttributes) {
    assert_id_registered(document, attributes.get_str(ATTR_ID));
}

fn assert_id_registered(document: &Document, id: Option<&str>) {
    if let Some(id) = id {
        if !id.is_empty() {
            assert!(
                document.element_references.contains_key(id),
                "element ID {id:?} missing from the reference table"
            );
        }
    }
}

fn verify_section_nesting(elements: &[Block], parent_level: Option<SectionLevel>) {
    for element in elements {
        match element {
            Block::Section(section) => {
                if let Some(parent) = parent_level {
                    assert!(
                        section.level > parent,
                        "section level {} under parent level {parent}",
                        section.level
                    );
                }
                verify_section_nesting(&section.elements, Some(section.level));
            }
            Block::Preamble(preamble) => verify_section_nesting(&preamble.elements, parent_level),
            _ => {}
        }
    }
}

fn verify_list_levels(elements: &[Block]) {
    for element in elements {
        match element {
            Block::OrderedList(list) => {
                verify_sibling_levels(
                    list.items.iter().map(|item| item.level),
                    "ordered list",
                );
                for item in &list.items {
                    verify_child_lists_deeper(&item.elements, item.level);
                    verify_list_levels(&item.elements);
                }
            }
            Block::UnorderedList(list) => {
                verify_sibling_levels(
                    list.items.iter().map(|item| item.level),
                    "unordered list",
                );
                for item in &list.items {
                    verify_child_lists_deeper(&item.elements, item.level);
                    verify_list_levels(&item.elements);
                }
            }
            Block::Section(section) => verify_list_levels(&section.elements),
            Block::Preamble(preamble) => verify_list_levels(&preamble.elements),
            Block::DelimitedBlock(block) => verify_list_levels(&block.elements),
            _ => {}
        }
    }
}

fn verify_sibling_levels(levels: impl Iterator<Item = ListLevel>, context: &str) {
    let levels: Vec<_> = levels.collect();
    if let Some(first) = levels.first() {
        assert!(
            levels.iter().all(|level| level == first),
            "{context} siblings disagree on level: {levels:?}"
        );
        assert!(*first >= 1, "{context} item level below 1");
    }
}

fn verify_child_lists_deeper(elements: &[Block], item_level: ListLevel) {
    for element in elements {
        match element {
            Block::OrderedList(list) => {
                for child in &list.items {
                    assert!(
                        child.level > item_level,
                        "nested ordered item level {} not deeper than parent {item_level}",
                        child.level
                    );
                }
            }
            Block::UnorderedList(list) => {
                for child in &list.items {
                    assert!(
                        child.level > item_level,
                        "nested unordered item level {} not deeper than parent {item_level}",
                        child.level
                    );
                }
            }
            _ => {}
        }
    }
}
