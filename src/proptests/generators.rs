//! Input generators for the property tests.

use proptest::prelude::*;

/// Arbitrary text, including markup trigger characters and newlines.
pub(crate) fn any_document_string() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ -~\\n]{0,300}").expect("valid generator regex")
}

/// Documents built from plausible markup fragments, so structural rules
/// (sections, lists, delimited blocks) are actually exercised.
pub(crate) fn structured_document() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("== section one\n".to_string()),
        Just("=== nested section\n".to_string()),
        Just("a paragraph line\n".to_string()),
        Just("another *line* here\n".to_string()),
        Just("\n".to_string()),
        Just("* bullet item\n".to_string()),
        Just("** nested bullet\n".to_string()),
        Just(". numbered item\n".to_string()),
        Just(".. nested numbered\n".to_string()),
        Just("term:: description\n".to_string()),
        Just("[[anchor-id]]\n".to_string()),
        Just("[NOTE]\n".to_string()),
        Just("----\ncode\n----\n".to_string()),
        Just("....\nliteral\n....\n".to_string()),
        Just("____\nverse\n____\n".to_string()),
        Just("image::img.png[alt]\n".to_string()),
        Just("toc::[]\n".to_string()),
        Just(":attr: value\n".to_string()),
        Just("NOTE: watch out\n".to_string()),
        Just("see <<anchor-id>> here\n".to_string()),
    ];
    proptest::collection::vec(fragment, 0..24).prop_map(|fragments| fragments.concat())
}

/// Unicode-heavy inputs to stress UTF-8 handling in the grammar.
pub(crate) fn unicode_document() -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<char>(), 0..120)
        .prop_map(|chars| chars.into_iter().collect())
}
