//! Element attribute maps shared by every block node.

use rustc_hash::FxHashMap;
use serde::{
    Deserialize, Serialize,
    de::Deserializer,
    ser::{SerializeMap, Serializer},
};

use super::{AdmonitionKind, BlockKind};

/// An `AttributeName` represents the name of an attribute in a document.
pub type AttributeName = String;

/// The key under which an element ID is stored.
pub const ATTR_ID: &str = "elementID";
/// The key under which an element title is stored.
pub const ATTR_TITLE: &str = "title";
/// The key under which an admonition masquerade is stored.
pub const ATTR_ADMONITION_KIND: &str = "admonitionKind";
/// Marker attribute flagging a block as a verse masquerade.
pub const ATTR_VERSE: &str = "verse";
/// The author of a verse block.
pub const ATTR_VERSE_AUTHOR: &str = "verseAuthor";
/// The title of a verse block.
pub const ATTR_VERSE_TITLE: &str = "verseTitle";
/// Marker attribute flagging a paragraph as a literal block.
pub const ATTR_LITERAL: &str = "literal";
/// Layout hint, e.g. `[horizontal]` on a labeled list.
pub const ATTR_LAYOUT: &str = "layout";
/// The implicit `text` attribute of a link.
pub const ATTR_LINK_TEXT: &str = "text";
/// The `alt` attribute of an image.
pub const ATTR_IMAGE_ALT: &str = "alt";
/// The `width` attribute of an image.
pub const ATTR_IMAGE_WIDTH: &str = "width";
/// The `height` attribute of an image.
pub const ATTR_IMAGE_HEIGHT: &str = "height";
/// The numbering offset of an ordered list, e.g. `[start=4]`.
pub const ATTR_START: &str = "start";

/// An `AttributeValue` represents the value of an attribute in a document.
///
/// Values are strings for the common case; admonition and block-kind
/// masquerades store their enums directly, and attribute groups may nest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Admonition(AdmonitionKind),
    Kind(BlockKind),
    Map(ElementAttributes),
    /// A bare key without a value, e.g. `[literal]`.
    None,
}

impl AttributeValue {
    /// The string content of this value, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::String(value) => write!(f, "{value}"),
            AttributeValue::Admonition(kind) => write!(f, "{kind}"),
            AttributeValue::Kind(kind) => write!(f, "{kind}"),
            AttributeValue::Map(_) => write!(f, "<nested attributes>"),
            AttributeValue::None => Ok(()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

/// The attribute map carried by every element.
///
/// Accumulated from the attribute lines above a block; later keys overwrite
/// earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementAttributes(FxHashMap<AttributeName, AttributeValue>);

impl ElementAttributes {
    /// Iterate over all attributes.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, &AttributeValue)> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Set an attribute, overwriting any existing value.
    pub fn set(&mut self, name: impl Into<AttributeName>, value: AttributeValue) {
        self.0.insert(name.into(), value);
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Get an attribute as a string slice, if present and a string.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(AttributeValue::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Remove an attribute by name.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }

    /// Merge another attribute map into this one. Keys from `other` win.
    pub fn merge(&mut self, other: ElementAttributes) {
        for (name, value) in other.0 {
            self.0.insert(name, value);
        }
    }
}

impl FromIterator<(AttributeName, AttributeValue)> for ElementAttributes {
    fn from_iter<I: IntoIterator<Item = (AttributeName, AttributeValue)>>(iter: I) -> Self {
        ElementAttributes(iter.into_iter().collect())
    }
}

impl Serialize for ElementAttributes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Sort keys so serialized output is deterministic.
        let mut sorted_keys: Vec<_> = self.0.keys().collect();
        sorted_keys.sort();

        let mut state = serializer.serialize_map(Some(self.0.len()))?;
        for key in sorted_keys {
            if let Some(value) = self.0.get(key) {
                state.serialize_entry(key, value)?;
            }
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for ElementAttributes {
    fn deserialize<D>(deserializer: D) -> Result<ElementAttributes, D::Error>
    where
        D: Deserializer<'de>,
    {
        FxHashMap::deserialize(deserializer).map(ElementAttributes)
    }
}

/// Document-level attributes, merged from front matter and the header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentAttributes(FxHashMap<AttributeName, AttributeValue>);

impl DocumentAttributes {
    /// Iterate over all attributes.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, &AttributeValue)> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set an attribute, overwriting any existing value.
    pub fn set(&mut self, name: impl Into<AttributeName>, value: AttributeValue) {
        self.0.insert(name.into(), value);
    }

    /// Set an attribute only if the value is a non-empty string.
    pub fn set_non_empty(&mut self, name: impl Into<AttributeName>, value: &str) {
        if !value.is_empty() {
            self.0.insert(name.into(), AttributeValue::from(value));
        }
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Get an attribute as a string slice, if present and a string.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(AttributeValue::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Remove an attribute by name.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }
}

impl Serialize for DocumentAttributes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut sorted_keys: Vec<_> = self.0.keys().collect();
        sorted_keys.sort();

        let mut state = serializer.serialize_map(Some(self.0.len()))?;
        for key in sorted_keys {
            if let Some(value) = self.0.get(key) {
                state.serialize_entry(key, value)?;
            }
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for DocumentAttributes {
    fn deserialize<D>(deserializer: D) -> Result<DocumentAttributes, D::Error>
    where
        D: Deserializer<'de>,
    {
        FxHashMap::deserialize(deserializer).map(DocumentAttributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_overwrites_existing_value() {
        let mut attributes = ElementAttributes::default();
        attributes.set("k", AttributeValue::from("v1"));
        attributes.set("k", AttributeValue::from("v2"));
        assert_eq!(attributes.get_str("k"), Some("v2"));
        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn merge_prefers_incoming_keys() {
        let mut base = ElementAttributes::default();
        base.set("a", AttributeValue::from("1"));
        base.set("b", AttributeValue::from("2"));

        let mut incoming = ElementAttributes::default();
        incoming.set("b", AttributeValue::from("3"));
        base.merge(incoming);

        assert_eq!(base.get_str("a"), Some("1"));
        assert_eq!(base.get_str("b"), Some("3"));
    }

    #[test]
    fn serializes_with_sorted_keys() {
        let mut attributes = ElementAttributes::default();
        attributes.set("zebra", AttributeValue::from("z"));
        attributes.set("alpha", AttributeValue::from("a"));
        let json = serde_json::to_string(&attributes).unwrap();
        assert_eq!(json, r#"{"alpha":"a","zebra":"z"}"#);
    }

    #[test]
    fn document_attributes_skip_empty_values() {
        let mut attributes = DocumentAttributes::default();
        attributes.set_non_empty("author", "John Doe");
        attributes.set_non_empty("email", "");
        assert_eq!(attributes.get_str("author"), Some("John Doe"));
        assert!(!attributes.contains_key("email"));
    }
}
