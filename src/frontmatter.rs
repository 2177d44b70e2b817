//! YAML front matter ingestion.
//!
//! A document may start with a `---`-fenced YAML block. Its content is read
//! as a flat key/value map and merged into the document attributes; the YAML
//! is otherwise opaque to the parser.

use crate::{
    Error,
    model::{AttributeName, AttributeValue},
};

/// The parsed front matter of a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FrontMatter {
    pub(crate) content: Vec<(AttributeName, AttributeValue)>,
}

/// Parse the text between the `---` fences as a flat key to scalar map.
///
/// Scalars are kept as strings; null values become valueless attributes.
/// Nested sequences and mappings are not representable as document
/// attributes and are dropped with a warning.
///
/// # Errors
///
/// Returns [`Error::MalformedFrontMatter`] when the content is not valid
/// YAML; this is the one malformed-input case surfaced to the caller.
pub(crate) fn from_yaml(content: &str) -> Result<FrontMatter, Error> {
    if content.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    let raw: std::collections::BTreeMap<String, serde_yaml::Value> =
        serde_yaml::from_str(content)?;

    let mut attributes = Vec::with_capacity(raw.len());
    for (name, value) in raw {
        match value {
            serde_yaml::Value::String(value) => {
                attributes.push((name, AttributeValue::String(value)));
            }
            serde_yaml::Value::Number(value) => {
                attributes.push((name, AttributeValue::String(value.to_string())));
            }
            serde_yaml::Value::Bool(value) => {
                attributes.push((name, AttributeValue::String(value.to_string())));
            }
            serde_yaml::Value::Null => {
                attributes.push((name, AttributeValue::None));
            }
            serde_yaml::Value::Sequence(_)
            | serde_yaml::Value::Mapping(_)
            | serde_yaml::Value::Tagged(_) => {
                tracing::warn!(%name, "dropping non-scalar front matter value");
            }
        }
    }
    Ok(FrontMatter {
        content: attributes,
    })
}
