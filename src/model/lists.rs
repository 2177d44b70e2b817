//! List node types and the flat-to-tree list assembler.
//!
//! The grammar emits list items as a flat sequence in source order. Nesting
//! is not expressed syntactically: it is inferred here from the numbering
//! style (ordered lists) or bullet style (unordered lists) of consecutive
//! items, by rewriting item levels in a pre-pass and folding buffered items
//! into their parent whenever the level decreases.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{
    Block,
    attributes::{ATTR_START, ElementAttributes},
};
use crate::Error;

/// The nesting level of a list item; levels start at 1.
pub type ListLevel = u8;

/// The marker family of an ordered list item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingStyle {
    Arabic,
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
    LowerGreek,
    UpperGreek,
    Unknown,
}

/// All concrete numbering styles, in the order their attribute overrides are
/// probed (`[loweralpha]` on the first item restyles its list).
pub const NUMBERING_STYLES: [NumberingStyle; 8] = [
    NumberingStyle::Arabic,
    NumberingStyle::Decimal,
    NumberingStyle::LowerAlpha,
    NumberingStyle::UpperAlpha,
    NumberingStyle::LowerRoman,
    NumberingStyle::UpperRoman,
    NumberingStyle::LowerGreek,
    NumberingStyle::UpperGreek,
];

impl NumberingStyle {
    /// The attribute key that selects this style, e.g. `[upperroman]`.
    #[must_use]
    pub fn as_attribute_name(self) -> &'static str {
        match self {
            NumberingStyle::Arabic => "arabic",
            NumberingStyle::Decimal => "decimal",
            NumberingStyle::LowerAlpha => "loweralpha",
            NumberingStyle::UpperAlpha => "upperalpha",
            NumberingStyle::LowerRoman => "lowerroman",
            NumberingStyle::UpperRoman => "upperroman",
            NumberingStyle::LowerGreek => "lowergreek",
            NumberingStyle::UpperGreek => "uppergreek",
            NumberingStyle::Unknown => "unknown",
        }
    }
}

/// The marker family of an unordered list item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletStyle {
    Dash,
    OneAsterisk,
    TwoAsterisks,
    ThreeAsterisks,
    FourAsterisks,
    FiveAsterisks,
    Unknown,
}

impl BulletStyle {
    /// The style of a bullet made of `count` asterisks.
    #[must_use]
    pub(crate) fn from_asterisks(count: usize) -> Self {
        match count {
            1 => BulletStyle::OneAsterisk,
            2 => BulletStyle::TwoAsterisks,
            3 => BulletStyle::ThreeAsterisks,
            4 => BulletStyle::FourAsterisks,
            5 => BulletStyle::FiveAsterisks,
            _ => BulletStyle::Unknown,
        }
    }

    /// The style a newly opened level takes, derived from the parent level's
    /// style via the cycle `-` → `*` → `**` → … → `*****` → `-`.
    #[must_use]
    pub(crate) fn next_level_style(self, previous: BulletStyle) -> BulletStyle {
        match previous {
            BulletStyle::Dash => BulletStyle::OneAsterisk,
            BulletStyle::OneAsterisk => BulletStyle::TwoAsterisks,
            BulletStyle::TwoAsterisks => BulletStyle::ThreeAsterisks,
            BulletStyle::ThreeAsterisks => BulletStyle::FourAsterisks,
            BulletStyle::FourAsterisks => BulletStyle::FiveAsterisks,
            BulletStyle::FiveAsterisks => BulletStyle::Dash,
            BulletStyle::Unknown => self,
        }
    }
}

/// An `OrderedList` holds sibling items of one level; nested lists live in
/// their parent item's elements.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderedList {
    pub attributes: ElementAttributes,
    pub items: Vec<OrderedListItem>,
}

/// An `UnorderedList` holds sibling items of one level.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnorderedList {
    pub attributes: ElementAttributes,
    pub items: Vec<UnorderedListItem>,
}

/// A `LabeledList` holds term/description items; labeled lists do not nest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledList {
    pub attributes: ElementAttributes,
    pub items: Vec<LabeledListItem>,
}

/// An `OrderedListItem` is one numbered item; its level and position are
/// rewritten during assembly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderedListItem {
    pub level: ListLevel,
    pub position: i32,
    pub numbering_style: NumberingStyle,
    pub attributes: ElementAttributes,
    pub elements: Vec<Block>,
}

impl OrderedListItem {
    /// Apply the item's own attributes: a numbering-style override such as
    /// `[upperroman]` and a `start=N` position offset.
    fn apply_attributes(&mut self) {
        let attributes = self.attributes.clone();
        apply_numbering_attributes(&attributes, self);
    }
}

/// A numbering-style override such as `[upperroman]` restyles the item; a
/// `start=N` attribute re-bases its position. A non-numeric `start` is logged
/// and ignored.
fn apply_numbering_attributes(attributes: &ElementAttributes, item: &mut OrderedListItem) {
    for style in NUMBERING_STYLES {
        if attributes.contains_key(style.as_attribute_name()) {
            item.numbering_style = style;
            break;
        }
    }
    if let Some(start) = attributes.get_str(ATTR_START) {
        match start.parse::<i32>() {
            Ok(position) => item.position = position,
            Err(error) => {
                tracing::warn!(%start, %error, "ignoring non-numeric 'start' attribute");
            }
        }
    }
}

/// An `UnorderedListItem` is one bulleted item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnorderedListItem {
    pub level: ListLevel,
    pub bullet_style: BulletStyle,
    pub elements: Vec<Block>,
}

/// A `LabeledListItem` is a term and its description blocks. A term with no
/// description is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledListItem {
    pub term: String,
    pub elements: Vec<Block>,
}

/// A flat list item as emitted by the grammar, before assembly.
#[derive(Clone, Debug, PartialEq)]
pub enum ListItem {
    Ordered(OrderedListItem),
    Unordered(UnorderedListItem),
    Labeled(LabeledListItem),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum ListItemKind {
    Ordered,
    Unordered,
    Labeled,
}

impl ListItem {
    fn kind(&self) -> ListItemKind {
        match self {
            ListItem::Ordered(_) => ListItemKind::Ordered,
            ListItem::Unordered(_) => ListItemKind::Unordered,
            ListItem::Labeled(_) => ListItemKind::Labeled,
        }
    }

    /// Attach an assembled sublist to this item.
    fn add_child(&mut self, child: Block) {
        match self {
            ListItem::Ordered(item) => item.elements.push(child),
            ListItem::Unordered(item) => item.elements.push(child),
            ListItem::Labeled(item) => item.elements.push(child),
        }
    }
}

/// Fold a flat, possibly kind-interleaved item sequence into a list tree.
///
/// Runs of a foreign kind are assembled into a sublist and attached to the
/// last item of the kind that preceded them; the root list has the kind of
/// the first item.
///
/// # Errors
///
/// Returns [`Error::InternalInvariant`] when the sequence is empty or the
/// buffered items disagree with their expected kind.
pub(crate) fn build_list(
    items: Vec<ListItem>,
    attributes: ElementAttributes,
) -> Result<Block, Error> {
    let root_kind = items
        .first()
        .map(ListItem::kind)
        .ok_or_else(|| Error::invariant("cannot build a list from an empty item sequence"))?;
    tracing::debug!(count = items.len(), "assembling list from flat items");

    let mut buffer: FxHashMap<ListItemKind, Vec<ListItem>> = FxHashMap::default();
    // Kinds in order of first appearance; earlier kinds are shallower.
    let mut stack: Vec<ListItemKind> = vec![root_kind];
    let mut previous_kind = root_kind;

    for item in items {
        let current_kind = item.kind();
        if !stack.contains(&current_kind) {
            stack.push(current_kind);
        }
        // Returning to a kind that already has buffered items closes the
        // run of the previous kind: assemble it into a sublist and hang it
        // off the last item of the current kind. A change to a brand-new
        // kind opens a deeper run instead and folds nothing.
        if current_kind != previous_kind && previous_kind != root_kind {
            let has_parent = buffer
                .get(&current_kind)
                .is_some_and(|items| !items.is_empty());
            if has_parent {
                let pending = buffer.remove(&previous_kind).unwrap_or_default();
                if !pending.is_empty() {
                    let sublist =
                        list_of_kind(previous_kind, pending, ElementAttributes::default())?;
                    let parent = buffer
                        .get_mut(&current_kind)
                        .and_then(|items| items.last_mut())
                        .ok_or_else(|| Error::invariant("list sublist has no parent item"))?;
                    parent.add_child(sublist);
                }
            }
        }
        previous_kind = current_kind;
        buffer.entry(current_kind).or_default().push(item);
    }

    // Attach whatever remains buffered, deepest kind first, each run under
    // the last item of the nearest shallower kind that still has items.
    for index in (1..stack.len()).rev() {
        let kind = stack[index];
        let pending = buffer.remove(&kind).unwrap_or_default();
        if pending.is_empty() {
            continue;
        }
        let sublist = list_of_kind(kind, pending, ElementAttributes::default())?;
        let parent_kind = stack[..index]
            .iter()
            .rev()
            .find(|kind| buffer.get(*kind).is_some_and(|items| !items.is_empty()))
            .copied()
            .ok_or_else(|| Error::invariant("list sublist has no parent item"))?;
        let parent = buffer
            .get_mut(&parent_kind)
            .and_then(|items| items.last_mut())
            .ok_or_else(|| Error::invariant("list sublist has no parent item"))?;
        parent.add_child(sublist);
    }

    let root_items = buffer.remove(&root_kind).unwrap_or_default();
    list_of_kind(root_kind, root_items, attributes)
}

fn list_of_kind(
    kind: ListItemKind,
    items: Vec<ListItem>,
    attributes: ElementAttributes,
) -> Result<Block, Error> {
    match kind {
        ListItemKind::Ordered => {
            let items = items
                .into_iter()
                .map(|item| match item {
                    ListItem::Ordered(item) => Ok(item),
                    other => Err(Error::invariant(format!(
                        "expected an ordered list item, got {other:?}"
                    ))),
                })
                .collect::<Result<Vec<_>, Error>>()?;
            Ok(Block::OrderedList(OrderedList::from_flat_items(
                items, attributes,
            )))
        }
        ListItemKind::Unordered => {
            let items = items
                .into_iter()
                .map(|item| match item {
                    ListItem::Unordered(item) => Ok(item),
                    other => Err(Error::invariant(format!(
                        "expected an unordered list item, got {other:?}"
                    ))),
                })
                .collect::<Result<Vec<_>, Error>>()?;
            Ok(Block::UnorderedList(UnorderedList::from_flat_items(
                items, attributes,
            )))
        }
        ListItemKind::Labeled => {
            let items = items
                .into_iter()
                .map(|item| match item {
                    ListItem::Labeled(item) => Ok(item),
                    other => Err(Error::invariant(format!(
                        "expected a labeled list item, got {other:?}"
                    ))),
                })
                .collect::<Result<Vec<_>, Error>>()?;
            Ok(Block::LabeledList(LabeledList { attributes, items }))
        }
    }
}

impl OrderedList {
    /// Assemble a flat run of ordered items into a nested list, rewriting
    /// levels from the numbering-style transitions.
    #[must_use]
    pub(crate) fn from_flat_items(
        items: Vec<OrderedListItem>,
        attributes: ElementAttributes,
    ) -> OrderedList {
        // buffers[level - 1] holds the pending items of that level
        let mut buffers: Vec<Vec<OrderedListItem>> = Vec::new();
        let mut level_per_style: FxHashMap<NumberingStyle, ListLevel> = FxHashMap::default();
        let mut previous_level: ListLevel = 0;
        let mut previous_style = NumberingStyle::Unknown;

        for mut item in items {
            if item.level > previous_level {
                item.level = previous_level + 1;
                level_per_style.insert(item.numbering_style, item.level);
            } else if item.numbering_style != previous_style {
                if let Some(level) = level_per_style.get(&item.numbering_style) {
                    item.level = *level;
                } else {
                    item.level = previous_level + 1;
                    level_per_style.insert(item.numbering_style, item.level);
                }
            } else {
                item.level = previous_level;
            }
            tracing::trace!(level = item.level, style = ?item.numbering_style, "placed ordered item");

            if item.level < previous_level {
                fold_ordered_levels(&mut buffers, previous_level, item.level);
            }
            if item.level as usize > buffers.len() {
                buffers.push(Vec::new());
            }
            previous_level = item.level;
            previous_style = item.numbering_style;
            buffers[usize::from(item.level) - 1].push(item);
        }

        // Flush the remaining levels bottom-up.
        for level in (2..=buffers.len()).rev() {
            let pending = std::mem::take(&mut buffers[level - 1]);
            if pending.is_empty() {
                continue;
            }
            let child = collapse_ordered(pending);
            if let Some(parent_index) = nearest_parent_index(&buffers, level - 1) {
                if let Some(parent) = buffers[parent_index].last_mut() {
                    parent.elements.push(Block::OrderedList(child));
                }
            }
        }

        let mut top_items = buffers.into_iter().next().unwrap_or_default();
        if let Some(first) = top_items.first_mut() {
            // List-level attributes bind to the first item: style override
            // and numbering offset.
            apply_numbering_attributes(&attributes, first);
            first.apply_attributes();
        }
        let base = top_items.first().map_or(1, |item| item.position);
        for (index, item) in top_items.iter_mut().enumerate() {
            item.position = base + i32::try_from(index).unwrap_or(i32::MAX);
        }

        OrderedList {
            attributes,
            items: top_items,
        }
    }
}

/// Merge buffered deeper levels into their parent items, from the previous
/// depth down to (but excluding) the new, shallower level.
fn fold_ordered_levels(
    buffers: &mut [Vec<OrderedListItem>],
    previous_level: ListLevel,
    new_level: ListLevel,
) {
    for level in ((new_level + 1)..=previous_level).rev() {
        let pending = std::mem::take(&mut buffers[usize::from(level) - 1]);
        if pending.is_empty() {
            continue;
        }
        let child = collapse_ordered(pending);
        if let Some(parent_index) = nearest_parent_index(buffers, usize::from(level) - 1) {
            if let Some(parent) = buffers[parent_index].last_mut() {
                parent.elements.push(Block::OrderedList(child));
            }
        }
    }
}

/// The index of the deepest non-empty buffer shallower than `below`. The
/// top-level buffer is filled before any deeper one, so items of skipped
/// levels still find a parent.
fn nearest_parent_index<T>(buffers: &[Vec<T>], below: usize) -> Option<usize> {
    (0..below).rev().find(|&index| !buffers[index].is_empty())
}

/// Build a sublist from sibling items: the first item's attributes set the
/// base position and style for the whole run.
fn collapse_ordered(mut items: Vec<OrderedListItem>) -> OrderedList {
    if let Some(first) = items.first_mut() {
        first.apply_attributes();
    }
    let base = items.first().map_or(1, |item| item.position);
    let style = items
        .first()
        .map_or(NumberingStyle::Unknown, |item| item.numbering_style);
    for (index, item) in items.iter_mut().enumerate() {
        item.position = base + i32::try_from(index).unwrap_or(i32::MAX);
        item.numbering_style = style;
    }
    OrderedList {
        attributes: ElementAttributes::default(),
        items,
    }
}

impl UnorderedList {
    /// Assemble a flat run of unordered items into a nested list, rewriting
    /// levels from the bullet-style transitions.
    #[must_use]
    pub(crate) fn from_flat_items(
        items: Vec<UnorderedListItem>,
        attributes: ElementAttributes,
    ) -> UnorderedList {
        let mut buffers: Vec<Vec<UnorderedListItem>> = Vec::new();
        let mut level_per_style: FxHashMap<BulletStyle, ListLevel> = FxHashMap::default();
        let mut previous_level: ListLevel = 0;
        let mut previous_style = BulletStyle::Unknown;

        for mut item in items {
            if item.level > previous_level {
                // A new level whose style was not preassigned takes the next
                // style in the bullet cycle.
                item.bullet_style = item.bullet_style.next_level_style(previous_style);
                item.level = previous_level + 1;
                level_per_style.insert(item.bullet_style, item.level);
            } else if item.bullet_style != previous_style {
                if let Some(level) = level_per_style.get(&item.bullet_style) {
                    item.level = *level;
                } else {
                    item.level = previous_level + 1;
                    level_per_style.insert(item.bullet_style, item.level);
                }
            } else {
                item.level = previous_level;
            }
            tracing::trace!(level = item.level, style = ?item.bullet_style, "placed unordered item");

            if item.level < previous_level {
                fold_unordered_levels(&mut buffers, previous_level, item.level);
            }
            if item.level as usize > buffers.len() {
                buffers.push(Vec::new());
            }
            previous_level = item.level;
            previous_style = item.bullet_style;
            buffers[usize::from(item.level) - 1].push(item);
        }

        for level in (2..=buffers.len()).rev() {
            let pending = std::mem::take(&mut buffers[level - 1]);
            if pending.is_empty() {
                continue;
            }
            let child = UnorderedList {
                attributes: ElementAttributes::default(),
                items: pending,
            };
            if let Some(parent_index) = nearest_parent_index(&buffers, level - 1) {
                if let Some(parent) = buffers[parent_index].last_mut() {
                    parent.elements.push(Block::UnorderedList(child));
                }
            }
        }

        let top_items = buffers.into_iter().next().unwrap_or_default();
        UnorderedList {
            attributes,
            items: top_items,
        }
    }
}

fn fold_unordered_levels(
    buffers: &mut [Vec<UnorderedListItem>],
    previous_level: ListLevel,
    new_level: ListLevel,
) {
    for level in ((new_level + 1)..=previous_level).rev() {
        let pending = std::mem::take(&mut buffers[usize::from(level) - 1]);
        if pending.is_empty() {
            continue;
        }
        let child = UnorderedList {
            attributes: ElementAttributes::default(),
            items: pending,
        };
        if let Some(parent_index) = nearest_parent_index(buffers, usize::from(level) - 1) {
            if let Some(parent) = buffers[parent_index].last_mut() {
                parent.elements.push(Block::UnorderedList(child));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, inlines::InlineNode};
    use pretty_assertions::assert_eq;

    fn text_paragraph(text: &str) -> Block {
        Block::Paragraph(Paragraph {
            attributes: ElementAttributes::default(),
            lines: vec![vec![InlineNode::string(text)]],
        })
    }

    fn ordered(level: ListLevel, style: NumberingStyle, text: &str) -> OrderedListItem {
        OrderedListItem {
            level,
            position: 1,
            numbering_style: style,
            attributes: ElementAttributes::default(),
            elements: vec![text_paragraph(text)],
        }
    }

    fn unordered(level: ListLevel, style: BulletStyle, text: &str) -> UnorderedListItem {
        UnorderedListItem {
            level,
            bullet_style: style,
            elements: vec![text_paragraph(text)],
        }
    }

    #[test]
    fn ordered_siblings_share_level_and_count_up() {
        let list = OrderedList::from_flat_items(
            vec![
                ordered(1, NumberingStyle::Arabic, "one"),
                ordered(1, NumberingStyle::Arabic, "two"),
                ordered(1, NumberingStyle::Arabic, "three"),
            ],
            ElementAttributes::default(),
        );
        assert_eq!(list.items.len(), 3);
        assert_eq!(
            list.items.iter().map(|item| item.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(list.items.iter().all(|item| item.level == 1));
    }

    #[test]
    fn ordered_style_change_opens_a_deeper_level() {
        let list = OrderedList::from_flat_items(
            vec![
                ordered(1, NumberingStyle::Arabic, "one"),
                ordered(2, NumberingStyle::LowerAlpha, "one-a"),
                ordered(2, NumberingStyle::LowerAlpha, "one-b"),
                ordered(1, NumberingStyle::Arabic, "two"),
            ],
            ElementAttributes::default(),
        );
        assert_eq!(list.items.len(), 2);
        let nested = &list.items[0].elements[1];
        let Block::OrderedList(nested) = nested else {
            panic!("expected a nested ordered list, got {nested:?}");
        };
        assert_eq!(nested.items.len(), 2);
        assert!(nested.items.iter().all(|item| item.level == 2));
        assert_eq!(nested.items[1].position, 2);
    }

    #[test]
    fn ordered_known_style_returns_to_its_level() {
        // arabic, then loweralpha (deeper), then arabic again: back to level 1
        let list = OrderedList::from_flat_items(
            vec![
                ordered(1, NumberingStyle::Arabic, "one"),
                ordered(1, NumberingStyle::LowerAlpha, "one-a"),
                ordered(1, NumberingStyle::Arabic, "two"),
            ],
            ElementAttributes::default(),
        );
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].elements.len(), 2);
    }

    #[test]
    fn ordered_start_attribute_shifts_positions() {
        let mut attributes = ElementAttributes::default();
        attributes.set(ATTR_START, "4".into());
        let list = OrderedList::from_flat_items(
            vec![
                ordered(1, NumberingStyle::Arabic, "four"),
                ordered(1, NumberingStyle::Arabic, "five"),
            ],
            attributes,
        );
        assert_eq!(
            list.items.iter().map(|item| item.position).collect::<Vec<_>>(),
            vec![4, 5]
        );
    }

    #[test]
    fn ordered_invalid_start_attribute_keeps_default() {
        let mut attributes = ElementAttributes::default();
        attributes.set(ATTR_START, "nope".into());
        let list = OrderedList::from_flat_items(
            vec![ordered(1, NumberingStyle::Arabic, "one")],
            attributes,
        );
        assert_eq!(list.items[0].position, 1);
    }

    #[test]
    fn unordered_bullet_change_nests_and_folds_back() {
        let list = UnorderedList::from_flat_items(
            vec![
                unordered(1, BulletStyle::OneAsterisk, "one"),
                unordered(2, BulletStyle::TwoAsterisks, "one-one"),
                unordered(3, BulletStyle::ThreeAsterisks, "one-one-one"),
                unordered(1, BulletStyle::OneAsterisk, "two"),
            ],
            ElementAttributes::default(),
        );
        assert_eq!(list.items.len(), 2);
        let Block::UnorderedList(second_level) = &list.items[0].elements[1] else {
            panic!("expected a nested unordered list");
        };
        assert_eq!(second_level.items.len(), 1);
        let Block::UnorderedList(third_level) = &second_level.items[0].elements[1] else {
            panic!("expected a doubly nested unordered list");
        };
        assert_eq!(third_level.items[0].level, 3);
    }

    #[test]
    fn unordered_new_level_derives_style_from_cycle() {
        // A dash item followed by a deeper item: the new level takes the next
        // style in the cycle (dash -> one asterisk).
        let list = UnorderedList::from_flat_items(
            vec![
                unordered(1, BulletStyle::Dash, "one"),
                unordered(2, BulletStyle::TwoAsterisks, "nested"),
            ],
            ElementAttributes::default(),
        );
        let Block::UnorderedList(nested) = &list.items[0].elements[1] else {
            panic!("expected a nested unordered list");
        };
        assert_eq!(nested.items[0].bullet_style, BulletStyle::OneAsterisk);
    }

    #[test]
    fn mixed_kinds_attach_foreign_runs_to_previous_item() {
        let items = vec![
            ListItem::Ordered(ordered(1, NumberingStyle::Arabic, "one")),
            ListItem::Unordered(unordered(1, BulletStyle::OneAsterisk, "bullet")),
            ListItem::Ordered(ordered(1, NumberingStyle::Arabic, "two")),
        ];
        let Block::OrderedList(list) = build_list(items, ElementAttributes::default()).unwrap()
        else {
            panic!("expected the root list to be ordered");
        };
        assert_eq!(list.items.len(), 2);
        let Block::UnorderedList(nested) = &list.items[0].elements[1] else {
            panic!("expected the bullet run nested under the first item");
        };
        assert_eq!(nested.items.len(), 1);
    }

    #[test]
    fn three_kinds_nest_progressively() {
        let items = vec![
            ListItem::Ordered(ordered(1, NumberingStyle::Arabic, "one")),
            ListItem::Unordered(unordered(1, BulletStyle::OneAsterisk, "two")),
            ListItem::Labeled(LabeledListItem {
                term: "term".to_string(),
                elements: vec![],
            }),
        ];
        let Block::OrderedList(list) = build_list(items, ElementAttributes::default()).unwrap()
        else {
            panic!("expected the root list to be ordered");
        };
        assert_eq!(list.items.len(), 1);
        let Block::UnorderedList(nested) = &list.items[0].elements[1] else {
            panic!("expected the bullet run under the ordered item");
        };
        let Block::LabeledList(deepest) = &nested.items[0].elements[1] else {
            panic!("expected the labeled run under the bullet item");
        };
        assert_eq!(deepest.items[0].term, "term");
    }

    #[test]
    fn empty_item_sequence_is_an_invariant_violation() {
        let error = build_list(Vec::new(), ElementAttributes::default()).unwrap_err();
        assert!(matches!(error, Error::InternalInvariant(_)));
    }

    #[test]
    fn sibling_levels_equal_and_children_deeper() {
        // Invariant: siblings share a level; nested lists are strictly deeper.
        let list = OrderedList::from_flat_items(
            vec![
                ordered(1, NumberingStyle::Arabic, "one"),
                ordered(5, NumberingStyle::LowerAlpha, "jumpy"),
                ordered(1, NumberingStyle::Arabic, "two"),
            ],
            ElementAttributes::default(),
        );
        for item in &list.items {
            assert_eq!(item.level, 1);
            for element in &item.elements {
                if let Block::OrderedList(nested) = element {
                    assert!(nested.items.iter().all(|nested| nested.level > item.level));
                }
            }
        }
    }
}
