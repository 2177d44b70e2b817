//! The grammar: a PEG over the source text.
//!
//! One `peg::parser!` block holds every rule, from the document entry point
//! down to the lexical primitives. Rules construct model values directly;
//! ordered choice provides the error recovery — the last alternative at
//! every level consumes input as literal text, so malformed markup degrades
//! to paragraphs instead of failing the parse.

use crate::{
    Error,
    frontmatter::{self, FrontMatter},
    grammar::ParserState,
    model::{
        ATTR_ADMONITION_KIND, ATTR_ID, ATTR_IMAGE_ALT, ATTR_IMAGE_HEIGHT, ATTR_IMAGE_WIDTH,
        ATTR_LAYOUT, ATTR_LINK_TEXT, ATTR_LITERAL, ATTR_TITLE, ATTR_VERSE, ATTR_VERSE_AUTHOR,
        ATTR_VERSE_TITLE, AdmonitionKind, AttributeSubstitution, AttributeValue, BlankLine, Block,
        BlockImage, BlockKind, BulletStyle, CrossReference, DelimitedBlock, Document,
        DocumentAttributeDeclaration, DocumentAttributeReset, ElementAttributes, EscapedQuotedText,
        ImageMacro, InlineImage, InlineNode, LabeledListItem, Link, ListLevel, LiteralBlock,
        NumberingStyle, OrderedListItem, Paragraph, Passthrough, PassthroughKind, QuotedText,
        QuotedTextKind, Section, SectionLevel, SectionTitle, SingleLineComment,
        TableOfContentsMacro, UnorderedListItem,
        document::{Author, DocumentHeader, Revision},
        inlines::merge_inlines,
        lists::{ListItem, build_list},
    },
};

/// A document attribute line: `:name: value` or a `:name!:` reset.
#[derive(Debug)]
struct AttributeEntry {
    name: String,
    /// `None` marks a reset.
    value: Option<String>,
}

/// A macro attribute: positional (`None` key) or named (`k=v`).
type MacroAttribute = (Option<String>, String);

peg::parser! {
    pub(crate) grammar document_parser(state: &mut ParserState) for str {

        // -------------------------------------------------------------
        // Entry points
        // -------------------------------------------------------------

        pub(crate) rule document() -> Result<Document, Error>
        = empty_line()*
          front_matter:front_matter()?
          empty_line()*
          header:header()?
          blocks:blocks(None)
          ![_]
        {
            let front_matter = front_matter.transpose()?;
            Ok(Document::new(front_matter, header, blocks?))
        }

        pub(crate) rule document_block() -> Result<Block, Error>
        = empty_line()* block:block(None) empty_line()* { block }

        pub(crate) rule inline_elements() -> Vec<InlineNode>
        = elements:inline_element()* { merge_inlines(elements) }

        pub(crate) rule raw_section_title() -> SectionTitle
        = "="*<1,6> !"=" whitespace()+ title:section_title_text()
        {
            let (content, inline_id) = title;
            SectionTitle::new(content, inline_id)
        }

        // Block parsing inside example and verse content: paragraphs, lists
        // and blank lines only. Attribute lines and nested delimited blocks
        // are not recognized here and stay literal text.
        pub(crate) rule restricted_blocks() -> Result<Vec<Block>, Error>
        = blocks:restricted_block()* { blocks.into_iter().collect() }

        rule restricted_block() -> Result<Block, Error>
        = blank_line()
        / list(&ElementAttributes::default())
        / admonition_paragraph(&ElementAttributes::default())
        / restricted_paragraph()

        rule restricted_paragraph() -> Result<Block, Error>
        = lines:restricted_paragraph_line()+
        {
            let mut parsed = Vec::with_capacity(lines.len());
            for line in &lines {
                parsed.push(parse_inline_line(state, line));
            }
            Ok(Block::Paragraph(Paragraph {
                attributes: ElementAttributes::default(),
                lines: parsed,
            }))
        }

        rule restricted_paragraph_line() -> &'input str
        = line:$(whitespace()* [^' ' | '\t' | '\n'] [^'\n']*) (eol() / ![_]) { line.trim_end() }

        // -------------------------------------------------------------
        // Front matter and document header
        // -------------------------------------------------------------

        rule front_matter() -> Result<FrontMatter, Error>
        = "---" whitespace()* eol()
          content:$(front_matter_line()*)
          "---" whitespace()* (eol() / ![_])
        { frontmatter::from_yaml(content) }

        rule front_matter_line()
        = !("---" whitespace()* (eol() / ![_])) [^'\n']* eol()

        rule header() -> DocumentHeader
        = entries_before:document_attribute_entry()*
          "=" !"=" whitespace()+ title:$([^'\n']+) (eol() / ![_])
          authors_revision:(authors:authors_line() revision:revision_line()? { (authors, revision) })?
          entries_after:document_attribute_entry()*
        {
            let (authors, revision) =
                authors_revision.map_or((Vec::new(), None), |(authors, revision)| (authors, revision));
            tracing::debug!(title, authors = authors.len(), "parsed document header");
            let entries = entries_before
                .into_iter()
                .chain(entries_after)
                .map(|entry| (entry.name, entry.value))
                .collect();
            DocumentHeader::new(title, authors, revision, entries)
        }

        rule document_attribute_entry() -> AttributeEntry
        = entry:document_attribute_match() eol() { entry }

        rule authors_line() -> Vec<Author>
        = !(whitespace()* eol()) !":" authors:(author() ++ (";" whitespace()*)) (eol() / ![_])
        { authors }

        rule author() -> Author
        = whitespace()*
          part1:author_name_part()
          part2:(whitespace()+ part:author_name_part() { part })?
          part3:(whitespace()+ part:author_name_part() { part })?
          email:(whitespace()* "<" email:$([^'>' | '\n']+) ">" { email })?
          whitespace()*
        { Author::new(part1, part2, part3, email) }

        rule author_name_part() -> &'input str
        = $(['a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' | '\'']+)

        rule revision_line() -> Revision
        = number:$(("v" / "V")? ['0'..='9'] [^',' | ':' | '\n']*)
          date:("," whitespace()* date:$([^':' | '\n']+) { date })?
          remark:(":" whitespace()* remark:$([^'\n']+) { remark })?
          (eol() / ![_])
        { Revision::new(number, date, remark) }

        // -------------------------------------------------------------
        // Blocks
        // -------------------------------------------------------------

        pub(crate) rule blocks(parent_section_level: Option<SectionLevel>) -> Result<Vec<Block>, Error>
        = blocks:block(parent_section_level)* { blocks.into_iter().collect() }

        rule block(parent_section_level: Option<SectionLevel>) -> Result<Block, Error>
        = !at_same_or_shallower_section(parent_section_level)
          block:(
              blank_line()
              / document_attribute_block()
              / comment_line_block()
              / section(parent_section_level)
              / block_generic()
          )
        { block }

        // Lookahead: a section at the same or a shallower level than the
        // enclosing one ends the enclosing section's content. Metadata lines
        // are skipped so `[[anchor]]` above a sibling section is not eaten
        // as content.
        rule at_same_or_shallower_section(parent_section_level: Option<SectionLevel>)
        = element_attribute_line()* equals:$("="*<2,6>) !"=" whitespace()+ [^' ' | '\t' | '\n']
        {?
            let level = section_level_of(equals);
            match parent_section_level {
                Some(parent) if level <= parent => Ok(()),
                _ => Err("not a terminating section"),
            }
        }

        rule blank_line() -> Result<Block, Error>
        = (empty_line() / whitespace()+ ![_])+
        { Ok(Block::BlankLine(BlankLine)) }

        /// Line comments begin with `//` (but not `////`, the comment block
        /// delimiter).
        rule comment_line_block() -> Result<Block, Error>
        = "//" !"/" content:$([^'\n']*) (eol() / ![_])
        {
            Ok(Block::SingleLineComment(SingleLineComment {
                content: content.to_string(),
            }))
        }

        rule document_attribute_block() -> Result<Block, Error>
        = entry:document_attribute_match() (eol() / ![_])
        {
            Ok(match entry.value {
                Some(value) => Block::DocumentAttributeDeclaration(DocumentAttributeDeclaration {
                    name: entry.name,
                    value,
                }),
                None => Block::DocumentAttributeReset(DocumentAttributeReset { name: entry.name }),
            })
        }

        rule document_attribute_match() -> AttributeEntry
        = ":!" name:attribute_name() ":"
          { AttributeEntry { name: name.to_string(), value: None } }
        / ":" name:attribute_name() "!:"
          { AttributeEntry { name: name.to_string(), value: None } }
        / ":" name:attribute_name() ":" value:(whitespace()+ value:$([^'\n']*) { value })? whitespace()*
          {
              AttributeEntry {
                  name: name.to_string(),
                  value: Some(value.unwrap_or("").trim().to_string()),
              }
          }

        // -------------------------------------------------------------
        // Sections
        // -------------------------------------------------------------

        rule section(parent_section_level: Option<SectionLevel>) -> Result<Block, Error>
        = metadata:block_metadata()
          level:section_level(parent_section_level)
          whitespace()+
          title:section_title_text()
          elements:blocks(Some(level))
        {
            let (content, inline_id) = title;
            let explicit_id = metadata
                .get_str(ATTR_ID)
                .map(ToString::to_string)
                .or(inline_id);
            let title = SectionTitle::new(content, explicit_id);
            tracing::debug!(level, id = title.id(), "parsed section");
            Ok(Block::Section(Section {
                level,
                title,
                elements: elements?,
            }))
        }

        rule section_level(parent_section_level: Option<SectionLevel>) -> SectionLevel
        = equals:$("="*<2,6>) !"="
        {?
            let level = section_level_of(equals);
            match parent_section_level {
                Some(parent) if level <= parent => Err("sibling or parent section"),
                _ => Ok(level),
            }
        }

        rule section_title_text() -> (Vec<InlineNode>, Option<String>)
        = raw:$([^'\n']+) (eol() / ![_])
        {
            let raw = raw.trim_end();
            let (text, inline_id) = split_trailing_anchor(raw);
            (parse_inline_line(state, text), inline_id)
        }

        // -------------------------------------------------------------
        // Generic blocks and their metadata lines
        // -------------------------------------------------------------

        rule block_generic() -> Result<Block, Error>
        = metadata:block_metadata() block:block_core(&metadata) { block }
        // Metadata-looking lines with nothing attachable after them fall
        // back to literal paragraph text.
        / fallback_paragraph()

        rule block_core(metadata: &ElementAttributes) -> Result<Block, Error>
        = toc_macro()
        / list(metadata)
        / block_image(metadata)
        / literal_block(metadata)
        / delimited_block(metadata)
        / paragraph(metadata)

        rule block_metadata() -> ElementAttributes
        = entries:element_attribute_line()*
        {
            let mut attributes = ElementAttributes::default();
            for entry in entries {
                attributes.merge(entry);
            }
            attributes
        }

        rule element_attribute_line() -> ElementAttributes
        = entry:(
              element_id_attribute()
              / element_title_attribute()
              / admonition_attribute()
              / verse_attributes()
              / horizontal_attribute()
              / attribute_group()
          ) whitespace()* (eol() / ![_])
        { entry }

        rule element_id_attribute() -> ElementAttributes
        = "[[" id:element_id() "]]" { single_attribute(ATTR_ID, id.into()) }
        / "[#" id:element_id() "]" { single_attribute(ATTR_ID, id.into()) }

        rule element_id() -> &'input str
        = $(['a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | ':']+)

        // Exactly one leading dot, no space between the dot and the text.
        rule element_title_attribute() -> ElementAttributes
        = "." !whitespace() !"." title:$([^'\n']+)
        { single_attribute(ATTR_TITLE, title.trim_end().into()) }

        rule admonition_attribute() -> ElementAttributes
        = "[" kind:admonition_kind_marker() "]"
        { single_attribute(ATTR_ADMONITION_KIND, AttributeValue::Admonition(kind)) }

        rule verse_attributes() -> ElementAttributes
        = "[verse"
          author:("," author:$([^',' | ']' | '\n']*) { author })?
          title:("," title:$([^',' | ']' | '\n']*) { title })?
          "]"
        {
            let mut attributes = ElementAttributes::default();
            attributes.set(ATTR_VERSE, AttributeValue::None);
            attributes.set(ATTR_VERSE_AUTHOR, author.unwrap_or("").trim().into());
            attributes.set(ATTR_VERSE_TITLE, title.unwrap_or("").trim().into());
            attributes
        }

        rule horizontal_attribute() -> ElementAttributes
        = "[horizontal]" { single_attribute(ATTR_LAYOUT, "horizontal".into()) }

        // A space before the keyword or an unclosed bracket makes the whole
        // line literal text, which is why the first key may not start with
        // whitespace.
        rule attribute_group() -> ElementAttributes
        = "[" !whitespace() entries:(generic_attribute() ++ ("," whitespace()*)) "]"
        {
            let mut attributes = ElementAttributes::default();
            for (name, value) in entries {
                attributes.set(name, value);
            }
            attributes
        }

        rule generic_attribute() -> (String, AttributeValue)
        = name:attribute_name() whitespace()* "=" whitespace()* value:$([^',' | ']' | '\n']*)
          { (name.to_string(), unquote(value).into()) }
        / name:attribute_name()
          { (name.to_string(), AttributeValue::None) }

        // -------------------------------------------------------------
        // Table of contents and block images
        // -------------------------------------------------------------

        rule toc_macro() -> Result<Block, Error>
        = "toc::[]" whitespace()* (eol() / ![_])
        { Ok(Block::TableOfContentsMacro(TableOfContentsMacro)) }

        rule block_image(metadata: &ElementAttributes) -> Result<Block, Error>
        = "image::" path:$([^'[' | '\n' | ' ' | '\t']+) "[" attributes:macro_attributes() "]"
          whitespace()* (eol() / ![_])
        {
            Ok(Block::BlockImage(BlockImage {
                r#macro: ImageMacro::new(path, build_image_attributes(attributes)),
                attributes: metadata.clone(),
            }))
        }

        rule macro_attributes() -> Vec<MacroAttribute>
        = attributes:(macro_attribute() ** ("," whitespace()*)) { attributes }

        rule macro_attribute() -> MacroAttribute
        = name:attribute_name() whitespace()* "=" whitespace()* value:$([^',' | ']' | '\n']*)
          { (Some(name.to_string()), unquote(value)) }
        / value:$([^',' | ']' | '\n']*)
          { (None, value.trim().to_string()) }

        // -------------------------------------------------------------
        // Literal blocks: three forms
        // -------------------------------------------------------------

        rule literal_block(metadata: &ElementAttributes) -> Result<Block, Error>
        = literal_block_delimited(metadata)
        / literal_block_attribute(metadata)
        / literal_block_indented(metadata)

        rule literal_block_delimited(_metadata: &ElementAttributes) -> Result<Block, Error>
        = "."*<4,> whitespace()* &(eol() / ![_])
          lines:(eol() !literal_close() line:$([^'\n']*) { line })*
          closed:(eol() literal_close() (eol() / ![_]) { true } / ![_] { false })
        {
            if !closed {
                state.add_warning(
                    "unclosed literal block, content runs to end of input".to_string(),
                );
            }
            let lines = trim_blank_edges(&lines);
            Ok(Block::LiteralBlock(LiteralBlock {
                content: lines.join("\n"),
            }))
        }

        rule literal_close() = "."*<4,> whitespace()* (&eol() / ![_])

        rule literal_block_attribute(metadata: &ElementAttributes) -> Result<Block, Error>
        = literal_style_guard(metadata) lines:literal_text_line()+ empty_line()*
        {
            Ok(Block::LiteralBlock(LiteralBlock {
                content: lines.join("\n"),
            }))
        }

        rule literal_style_guard(metadata: &ElementAttributes)
        = {?
            if metadata.contains_key(ATTR_LITERAL) {
                Ok(())
            } else {
                Err("no literal style")
            }
        }

        // A paragraph whose first line begins with whitespace is literal;
        // it runs to the next blank line with all whitespace preserved.
        rule literal_block_indented(_metadata: &ElementAttributes) -> Result<Block, Error>
        = first:literal_indented_first_line() rest:literal_text_line()* empty_line()*
        {
            let mut lines = vec![first];
            lines.extend(rest);
            Ok(Block::LiteralBlock(LiteralBlock {
                content: lines.join("\n"),
            }))
        }

        rule literal_indented_first_line() -> &'input str
        = line:$(whitespace()+ [^' ' | '\t' | '\n'] [^'\n']*) (eol() / ![_]) { line }

        rule literal_text_line() -> &'input str
        = !empty_line() line:$([^'\n']+) (eol() / ![_]) { line }

        // -------------------------------------------------------------
        // Delimited blocks
        // -------------------------------------------------------------

        rule delimited_block(metadata: &ElementAttributes) -> Result<Block, Error>
        = fenced_block(metadata)
        / listing_block(metadata)
        / example_block(metadata)
        / comment_block(metadata)
        / verse_block(metadata)

        rule fenced_block(metadata: &ElementAttributes) -> Result<Block, Error>
        = "```" whitespace()* &(eol() / ![_])
          lines:(eol() !fenced_close() line:$([^'\n']*) { line })*
          closed:(eol() fenced_close() (eol() / ![_]) { true } / ![_] { false })
        {
            if !closed {
                state.add_warning("unclosed fenced block, content runs to end of input".to_string());
            }
            build_delimited(state, BlockKind::Fenced, &lines, metadata)
        }

        rule fenced_close() = "```" whitespace()* (&eol() / ![_])

        rule listing_block(metadata: &ElementAttributes) -> Result<Block, Error>
        = "-"*<4,> whitespace()* &(eol() / ![_])
          lines:(eol() !listing_close() line:$([^'\n']*) { line })*
          closed:(eol() listing_close() (eol() / ![_]) { true } / ![_] { false })
        {
            if !closed {
                state.add_warning("unclosed listing block, content runs to end of input".to_string());
            }
            build_delimited(state, BlockKind::Listing, &lines, metadata)
        }

        rule listing_close() = "-"*<4,> whitespace()* (&eol() / ![_])

        rule example_block(metadata: &ElementAttributes) -> Result<Block, Error>
        = "="*<4,> whitespace()* &(eol() / ![_])
          lines:(eol() !example_close() line:$([^'\n']*) { line })*
          closed:(eol() example_close() (eol() / ![_]) { true } / ![_] { false })
        {
            if !closed {
                state.add_warning("unclosed example block, content runs to end of input".to_string());
            }
            build_delimited(state, BlockKind::Example, &lines, metadata)
        }

        rule example_close() = "="*<4,> whitespace()* (&eol() / ![_])

        rule comment_block(metadata: &ElementAttributes) -> Result<Block, Error>
        = "/"*<4,> whitespace()* &(eol() / ![_])
          lines:(eol() !comment_close() line:$([^'\n']*) { line })*
          closed:(eol() comment_close() (eol() / ![_]) { true } / ![_] { false })
        {
            if !closed {
                state.add_warning("unclosed comment block, content runs to end of input".to_string());
            }
            build_delimited(state, BlockKind::Comment, &lines, metadata)
        }

        rule comment_close() = "/"*<4,> whitespace()* (&eol() / ![_])

        rule verse_block(metadata: &ElementAttributes) -> Result<Block, Error>
        = "_"*<4,> whitespace()* &(eol() / ![_])
          lines:(eol() !verse_close() line:$([^'\n']*) { line })*
          closed:(eol() verse_close() (eol() / ![_]) { true } / ![_] { false })
        {
            if !closed {
                state.add_warning("unclosed verse block, content runs to end of input".to_string());
            }
            build_delimited(state, BlockKind::Verse, &lines, metadata)
        }

        rule verse_close() = "_"*<4,> whitespace()* (&eol() / ![_])

        // -------------------------------------------------------------
        // Lists
        // -------------------------------------------------------------

        rule list(metadata: &ElementAttributes) -> Result<Block, Error>
        = first:list_item() rest:(empty_line()* item:list_item() { item })*
        {
            let mut items = vec![first?];
            for item in rest {
                items.push(item?);
            }
            build_list(items, metadata.clone())
        }

        rule list_item() -> Result<ListItem, Error>
        = ordered_list_item()
        / unordered_list_item()
        / labeled_list_item()

        rule unordered_list_item() -> Result<ListItem, Error>
        = whitespace()* prefix:unordered_item_prefix() whitespace()+
          lines:list_item_lines()
          continuations:list_continuation()*
        {
            let (bullet_style, level) = prefix;
            let mut elements = vec![item_paragraph(state, &lines)];
            for continuation in continuations {
                elements.push(continuation?);
            }
            Ok(ListItem::Unordered(UnorderedListItem {
                level,
                bullet_style,
                elements,
            }))
        }

        rule ordered_list_item() -> Result<ListItem, Error>
        = attribute_lines:element_attribute_line()*
          whitespace()* prefix:ordered_item_prefix() whitespace()+
          lines:list_item_lines()
          continuations:list_continuation()*
        {
            let (numbering_style, level) = prefix;
            let mut attributes = ElementAttributes::default();
            for entry in attribute_lines {
                attributes.merge(entry);
            }
            let mut elements = vec![item_paragraph(state, &lines)];
            for continuation in continuations {
                elements.push(continuation?);
            }
            Ok(ListItem::Ordered(OrderedListItem {
                level,
                position: 1,
                numbering_style,
                attributes,
                elements,
            }))
        }

        rule labeled_list_item() -> Result<ListItem, Error>
        = whitespace()* term:$((!"::" [^'\n'])+) "::"
          principal:(whitespace()+ text:$([^'\n']+) { text })? whitespace()* (eol() / ![_])
          rest:list_item_text_line()*
          continuations:list_continuation()*
        {
            let mut lines: Vec<&str> = Vec::new();
            if let Some(text) = principal {
                let text = text.trim_end();
                if !text.is_empty() {
                    lines.push(text);
                }
            }
            lines.extend(rest);
            let mut elements = Vec::new();
            if !lines.is_empty() {
                elements.push(item_paragraph(state, &lines));
            }
            for continuation in continuations {
                elements.push(continuation?);
            }
            Ok(ListItem::Labeled(LabeledListItem {
                term: term.trim().to_string(),
                elements,
            }))
        }

        rule unordered_item_prefix() -> (BulletStyle, ListLevel)
        = "-" { (BulletStyle::Dash, 1) }
        / asterisks:$("*"*<1,5>) !"*"
        {
            let count = asterisks.len();
            (BulletStyle::from_asterisks(count), list_level_of(count))
        }

        rule ordered_item_prefix() -> (NumberingStyle, ListLevel)
        = dots:$("."*<1,5>) !"."
          { (numbering_style_for_depth(dots.len()), list_level_of(dots.len())) }
        / "0" ['0'..='9']+ "." { (NumberingStyle::Decimal, 1) }
        / ['0'..='9']+ "." { (NumberingStyle::Arabic, 1) }
        / ['a'..='z'] "." { (NumberingStyle::LowerAlpha, 1) }
        / ['A'..='Z'] "." { (NumberingStyle::UpperAlpha, 1) }
        / ['i' | 'v' | 'x' | 'l' | 'c' | 'd' | 'm']+ ")" { (NumberingStyle::LowerRoman, 1) }
        / ['I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M']+ ")" { (NumberingStyle::UpperRoman, 1) }

        // The principal text of an item: the first line plus any directly
        // following lines that do not start another item, attribute line,
        // continuation or block delimiter.
        rule list_item_lines() -> Vec<&'input str>
        = first:$([^'\n']+) (eol() / ![_]) rest:list_item_text_line()*
        {
            let mut lines = vec![first.trim_end()];
            lines.extend(rest);
            lines
        }

        rule list_item_text_line() -> &'input str
        = !at_list_item()
          !at_list_continuation()
          !element_attribute_line()
          !paragraph_terminator()
          line:$(whitespace()* [^' ' | '\t' | '\n'] [^'\n']*) (eol() / ![_])
        { line.trim_end() }

        rule at_list_item()
        = whitespace()* (
              unordered_item_prefix() whitespace()
              / ordered_item_prefix() whitespace()
              / labeled_term_lookahead()
          )

        rule labeled_term_lookahead()
        = (!"::" [^'\n'])+ "::" (whitespace() / &eol() / ![_])

        rule at_list_continuation() = "+" whitespace()* (&eol() / ![_])

        /// A line containing only `+` attaches the following block to the
        /// preceding list item.
        rule list_continuation() -> Result<Block, Error>
        = "+" whitespace()* eol() metadata:block_metadata() block:block_core(&metadata)
        { block }

        // -------------------------------------------------------------
        // Paragraphs
        // -------------------------------------------------------------

        rule paragraph(metadata: &ElementAttributes) -> Result<Block, Error>
        = admonition_paragraph(metadata)
        / plain_paragraph(metadata)

        rule admonition_paragraph(metadata: &ElementAttributes) -> Result<Block, Error>
        = kind:admonition_kind_marker() ":" whitespace()+ first:$([^'\n']+) (eol() / ![_])
          rest:paragraph_line()*
        {
            let mut attributes = metadata.clone();
            attributes.set(ATTR_ADMONITION_KIND, AttributeValue::Admonition(kind));
            let mut lines = vec![parse_inline_line(state, first.trim_end())];
            for line in &rest {
                lines.push(parse_inline_line(state, line));
            }
            Ok(Block::Paragraph(Paragraph { attributes, lines }))
        }

        rule admonition_kind_marker() -> AdmonitionKind
        = "TIP" { AdmonitionKind::Tip }
        / "NOTE" { AdmonitionKind::Note }
        / "IMPORTANT" { AdmonitionKind::Important }
        / "WARNING" { AdmonitionKind::Warning }
        / "CAUTION" { AdmonitionKind::Caution }

        rule plain_paragraph(metadata: &ElementAttributes) -> Result<Block, Error>
        = lines:paragraph_line()+
        {
            let mut parsed = Vec::with_capacity(lines.len());
            for line in &lines {
                parsed.push(parse_inline_line(state, line));
            }
            Ok(Block::Paragraph(Paragraph {
                attributes: metadata.clone(),
                lines: parsed,
            }))
        }

        rule paragraph_line() -> &'input str
        = !paragraph_terminator()
          !element_attribute_line()
          line:$(whitespace()* [^' ' | '\t' | '\n'] [^'\n']*) (eol() / ![_])
        { line.trim_end() }

        // The last resort of block parsing: the first line is taken as text
        // even when it looks like an attribute line.
        rule fallback_paragraph() -> Result<Block, Error>
        = first:fallback_paragraph_line() rest:paragraph_line()*
        {
            let mut parsed = vec![parse_inline_line(state, first)];
            for line in &rest {
                parsed.push(parse_inline_line(state, line));
            }
            Ok(Block::Paragraph(Paragraph {
                attributes: ElementAttributes::default(),
                lines: parsed,
            }))
        }

        rule fallback_paragraph_line() -> &'input str
        = !paragraph_terminator()
          line:$(whitespace()* [^' ' | '\t' | '\n'] [^'\n']*) (eol() / ![_])
        { line.trim_end() }

        // A paragraph ends at a blank line (the line pattern refuses those),
        // a section prefix or a block delimiter line.
        rule paragraph_terminator()
        = section_line_prefix()
        / delimiter_line()

        rule section_line_prefix()
        = "="*<2,6> !"=" whitespace()+ [^' ' | '\t' | '\n']

        rule delimiter_line()
        = ("```" / "-"*<4,> / "="*<4,> / "/"*<4,> / "_"*<4,> / "."*<4,>)
          whitespace()* (&eol() / ![_])

        // -------------------------------------------------------------
        // Inline elements
        // -------------------------------------------------------------

        rule inline_element() -> InlineNode
        = cross_reference()
        / passthrough()
        / inline_image()
        / quoted_text()
        / link()
        / attribute_substitution()
        / word()
        / spaces()
        / fallback:$([_]) { InlineNode::string(fallback) }

        rule cross_reference() -> InlineNode
        = "<<" id:$([^'>' | '\n']+) ">>"
        {
            InlineNode::CrossReference(CrossReference {
                id: id.trim().to_string(),
            })
        }

        rule passthrough() -> InlineNode
        = "+++" content:$((!"+++" [^'\n'])*) "+++"
          {
              InlineNode::Passthrough(Passthrough {
                  kind: PassthroughKind::TriplePlus,
                  elements: literal_elements(content),
              })
          }
        / "+" content:$([^'+' | '\n']+) "+"
          {
              InlineNode::Passthrough(Passthrough {
                  kind: PassthroughKind::SinglePlus,
                  elements: literal_elements(content),
              })
          }
        / "pass:q[" content:$([^']' | '\n']*) "]"
          {
              // quoted-text substitution re-enabled inside
              InlineNode::Passthrough(Passthrough {
                  kind: PassthroughKind::Macro,
                  elements: parse_inline_line(state, content),
              })
          }
        / "pass:[" content:$([^']' | '\n']*) "]"
          {
              InlineNode::Passthrough(Passthrough {
                  kind: PassthroughKind::Macro,
                  elements: literal_elements(content),
              })
          }

        rule inline_image() -> InlineNode
        = "image:" !":" path:$([^'[' | '\n' | ' ' | '\t']+) "[" attributes:macro_attributes() "]"
        {
            InlineNode::InlineImage(InlineImage {
                r#macro: ImageMacro::new(path, build_image_attributes(attributes)),
            })
        }

        rule link() -> InlineNode
        = url:$(url_scheme() url_char()+) attributes:link_attribute_list()?
          {
              InlineNode::Link(Link {
                  url: url.to_string(),
                  attributes: attributes.unwrap_or_else(|| build_link_attributes(Vec::new())),
              })
          }
        / "link:" url:$([^'[' | '\n' | ' ' | '\t']+) attributes:link_attribute_list()
          {
              InlineNode::Link(Link {
                  url: url.to_string(),
                  attributes,
              })
          }

        rule url_scheme() = "https://" / "http://" / "ftp://" / "irc://" / "mailto:"

        rule url_char() = [^' ' | '\t' | '\n' | '[' | ']']

        rule link_attribute_list() -> ElementAttributes
        = "[" attributes:macro_attributes() "]" { build_link_attributes(attributes) }

        rule attribute_substitution() -> InlineNode
        = "{" name:attribute_name() "}"
        {
            InlineNode::AttributeSubstitution(AttributeSubstitution {
                name: name.to_string(),
            })
        }

        // -------------------------------------------------------------
        // Quoted text
        // -------------------------------------------------------------

        rule quoted_text() -> InlineNode
        = escaped_quoted_text()
        / bold_text()
        / italic_text()
        / monospace_text()

        // A backslash prevents interpretation. Each escape alternative
        // consumes one marker character's worth of backslash; the rest pass
        // through verbatim.
        rule escaped_quoted_text() -> InlineNode
        = bs:$("\\"*<2,>) "**" elements:bold_double_content() "**"
          { EscapedQuotedText::new(bs, "*", wrap_punctuation("*", elements)) }
        / bs:$("\\"+) "**" elements:bold_single_content() "*"
          { EscapedQuotedText::new(bs, "*", prepend_punctuation("*", elements)) }
        / bs:$("\\"+) "*" elements:bold_single_content() "*"
          { EscapedQuotedText::new(bs, "*", elements) }
        / bs:$("\\"*<2,>) "__" elements:italic_double_content() "__"
          { EscapedQuotedText::new(bs, "_", wrap_punctuation("_", elements)) }
        / bs:$("\\"+) "__" elements:italic_single_content() "_"
          { EscapedQuotedText::new(bs, "_", prepend_punctuation("_", elements)) }
        / bs:$("\\"+) "_" elements:italic_single_content() "_"
          { EscapedQuotedText::new(bs, "_", elements) }
        / bs:$("\\"*<2,>) "``" elements:monospace_double_content() "``"
          { EscapedQuotedText::new(bs, "`", wrap_punctuation("`", elements)) }
        / bs:$("\\"+) "``" elements:monospace_single_content() "`"
          { EscapedQuotedText::new(bs, "`", prepend_punctuation("`", elements)) }
        / bs:$("\\"+) "`" elements:monospace_single_content() "`"
          { EscapedQuotedText::new(bs, "`", elements) }

        rule bold_text() -> InlineNode
        = "**" elements:bold_double_content() "**"
          {
              InlineNode::QuotedText(QuotedText {
                  kind: QuotedTextKind::Bold,
                  elements,
              })
          }
        // Unbalanced close: the extra opening punctuation becomes literal
        // text prepended to the inner content.
        / "**" elements:bold_single_content() "*"
          {
              InlineNode::QuotedText(QuotedText {
                  kind: QuotedTextKind::Bold,
                  elements: merge_inlines(prepend_punctuation("*", elements)),
              })
          }
        / "*" elements:bold_single_content() "*"
          {
              InlineNode::QuotedText(QuotedText {
                  kind: QuotedTextKind::Bold,
                  elements,
              })
          }

        rule italic_text() -> InlineNode
        = "__" elements:italic_double_content() "__"
          {
              InlineNode::QuotedText(QuotedText {
                  kind: QuotedTextKind::Italic,
                  elements,
              })
          }
        / "__" elements:italic_single_content() "_"
          {
              InlineNode::QuotedText(QuotedText {
                  kind: QuotedTextKind::Italic,
                  elements: merge_inlines(prepend_punctuation("_", elements)),
              })
          }
        / "_" elements:italic_single_content() "_"
          {
              InlineNode::QuotedText(QuotedText {
                  kind: QuotedTextKind::Italic,
                  elements,
              })
          }

        rule monospace_text() -> InlineNode
        = "``" elements:monospace_double_content() "``"
          {
              InlineNode::QuotedText(QuotedText {
                  kind: QuotedTextKind::Monospace,
                  elements,
              })
          }
        / "``" elements:monospace_single_content() "`"
          {
              InlineNode::QuotedText(QuotedText {
                  kind: QuotedTextKind::Monospace,
                  elements: merge_inlines(prepend_punctuation("`", elements)),
              })
          }
        / "`" elements:monospace_single_content() "`"
          {
              InlineNode::QuotedText(QuotedText {
                  kind: QuotedTextKind::Monospace,
                  elements,
              })
          }

        rule bold_single_content() -> Vec<InlineNode>
        = elements:bold_single_element()+ { merge_inlines(elements) }

        rule bold_single_element() -> InlineNode
        = quoted_text()
        / word:$([^' ' | '\t' | '\n' | '*']+) { InlineNode::string(word) }
        / spaces()

        rule bold_double_content() -> Vec<InlineNode>
        = elements:bold_double_element()+ { merge_inlines(elements) }

        rule bold_double_element() -> InlineNode
        = quoted_text()
        / word:$([^' ' | '\t' | '\n' | '*']+) { InlineNode::string(word) }
        / spaces()
        / !"**" stray:$("*") { InlineNode::string(stray) }

        rule italic_single_content() -> Vec<InlineNode>
        = elements:italic_single_element()+ { merge_inlines(elements) }

        rule italic_single_element() -> InlineNode
        = quoted_text()
        / word:$([^' ' | '\t' | '\n' | '_']+) { InlineNode::string(word) }
        / spaces()

        rule italic_double_content() -> Vec<InlineNode>
        = elements:italic_double_element()+ { merge_inlines(elements) }

        rule italic_double_element() -> InlineNode
        = quoted_text()
        / word:$([^' ' | '\t' | '\n' | '_']+) { InlineNode::string(word) }
        / spaces()
        / !"__" stray:$("_") { InlineNode::string(stray) }

        rule monospace_single_content() -> Vec<InlineNode>
        = elements:monospace_single_element()+ { merge_inlines(elements) }

        rule monospace_single_element() -> InlineNode
        = quoted_text()
        / word:$([^' ' | '\t' | '\n' | '`']+) { InlineNode::string(word) }
        / spaces()

        rule monospace_double_content() -> Vec<InlineNode>
        = elements:monospace_double_element()+ { merge_inlines(elements) }

        rule monospace_double_element() -> InlineNode
        = quoted_text()
        / word:$([^' ' | '\t' | '\n' | '`']+) { InlineNode::string(word) }
        / spaces()
        / !"``" stray:$("`") { InlineNode::string(stray) }

        // -------------------------------------------------------------
        // Lexical primitives
        // -------------------------------------------------------------

        rule word() -> InlineNode
        = word:$(word_char()+) { InlineNode::string(word) }

        // Markup trigger characters interrupt a word; when the structured
        // alternatives fail on them they come back in as single fallback
        // characters and merge with the surrounding text.
        rule word_char()
        = [^' ' | '\t' | '\n' | '<' | '{' | '*' | '_' | '`' | '+' | '\\' | '[']

        rule spaces() -> InlineNode
        = spaces:$([' ' | '\t']+) { InlineNode::string(spaces) }

        rule attribute_name() -> &'input str
        = $(['a'..='z' | 'A'..='Z' | '0'..='9'] ['a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-']*)

        rule empty_line() = whitespace()* eol()

        rule whitespace() = quiet!{ " " / "\t" }

        rule eol() = quiet!{ "\n" }
    }
}

/// The section level of an `=`-run: one equals sign is level 0 (the document
/// title), six is level 5.
fn section_level_of(equals: &str) -> SectionLevel {
    SectionLevel::try_from(equals.len())
        .unwrap_or(1)
        .saturating_sub(1)
}

fn list_level_of(count: usize) -> ListLevel {
    ListLevel::try_from(count).unwrap_or(1)
}

/// Dot-run depth selects both the level and the numbering style.
fn numbering_style_for_depth(depth: usize) -> NumberingStyle {
    match depth {
        1 => NumberingStyle::Arabic,
        2 => NumberingStyle::LowerAlpha,
        3 => NumberingStyle::LowerRoman,
        4 => NumberingStyle::UpperAlpha,
        5 => NumberingStyle::UpperRoman,
        _ => NumberingStyle::Unknown,
    }
}

fn single_attribute(name: &str, value: AttributeValue) -> ElementAttributes {
    let mut attributes = ElementAttributes::default();
    attributes.set(name, value);
    attributes
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').to_string()
}

/// Parse one line of text into inline nodes. The inline grammar is total,
/// so a failure here is unexpected; the line is kept as plain text.
fn parse_inline_line(state: &mut ParserState, line: &str) -> Vec<InlineNode> {
    match document_parser::inline_elements(line, state) {
        Ok(elements) => elements,
        Err(error) => {
            tracing::error!(?error, line, "failed to parse inline content, keeping line as plain text");
            vec![InlineNode::string(line)]
        }
    }
}

fn literal_elements(content: &str) -> Vec<InlineNode> {
    if content.is_empty() {
        Vec::new()
    } else {
        vec![InlineNode::string(content)]
    }
}

fn wrap_punctuation(punctuation: &str, elements: Vec<InlineNode>) -> Vec<InlineNode> {
    let mut all = Vec::with_capacity(elements.len() + 2);
    all.push(InlineNode::string(punctuation));
    all.extend(elements);
    all.push(InlineNode::string(punctuation));
    all
}

fn prepend_punctuation(punctuation: &str, elements: Vec<InlineNode>) -> Vec<InlineNode> {
    let mut all = Vec::with_capacity(elements.len() + 1);
    all.push(InlineNode::string(punctuation));
    all.extend(elements);
    all
}

/// A section title may end in an inline `[[id]]` anchor.
fn split_trailing_anchor(raw: &str) -> (&str, Option<String>) {
    if let Some(stripped) = raw.strip_suffix("]]") {
        if let Some(index) = stripped.rfind("[[") {
            let id = &stripped[index + 2..];
            let valid = !id.is_empty()
                && id
                    .chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));
            if valid {
                return (stripped[..index].trim_end(), Some(id.to_string()));
            }
        }
    }
    (raw, None)
}

/// Positional image attributes map to `alt`, `width` and `height` in order.
fn build_image_attributes(entries: Vec<MacroAttribute>) -> ElementAttributes {
    let mut attributes = ElementAttributes::default();
    let mut position = 0usize;
    for (name, value) in entries {
        match name {
            Some(name) => attributes.set(name, value.into()),
            None => {
                position += 1;
                match position {
                    1 => attributes.set(ATTR_IMAGE_ALT, value.into()),
                    2 => attributes.set(ATTR_IMAGE_WIDTH, value.into()),
                    3 => attributes.set(ATTR_IMAGE_HEIGHT, value.into()),
                    _ => tracing::warn!(%value, "ignoring extra positional image attribute"),
                }
            }
        }
    }
    attributes
}

/// The first positional link attribute maps to the implicit `text` key.
fn build_link_attributes(entries: Vec<MacroAttribute>) -> ElementAttributes {
    let mut attributes = ElementAttributes::default();
    let mut text_seen = false;
    for (name, value) in entries {
        match name {
            Some(name) => attributes.set(name, value.into()),
            None if !text_seen => {
                text_seen = true;
                attributes.set(ATTR_LINK_TEXT, value.into());
            }
            None => tracing::warn!(%value, "ignoring extra positional link attribute"),
        }
    }
    if !attributes.contains_key(ATTR_LINK_TEXT) {
        attributes.set(ATTR_LINK_TEXT, "".into());
    }
    attributes
}

fn item_paragraph(state: &mut ParserState, lines: &[&str]) -> Block {
    let mut parsed = Vec::with_capacity(lines.len());
    for line in lines {
        parsed.push(parse_inline_line(state, line));
    }
    Block::Paragraph(Paragraph {
        attributes: ElementAttributes::default(),
        lines: parsed,
    })
}

/// Build a delimited block from its captured content lines.
///
/// A `[verse, …]` attribute masquerades any block into a verse; example
/// content is re-parsed as restricted blocks; fenced, listing and comment
/// content stays verbatim, grouped into paragraphs split on blank lines.
fn build_delimited(
    state: &mut ParserState,
    kind: BlockKind,
    lines: &[&str],
    metadata: &ElementAttributes,
) -> Result<Block, Error> {
    let mut attributes = metadata.clone();
    let masquerade = attributes.remove(ATTR_VERSE).is_some();
    if masquerade || kind == BlockKind::Verse {
        let paragraph = verse_paragraph(state, lines);
        return Ok(Block::DelimitedBlock(DelimitedBlock {
            kind: BlockKind::Verse,
            attributes,
            elements: vec![paragraph],
        }));
    }

    let elements = match kind {
        BlockKind::Example => {
            let content = trim_blank_edges(lines).join("\n");
            if content.trim().is_empty() {
                Vec::new()
            } else {
                match document_parser::restricted_blocks(&content, state) {
                    Ok(blocks) => blocks?,
                    Err(error) => {
                        tracing::error!(?error, "failed to parse example block content, keeping it verbatim");
                        group_verbatim_lines(lines)
                    }
                }
            }
        }
        _ => group_verbatim_lines(lines),
    };

    Ok(Block::DelimitedBlock(DelimitedBlock {
        kind,
        attributes,
        elements,
    }))
}

/// A verse holds exactly one paragraph; an empty verse keeps a paragraph
/// with no lines.
fn verse_paragraph(state: &mut ParserState, lines: &[&str]) -> Block {
    let lines = trim_blank_edges(lines);
    let mut parsed = Vec::with_capacity(lines.len());
    for line in lines {
        parsed.push(parse_inline_line(state, line.trim_end()));
    }
    Block::Paragraph(Paragraph {
        attributes: ElementAttributes::default(),
        lines: parsed,
    })
}

/// Group verbatim content lines into paragraphs of string elements, with a
/// single blank-line marker between runs.
fn group_verbatim_lines(lines: &[&str]) -> Vec<Block> {
    let lines = trim_blank_edges(lines);
    let mut elements: Vec<Block> = Vec::new();
    let mut current: Vec<Vec<InlineNode>> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                elements.push(Block::Paragraph(Paragraph {
                    attributes: ElementAttributes::default(),
                    lines: std::mem::take(&mut current),
                }));
            }
            if !matches!(elements.last(), Some(Block::BlankLine(_))) {
                elements.push(Block::BlankLine(BlankLine));
            }
        } else {
            current.push(vec![InlineNode::string(line.trim_end())]);
        }
    }
    if !current.is_empty() {
        elements.push(Block::Paragraph(Paragraph {
            attributes: ElementAttributes::default(),
            lines: current,
        }));
    }
    elements
}

/// Drop leading and trailing blank lines.
fn trim_blank_edges<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    let Some(start) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return &[];
    };
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(start);
    &lines[start..=end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inlines(input: &str) -> Vec<InlineNode> {
        let mut state = ParserState::new();
        document_parser::inline_elements(input, &mut state).expect("inline grammar is total")
    }

    #[test]
    fn words_and_spaces_merge_into_one_string() {
        assert_eq!(inlines("just some text"), vec![InlineNode::string("just some text")]);
    }

    #[test]
    fn stray_markup_characters_stay_literal() {
        assert_eq!(inlines("a + b {"), vec![InlineNode::string("a + b {")]);
    }

    #[test]
    fn bold_single_punctuation() {
        assert_eq!(
            inlines("some *bold* text"),
            vec![
                InlineNode::string("some "),
                InlineNode::QuotedText(QuotedText {
                    kind: QuotedTextKind::Bold,
                    elements: vec![InlineNode::string("bold")],
                }),
                InlineNode::string(" text"),
            ]
        );
    }

    #[test]
    fn bold_double_punctuation_wins_over_single() {
        assert_eq!(
            inlines("**bold**"),
            vec![InlineNode::QuotedText(QuotedText {
                kind: QuotedTextKind::Bold,
                elements: vec![InlineNode::string("bold")],
            })]
        );
    }

    #[test]
    fn unbalanced_bold_keeps_extra_punctuation_as_text() {
        assert_eq!(
            inlines("**bold*"),
            vec![InlineNode::QuotedText(QuotedText {
                kind: QuotedTextKind::Bold,
                elements: vec![InlineNode::string("*bold")],
            })]
        );
    }

    #[test]
    fn nested_quoted_text() {
        assert_eq!(
            inlines("*bold _italic_ more*"),
            vec![InlineNode::QuotedText(QuotedText {
                kind: QuotedTextKind::Bold,
                elements: vec![
                    InlineNode::string("bold "),
                    InlineNode::QuotedText(QuotedText {
                        kind: QuotedTextKind::Italic,
                        elements: vec![InlineNode::string("italic")],
                    }),
                    InlineNode::string(" more"),
                ],
            })]
        );
    }

    #[test]
    fn escaped_bold_is_literal() {
        assert_eq!(
            inlines(r"\*x*"),
            vec![InlineNode::EscapedQuotedText(EscapedQuotedText {
                elements: vec![InlineNode::string("*x*")],
            })]
        );
    }

    #[test]
    fn double_escaped_double_bold_keeps_one_backslash() {
        assert_eq!(
            inlines(r"\\**x**"),
            vec![InlineNode::EscapedQuotedText(EscapedQuotedText {
                elements: vec![InlineNode::string(r"\**x**")],
            })]
        );
    }

    #[test]
    fn unterminated_bold_falls_back_to_text() {
        assert_eq!(inlines("*not bold"), vec![InlineNode::string("*not bold")]);
    }

    #[test]
    fn cross_reference() {
        assert_eq!(
            inlines("see <<target>>!"),
            vec![
                InlineNode::string("see "),
                InlineNode::CrossReference(CrossReference {
                    id: "target".to_string(),
                }),
                InlineNode::string("!"),
            ]
        );
    }

    #[test]
    fn single_plus_passthrough() {
        assert_eq!(
            inlines("+*not bold*+"),
            vec![InlineNode::Passthrough(Passthrough {
                kind: PassthroughKind::SinglePlus,
                elements: vec![InlineNode::string("*not bold*")],
            })]
        );
    }

    #[test]
    fn triple_plus_passthrough() {
        assert_eq!(
            inlines("+++a + b+++"),
            vec![InlineNode::Passthrough(Passthrough {
                kind: PassthroughKind::TriplePlus,
                elements: vec![InlineNode::string("a + b")],
            })]
        );
    }

    #[test]
    fn pass_macro_is_literal() {
        assert_eq!(
            inlines("pass:[*x*]"),
            vec![InlineNode::Passthrough(Passthrough {
                kind: PassthroughKind::Macro,
                elements: vec![InlineNode::string("*x*")],
            })]
        );
    }

    #[test]
    fn pass_macro_with_quotes_parses_markup() {
        assert_eq!(
            inlines("pass:q[*x*]"),
            vec![InlineNode::Passthrough(Passthrough {
                kind: PassthroughKind::Macro,
                elements: vec![InlineNode::QuotedText(QuotedText {
                    kind: QuotedTextKind::Bold,
                    elements: vec![InlineNode::string("x")],
                })],
            })]
        );
    }

    #[test]
    fn external_link_with_text() {
        let nodes = inlines("https://example.com[the example]");
        let [InlineNode::Link(link)] = nodes.as_slice() else {
            panic!("expected a single link, got {nodes:?}");
        };
        assert_eq!(link.url, "https://example.com");
        assert_eq!(link.text(), "the example");
    }

    #[test]
    fn bare_url_gets_empty_text() {
        let nodes = inlines("see https://example.com now");
        let InlineNode::Link(link) = &nodes[1] else {
            panic!("expected a link, got {nodes:?}");
        };
        assert_eq!(link.text(), "");
    }

    #[test]
    fn relative_link_requires_brackets() {
        let nodes = inlines("link:foo.html[foo]");
        let [InlineNode::Link(link)] = nodes.as_slice() else {
            panic!("expected a single link, got {nodes:?}");
        };
        assert_eq!(link.url, "foo.html");
        assert_eq!(link.text(), "foo");

        // without brackets it stays text
        assert_eq!(inlines("link:foo.html"), vec![InlineNode::string("link:foo.html")]);
    }

    #[test]
    fn inline_image_positional_attributes() {
        let nodes = inlines("image:photos/cat.jpg[a cat, 640, 480]");
        let [InlineNode::InlineImage(image)] = nodes.as_slice() else {
            panic!("expected a single inline image, got {nodes:?}");
        };
        assert_eq!(image.r#macro.path, "photos/cat.jpg");
        assert_eq!(image.r#macro.alt(), "a cat");
        assert_eq!(image.r#macro.width(), "640");
        assert_eq!(image.r#macro.height(), "480");
    }

    #[test]
    fn attribute_substitution() {
        assert_eq!(
            inlines("by {author}."),
            vec![
                InlineNode::string("by "),
                InlineNode::AttributeSubstitution(AttributeSubstitution {
                    name: "author".to_string(),
                }),
                InlineNode::string("."),
            ]
        );
    }

    #[test]
    fn quoted_text_does_not_span_newlines() {
        // inline entry on a two-line input: the newline stays literal
        let nodes = inlines("*a\nb*");
        assert!(!nodes
            .iter()
            .any(|node| matches!(node, InlineNode::QuotedText(_))));
    }

    #[test]
    fn raw_section_title_entry_point() {
        let mut state = ParserState::new();
        let title = document_parser::raw_section_title("== a title", &mut state).unwrap();
        assert_eq!(title.id(), "a_title");
        assert_eq!(title.content, vec![InlineNode::string("a title")]);
    }

    #[test]
    fn raw_section_title_with_trailing_anchor() {
        let mut state = ParserState::new();
        let title =
            document_parser::raw_section_title("== a title [[custom]]", &mut state).unwrap();
        assert_eq!(title.id(), "custom");
        assert_eq!(title.content, vec![InlineNode::string("a title")]);
    }

    #[test]
    fn split_trailing_anchor_rejects_invalid_ids() {
        assert_eq!(split_trailing_anchor("title [[a b]]"), ("title [[a b]]", None));
        assert_eq!(
            split_trailing_anchor("title [[ok-id]]"),
            ("title", Some("ok-id".to_string()))
        );
    }

    #[test]
    fn verbatim_lines_group_on_blank_runs() {
        let blocks = group_verbatim_lines(&["a", "b", "", "", "c"]);
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[1], Block::BlankLine(_)));
    }
}
