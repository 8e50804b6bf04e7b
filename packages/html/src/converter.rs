//! # HTML → Block Conversion
//!
//! Streams lexer tokens into blocks in a single pass.
//!
//! ```text
//! <h1>Title</h1><p>Some <b>bold</b> text</p>
//!        │
//!        ▼
//! ┌──────────────┐   block elements (BlockRenderRules)   ┌───────────────┐
//! │ Token stream │ ─────────────────────────────────────▶│ block stack   │
//! └──────────────┘   inline elements / style attributes  ├───────────────┤
//!                  ─────────────────────────────────────▶│ inline frames │
//!                                                        └───────┬───────┘
//!                                                                ▼
//!                               [header-one "Title"] [unstyled "Some bold text"]
//! ```
//!
//! Every character is stamped with the style set folded over the open inline
//! frames and the innermost open entity (`<a href>`). Images become a single
//! placeholder character carrying an immutable IMAGE entity.

use crate::entities::decode_entities;
use crate::error::{HtmlError, HtmlResult};
use crate::lexer::{end_tag_name, parse_start_tag, StartTag, Token};
use crate::rules::BlockRenderRules;
use logos::Logos;
use scribe_model::{
    Block, BlockType, CharacterMetadata, Entity, EntityKey, EntityMap, Fragment, InlineStyle,
    KeyGenerator,
};
use std::collections::HashSet;

pub const BOLD: &str = "BOLD";
pub const ITALIC: &str = "ITALIC";
pub const UNDERLINE: &str = "UNDERLINE";
pub const STRIKETHROUGH: &str = "STRIKETHROUGH";
pub const CODE: &str = "CODE";

/// Character inserted in place of an `<img>`
pub const IMAGE_PLACEHOLDER: char = '\u{1f4f7}';

const DEFAULT_MAX_LEN: usize = 4 * 1024 * 1024;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content never reaches the document
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "head", "title", "template"];

#[derive(Debug, Clone)]
pub struct HtmlConverter {
    rules: BlockRenderRules,
    max_len: usize,
}

impl HtmlConverter {
    pub fn new(rules: BlockRenderRules) -> Self {
        Self {
            rules,
            max_len: DEFAULT_MAX_LEN,
        }
    }

    /// Refuse markup longer than `max_len` bytes
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn rules(&self) -> &BlockRenderRules {
        &self.rules
    }

    /// Convert markup into a fragment of freshly keyed blocks
    pub fn convert(&self, html: &str, keys: &mut KeyGenerator) -> HtmlResult<Fragment> {
        if html.len() > self.max_len {
            return Err(HtmlError::TooLarge {
                len: html.len(),
                limit: self.max_len,
            });
        }

        let mut builder = FragmentBuilder::new(&self.rules, keys);
        for token in Token::lexer(html).flatten() {
            builder.feed(token);
        }
        let fragment = builder.finish();

        if fragment.is_empty() {
            return Err(HtmlError::NoContent);
        }

        tracing::debug!(
            "[HtmlImport] {} bytes -> {} blocks, {} entities",
            html.len(),
            fragment.len(),
            fragment.entities().len()
        );
        Ok(fragment)
    }
}

/// Convert markup with `rules`; `None` when nothing convertible survives
pub fn convert_html_to_blocks(
    html: &str,
    rules: &BlockRenderRules,
    keys: &mut KeyGenerator,
) -> Option<Fragment> {
    match HtmlConverter::new(rules.clone()).convert(html, keys) {
        Ok(fragment) => Some(fragment),
        Err(e) => {
            tracing::debug!("[HtmlImport] discarded markup: {}", e);
            None
        }
    }
}

#[derive(Debug, Default)]
struct InlineFrame {
    tag: String,
    add: Vec<&'static str>,
    remove: Vec<&'static str>,
    entity: Option<EntityKey>,
}

impl InlineFrame {
    fn toggle(&mut self, style: &'static str, on: bool) {
        self.add.retain(|s| *s != style);
        self.remove.retain(|s| *s != style);
        if on {
            self.add.push(style);
        } else {
            self.remove.push(style);
        }
    }
}

struct PendingBlock {
    block_type: BlockType,
    depth: u8,
    text: String,
    characters: Vec<CharacterMetadata>,
}

struct FragmentBuilder<'a> {
    rules: &'a BlockRenderRules,
    keys: &'a mut KeyGenerator,
    blocks: Vec<Block>,
    entities: EntityMap,

    current: Option<PendingBlock>,
    inline: Vec<InlineFrame>,
    block_stack: Vec<(String, BlockType)>,
    lists: Vec<BlockType>,

    preformatted: usize,
    pre_leading_newline: bool,

    /// Dropped element being skipped, with its nesting count
    skipping: Option<(String, usize)>,
}

impl<'a> FragmentBuilder<'a> {
    fn new(rules: &'a BlockRenderRules, keys: &'a mut KeyGenerator) -> Self {
        Self {
            rules,
            keys,
            blocks: Vec::new(),
            entities: EntityMap::new(),
            current: None,
            inline: Vec::new(),
            block_stack: Vec::new(),
            lists: Vec::new(),
            preformatted: 0,
            pre_leading_newline: false,
            skipping: None,
        }
    }

    fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::StartTag(raw) => self.start_tag(parse_start_tag(raw)),
            Token::EndTag(raw) => self.end_tag(&end_tag_name(raw)),
            Token::Text(text) => self.text(text),
            Token::StrayAngle => self.text("<"),
            Token::Comment | Token::Doctype | Token::ProcessingInstruction => {}
        }
    }

    fn start_tag(&mut self, tag: StartTag) {
        if let Some((name, depth)) = &mut self.skipping {
            if *name == tag.name && !tag.self_closing {
                *depth += 1;
            }
            return;
        }

        let name = tag.name.as_str();
        if DROPPED_ELEMENTS.contains(&name) {
            if !tag.self_closing {
                self.skipping = Some((tag.name.clone(), 1));
            }
            return;
        }

        match name {
            "br" => return self.push_text_char('\n'),
            "img" => return self.image(&tag),
            "hr" => return self.flush(),
            _ if VOID_ELEMENTS.contains(&name) => return,
            _ => {}
        }

        if tag.self_closing {
            if self.rules.block_type(name).is_some() {
                self.flush();
            }
            return;
        }

        if self.rules.is_list_container(name) {
            self.flush();
            let item_type = self
                .rules
                .block_type(name)
                .unwrap_or(BlockType::UnorderedListItem);
            self.lists.push(item_type);
        } else if name == "li" {
            self.flush();
            let item_type = self
                .lists
                .last()
                .copied()
                .unwrap_or(BlockType::UnorderedListItem);
            self.block_stack.push((tag.name.clone(), item_type));
        } else if let Some(block_type) = self.rules.block_type(name) {
            self.flush();
            self.block_stack.push((tag.name.clone(), block_type));
        }

        if name == "pre" {
            self.preformatted += 1;
            self.pre_leading_newline = true;
        }

        let frame = self.inline_frame(&tag);
        self.inline.push(frame);
    }

    fn end_tag(&mut self, name: &str) {
        if let Some((skipped, depth)) = &mut self.skipping {
            if skipped.as_str() == name {
                *depth -= 1;
            }
            if *depth == 0 {
                self.skipping = None;
            }
            return;
        }

        if let Some(pos) = self.inline.iter().rposition(|f| f.tag == name) {
            self.inline.truncate(pos);
        }

        if self.rules.is_list_container(name) {
            self.flush();
            self.lists.pop();
        } else if let Some(pos) = self.block_stack.iter().rposition(|(tag, _)| tag == name) {
            self.flush();
            self.block_stack.truncate(pos);
        }

        if name == "pre" {
            self.preformatted = self.preformatted.saturating_sub(1);
        }
    }

    fn inline_frame(&mut self, tag: &StartTag) -> InlineFrame {
        let mut frame = InlineFrame {
            tag: tag.name.clone(),
            ..Default::default()
        };

        match tag.name.as_str() {
            "b" | "strong" => frame.add.push(BOLD),
            "i" | "em" => frame.add.push(ITALIC),
            "u" | "ins" => frame.add.push(UNDERLINE),
            "s" | "strike" | "del" => frame.add.push(STRIKETHROUGH),
            "code" => frame.add.push(CODE),
            "a" => {
                let href = tag
                    .attribute("href")
                    .map(|h| decode_entities(h).trim().to_string())
                    .filter(|h| !h.is_empty());
                if let Some(href) = href {
                    let key = self.keys.next_entity_key();
                    self.entities.insert(key.clone(), Entity::link(href));
                    frame.entity = Some(key);
                }
            }
            _ => {}
        }

        if let Some(style) = tag.attribute("style") {
            apply_style_attribute(&mut frame, style);
        }

        frame
    }

    fn image(&mut self, tag: &StartTag) {
        let Some(src) = tag
            .attribute("src")
            .map(|s| decode_entities(s).into_owned())
            .filter(|s| !s.is_empty())
        else {
            return;
        };
        let alt = tag.attribute("alt").map(|a| decode_entities(a).into_owned());

        let key = self.keys.next_entity_key();
        self.entities.insert(key.clone(), Entity::image(src, alt));

        let mut metadata = self.metadata();
        metadata.entity = Some(key);
        self.push(IMAGE_PLACEHOLDER, metadata);
    }

    fn text(&mut self, raw: &str) {
        if self.skipping.is_some() {
            return;
        }

        let decoded = decode_entities(raw);
        let metadata = self.metadata();

        if self.preformatted > 0 {
            let mut text: &str = &decoded;
            if std::mem::take(&mut self.pre_leading_newline) {
                text = text
                    .strip_prefix("\r\n")
                    .or_else(|| text.strip_prefix('\n'))
                    .unwrap_or(text);
            }
            let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
            for c in normalized.chars() {
                self.push(c, metadata.clone());
            }
            return;
        }

        for c in decoded.chars() {
            if matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C') {
                if !self.at_collapsible_boundary() {
                    self.push(' ', metadata.clone());
                }
            } else {
                self.push(c, metadata.clone());
            }
        }
    }

    fn push_text_char(&mut self, c: char) {
        if self.skipping.is_none() {
            let metadata = self.metadata();
            self.push(c, metadata);
        }
    }

    /// Whitespace here would be leading or doubled
    fn at_collapsible_boundary(&self) -> bool {
        match &self.current {
            None => true,
            Some(block) => matches!(block.text.chars().last(), None | Some(' ') | Some('\n')),
        }
    }

    fn metadata(&self) -> CharacterMetadata {
        let mut style = InlineStyle::new();
        for frame in &self.inline {
            for s in &frame.add {
                style.insert(s.to_string());
            }
            for s in &frame.remove {
                style.remove(*s);
            }
        }
        let entity = self.inline.iter().rev().find_map(|f| f.entity.clone());
        CharacterMetadata::new(style, entity)
    }

    fn push(&mut self, c: char, metadata: CharacterMetadata) {
        if self.current.is_none() {
            self.current = Some(self.begin_block());
        }
        if let Some(block) = self.current.as_mut() {
            block.text.push(c);
            block.characters.push(metadata);
        }
    }

    fn begin_block(&self) -> PendingBlock {
        // Generic containers (p, div) defer to a meaningful enclosing block
        let block_type = self
            .block_stack
            .iter()
            .rev()
            .map(|(_, t)| *t)
            .find(|t| *t != BlockType::Unstyled)
            .unwrap_or_default();
        let depth = if block_type.is_list_item() {
            u8::try_from(self.lists.len().saturating_sub(1)).unwrap_or(u8::MAX)
        } else {
            0
        };

        PendingBlock {
            block_type,
            depth,
            text: String::new(),
            characters: Vec::new(),
        }
    }

    fn flush(&mut self) {
        let Some(mut pending) = self.current.take() else {
            return;
        };

        if self.preformatted == 0 {
            while pending.text.ends_with(' ') {
                pending.text.pop();
                pending.characters.pop();
            }
        }
        if pending.text.chars().all(char::is_whitespace) {
            return;
        }

        self.blocks.push(Block {
            key: self.keys.next_block_key(),
            block_type: pending.block_type,
            text: pending.text,
            characters: pending.characters,
            depth: pending.depth,
        });
    }

    fn finish(mut self) -> Fragment {
        self.flush();

        let used: HashSet<EntityKey> = self
            .blocks
            .iter()
            .flat_map(|b| b.characters.iter().filter_map(|c| c.entity.clone()))
            .collect();
        self.entities.retain(|key, _| used.contains(key));

        Fragment::from_blocks(self.blocks).with_entities(self.entities)
    }
}

/// Apply `font-weight`, `font-style` and `text-decoration` declarations
fn apply_style_attribute(frame: &mut InlineFrame, style: &str) {
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();

        match property.as_str() {
            "font-weight" => {
                let bold = match value.as_str() {
                    "bold" | "bolder" => true,
                    "normal" | "lighter" => false,
                    weight => match weight.parse::<u32>() {
                        Ok(weight) => weight >= 600,
                        Err(_) => continue,
                    },
                };
                frame.toggle(BOLD, bold);
            }
            "font-style" => match value.as_str() {
                "italic" | "oblique" => frame.toggle(ITALIC, true),
                "normal" => frame.toggle(ITALIC, false),
                _ => {}
            },
            "text-decoration" | "text-decoration-line" => {
                if value == "none" {
                    frame.toggle(UNDERLINE, false);
                    frame.toggle(STRIKETHROUGH, false);
                } else {
                    if value.contains("underline") {
                        frame.toggle(UNDERLINE, true);
                    }
                    if value.contains("line-through") {
                        frame.toggle(STRIKETHROUGH, true);
                    }
                }
            }
            _ => {}
        }
    }
}
