// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Turn automation output (Markdown with optional inline HTML) into display blocks.

use std::collections::HashSet;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Inline text fragment with its emphasis flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

/// Block-level element shown in the result view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    ListItem { depth: usize, spans: Vec<Span> },
    Code(String),
    Rule,
}

/// Parse markdown into display blocks; HTML tags are removed but their text kept.
pub fn render_blocks(markdown: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut state = BlockBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        state.push(event);
    }
    state.finish()
}

/// Plain text of a block list, one block per line.
pub fn plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Heading { spans, .. }
            | Block::Paragraph(spans)
            | Block::ListItem { spans, .. } => spans.iter().map(|s| s.text.as_str()).collect(),
            Block::Code(code) => code.clone(),
            Block::Rule => "---".to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    spans: Vec<Span>,
    bold: usize,
    italic: usize,
    heading: Option<u8>,
    list_depth: usize,
    in_item: bool,
    code_block: Option<String>,
    html_block: Option<String>,
    /// Inline `script`/`style` element whose content is being dropped.
    hidden_inline: Option<&'static str>,
}

impl BlockBuilder {
    fn push(&mut self, event: Event<'_>) {
        if let Some(code) = self.code_block.as_mut() {
            match event {
                Event::Text(text) => code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let code = self.code_block.take().unwrap_or_default();
                    self.blocks
                        .push(Block::Code(code.trim_end_matches('\n').to_string()));
                }
                _ => {}
            }
            return;
        }

        if let Some(html) = self.html_block.as_mut() {
            match event {
                Event::Html(raw) | Event::Text(raw) => html.push_str(&raw),
                Event::End(TagEnd::HtmlBlock) => {
                    let raw = self.html_block.take().unwrap_or_default();
                    for line in strip_html(&raw).lines() {
                        let line = line.trim();
                        if !line.is_empty() {
                            self.blocks.push(Block::Paragraph(vec![Span {
                                text: line.to_string(),
                                ..Span::default()
                            }]));
                        }
                    }
                }
                _ => {}
            }
            return;
        }

        if let Some(tag) = self.hidden_inline {
            match &event {
                Event::InlineHtml(raw) if closes_tag(raw, tag) => {
                    self.hidden_inline = None;
                    return;
                }
                Event::Text(_)
                | Event::Code(_)
                | Event::InlineHtml(_)
                | Event::SoftBreak
                | Event::HardBreak => return,
                // Unclosed element: stop hiding at the end of its block.
                _ => self.hidden_inline = None,
            }
        }

        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush();
                self.heading = Some(level as u8);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush();
                self.heading = None;
            }
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph) => self.flush(),
            Event::Start(Tag::List(_)) => {
                self.flush();
                self.list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => {
                self.flush();
                self.in_item = true;
            }
            Event::End(TagEnd::Item) => {
                self.flush();
                self.in_item = false;
            }
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush();
                self.code_block = Some(String::new());
            }
            Event::Start(Tag::HtmlBlock) => {
                self.flush();
                self.html_block = Some(String::new());
            }
            Event::Start(Tag::Strong) => self.bold += 1,
            Event::End(TagEnd::Strong) => self.bold = self.bold.saturating_sub(1),
            Event::Start(Tag::Emphasis) => self.italic += 1,
            Event::End(TagEnd::Emphasis) => self.italic = self.italic.saturating_sub(1),
            Event::Text(text) => self.text(&text, false),
            Event::Code(code) => self.text(&code, true),
            Event::InlineHtml(raw) | Event::Html(raw) => {
                if let Some(tag) = opens_hidden_tag(&raw) {
                    self.hidden_inline = Some(tag);
                } else if raw.trim_start().to_ascii_lowercase().starts_with("<br") {
                    self.text("\n", false);
                } else {
                    let stripped = strip_html(&raw);
                    if !stripped.is_empty() {
                        self.text(&stripped, false);
                    }
                }
            }
            Event::SoftBreak => self.text(" ", false),
            Event::HardBreak => self.text("\n", false),
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str, code: bool) {
        let bold = self.bold > 0;
        let italic = self.italic > 0;
        match self.spans.last_mut() {
            Some(last) if last.bold == bold && last.italic == italic && last.code == code => {
                last.text.push_str(text);
            }
            _ => self.spans.push(Span {
                text: text.to_string(),
                bold,
                italic,
                code,
            }),
        }
    }

    /// Close the pending spans into a block matching the current context.
    fn flush(&mut self) {
        if self.spans.iter().all(|s| s.text.trim().is_empty()) {
            self.spans.clear();
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        let block = if let Some(level) = self.heading {
            Block::Heading { level, spans }
        } else if self.in_item {
            Block::ListItem {
                depth: self.list_depth.max(1),
                spans,
            }
        } else {
            Block::Paragraph(spans)
        };
        self.blocks.push(block);
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        if let Some(code) = self.code_block.take() {
            self.blocks.push(Block::Code(code));
        }
        self.blocks
    }
}

/// Tags whose content is never shown.
const HIDDEN_TAGS: [&str; 2] = ["script", "style"];

/// Name of a hidden element opened (and not closed) by this inline HTML fragment.
fn opens_hidden_tag(raw: &str) -> Option<&'static str> {
    let lower = raw.trim().to_ascii_lowercase();
    HIDDEN_TAGS.into_iter().find(|tag| {
        lower
            .strip_prefix('<')
            .and_then(|rest| rest.strip_prefix(tag))
            .is_some_and(|rest| rest.starts_with(['>', ' ', '\t', '\n']))
            && !lower.ends_with("/>")
            && !lower.contains(&format!("</{tag}"))
    })
}

fn closes_tag(raw: &str, tag: &str) -> bool {
    raw.trim().to_ascii_lowercase().starts_with(&format!("</{tag}"))
}

/// Remove every tag (and script/style content) while keeping the visible text.
fn strip_html(raw: &str) -> String {
    let cleaned = ammonia::Builder::empty()
        .clean_content_tags(HashSet::from(HIDDEN_TAGS))
        .clean(raw)
        .to_string();
    unescape_entities(&cleaned)
}

/// Undo the minimal escaping applied by the HTML serializer.
fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
