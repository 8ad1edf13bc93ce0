//! Markdown to ratatui styled text.
//!
//! Tool output is markdown more often than not, so the output pane renders
//! it instead of dumping raw text: headings, paragraphs, ordered and
//! unordered lists, block and inline code, blockquotes, and bold emphasis.
//! Colors come from the active [`Theme`], never from hardcoded values.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Theme;

/// Render a markdown document into styled lines for a `Paragraph`.
pub fn render(md: &str, theme: Theme) -> Vec<Line<'static>> {
    let parser = Parser::new_ext(md, Options::ENABLE_STRIKETHROUGH);
    let mut writer = LineWriter::new(theme);
    for event in parser {
        writer.handle(event);
    }
    writer.finish()
}

#[derive(Clone)]
enum ListMarker {
    Bullet,
    Numbered(u64),
}

struct LineWriter {
    theme: Theme,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    bold: bool,
    heading_level: u8,
    code_block: bool,
    quote_depth: usize,
    lists: Vec<ListMarker>,
}

impl LineWriter {
    fn new(theme: Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            spans: Vec::new(),
            bold: false,
            heading_level: 0,
            code_block: false,
            quote_depth: 0,
            lists: Vec::new(),
        }
    }

    fn style(&self) -> Style {
        if self.code_block {
            return Style::default().fg(self.theme.code());
        }
        if self.heading_level > 0 {
            let color = if self.heading_level == 1 {
                self.theme.heading()
            } else {
                self.theme.accent()
            };
            return Style::default().fg(color).add_modifier(Modifier::BOLD);
        }
        let mut style = Style::default().fg(self.theme.text());
        if self.quote_depth > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    fn break_line(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    fn blank_line(&mut self) {
        self.lines.push(Line::from(""));
    }

    /// Prefix inserted at the start of quoted or code lines.
    fn line_prefix(&mut self) {
        if self.quote_depth > 0 {
            self.spans.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                Style::default().fg(self.theme.dim()),
            ));
        } else if self.code_block {
            self.spans.push(Span::raw("    "));
        }
    }

    fn text(&mut self, text: &str) {
        let style = self.style();
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.break_line();
                self.line_prefix();
            }
            if !piece.is_empty() {
                self.spans.push(Span::styled(piece.to_string(), style));
            }
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.spans.push(Span::styled(
                    code.to_string(),
                    Style::default()
                        .fg(self.theme.code())
                        .add_modifier(Modifier::BOLD),
                ));
            }
            Event::SoftBreak => self.spans.push(Span::raw(" ")),
            Event::HardBreak => {
                self.break_line();
                self.line_prefix();
            }
            Event::Rule => {
                self.break_line();
                self.lines.push(Line::from(Span::styled(
                    "────────────────────",
                    Style::default().fg(self.theme.dim()),
                )));
                self.blank_line();
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => self.line_prefix(),
            Tag::Heading { level, .. } => {
                self.heading_level = level as u8;
            }
            Tag::Strong => self.bold = true,
            Tag::CodeBlock(_) => {
                if !self.spans.is_empty() {
                    self.break_line();
                }
                self.code_block = true;
                self.line_prefix();
            }
            Tag::BlockQuote(_) => {
                if !self.spans.is_empty() {
                    self.break_line();
                }
                self.quote_depth += 1;
            }
            Tag::List(start) => {
                if self.lists.is_empty() && !self.spans.is_empty() {
                    self.break_line();
                }
                self.lists.push(match start {
                    Some(n) => ListMarker::Numbered(n),
                    None => ListMarker::Bullet,
                });
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len());
                let marker = match self.lists.last_mut() {
                    Some(ListMarker::Bullet) => format!("{}- ", indent),
                    Some(ListMarker::Numbered(n)) => {
                        let s = format!("{}{}. ", indent, n);
                        *n += 1;
                        s
                    }
                    None => indent,
                };
                self.spans
                    .push(Span::styled(marker, Style::default().fg(self.theme.accent())));
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.break_line();
                if self.quote_depth == 0 {
                    self.blank_line();
                }
            }
            TagEnd::Heading(_) => {
                self.heading_level = 0;
                self.break_line();
                self.blank_line();
            }
            TagEnd::Strong => self.bold = false,
            TagEnd::CodeBlock => {
                self.code_block = false;
                if !self.spans.is_empty() {
                    self.break_line();
                }
                self.blank_line();
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    self.blank_line();
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => self.break_line(),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.spans.is_empty() {
            self.break_line();
        }
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}
