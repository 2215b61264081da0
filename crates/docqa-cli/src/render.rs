//! Terminal rendering of timeline messages.

use colored::{ColoredString, Colorize};
use docqa_core::registry::DocumentRegistry;
use docqa_core::session::{Message, MessageRole};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};

/// Renders one message with its 1-based timeline position.
///
/// `visible_citations` is `Some` only when the message's sources are
/// expanded; otherwise a collapsed footer is shown for messages that have
/// citations.
pub fn render_message(
    position: usize,
    message: &Message,
    visible_citations: Option<&[String]>,
) -> String {
    let mut out = String::new();
    match message.role {
        MessageRole::User => {
            out.push_str(&format!("[{}] > {}", position, message.content.trim()).green().to_string());
            out.push('\n');
        }
        MessageRole::Assistant => {
            out.push_str(&format!("[{}]", position).bright_magenta().to_string());
            out.push('\n');
            out.push_str(&render_markdown(&message.content));
            out.push_str(&render_sources(position, message, visible_citations));
        }
    }
    out
}

fn render_sources(
    position: usize,
    message: &Message,
    visible_citations: Option<&[String]>,
) -> String {
    let Some(citations) = message.citations.as_ref().filter(|c| !c.is_empty()) else {
        return String::new();
    };

    match visible_citations {
        Some(shown) => {
            let mut out = format!("Sources ({}):", citations.len())
                .bright_yellow()
                .to_string();
            out.push('\n');
            for (index, text) in shown.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", index + 1, text).yellow().to_string());
            }
            out
        }
        None => {
            let mut out = format!(
                "Sources ({}): /sources {} to expand",
                citations.len(),
                position
            )
            .bright_black()
            .to_string();
            out.push('\n');
            out
        }
    }
}

pub fn render_documents(registry: &DocumentRegistry) -> String {
    if registry.is_empty() {
        return format!("{}\n", "No documents uploaded yet.".bright_black());
    }
    let mut out = format!("{}\n", format!("Documents ({}):", registry.len()).bright_yellow());
    for record in registry.documents() {
        out.push_str(&format!("  - {}\n", record.filename));
    }
    out
}

/// Converts markdown into coloured terminal text.
///
/// Headings, emphasis, inline code, code blocks and lists get distinct
/// styling; everything else is passed through as plain text.
pub fn render_markdown(source: &str) -> String {
    let mut out = String::new();
    let mut style = Style::default();
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new(source) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                style.heading = Some(level);
            }
            Event::End(TagEnd::Heading(_)) => {
                style.heading = None;
                out.push_str("\n\n");
            }
            Event::Start(Tag::Emphasis) => style.italic += 1,
            Event::End(TagEnd::Emphasis) => style.italic = style.italic.saturating_sub(1),
            Event::Start(Tag::Strong) => style.bold += 1,
            Event::End(TagEnd::Strong) => style.bold = style.bold.saturating_sub(1),
            Event::Start(Tag::CodeBlock(kind)) => {
                style.code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        out.push_str(&format!("  [{}]\n", lang).bright_black().to_string());
                    }
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                style.code_block = false;
                out.push('\n');
            }
            Event::Start(Tag::List(start)) => {
                if lists.is_empty() && !out.is_empty() && !out.ends_with("\n\n") {
                    ensure_newline(&mut out);
                }
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                ensure_newline(&mut out);
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                let bullet = match lists.last_mut() {
                    Some(Some(n)) => {
                        let bullet = format!("{}.", n);
                        *n += 1;
                        bullet
                    }
                    _ => "•".to_string(),
                };
                out.push_str(&format!("{}{} ", indent, bullet));
            }
            Event::End(TagEnd::Item) => ensure_newline(&mut out),
            Event::End(TagEnd::Paragraph) => {
                if lists.is_empty() {
                    out.push_str("\n\n");
                }
            }
            Event::Text(text) => {
                if style.code_block {
                    for line in text.lines() {
                        out.push_str(&format!("    {}", line).cyan().to_string());
                        out.push('\n');
                    }
                } else {
                    out.push_str(&style.apply(&text).to_string());
                }
            }
            Event::Code(code) => out.push_str(&code.yellow().to_string()),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => out.push_str(&format!("{}\n\n", "─".repeat(40).bright_black())),
            _ => {}
        }
    }

    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

fn ensure_newline(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

#[derive(Default)]
struct Style {
    heading: Option<HeadingLevel>,
    bold: usize,
    italic: usize,
    code_block: bool,
}

impl Style {
    fn apply(&self, text: &str) -> ColoredString {
        let mut styled = text.bright_blue();
        if let Some(level) = self.heading {
            styled = styled.bold();
            if level == HeadingLevel::H1 {
                styled = styled.underline();
            }
        }
        if self.bold > 0 {
            styled = styled.bold();
        }
        if self.italic > 0 {
            styled = styled.italic();
        }
        styled
    }
}
