//! Helpers for reading and writing the serialized HTML markup.
//!
//! The markup host keeps one block per line. A line is either bare text or
//! wrapped in exactly one of the block wrappers described by [`BlockKind`].
//! Inline formatting is plain nested tags inside a line.

use std::fmt::{self, Write};
use std::ops::Range;

use pulldown_cmark_escape::{escape_href, escape_html};
use smol_str::SmolStr;

use crate::commands::{Alignment, FormatCommand, HeadingLevel};

/// Fixed two-by-two table inserted by the toolbar.
pub const TABLE_SKELETON: &str = "<table><tbody><tr><td>Cell 1</td><td>Cell 2</td></tr><tr><td>Cell 3</td><td>Cell 4</td></tr></tbody></table>";

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "wbr"];

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "blockquote", "pre", "div", "table",
];

/// A matched open/close tag pair. Offsets are chars into the scanned markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: SmolStr,
    pub open: Range<usize>,
    pub close: Range<usize>,
}

impl Element {
    pub fn content(&self) -> Range<usize> {
        self.open.end..self.close.start
    }
}

/// Scan markup for matched elements.
///
/// Unclosed tags are dropped; a stray close tag closes the nearest open tag
/// with the same name.
pub fn elements(markup: &str) -> Vec<Element> {
    let chars: Vec<char> = markup.chars().collect();
    let mut stack: Vec<(SmolStr, Range<usize>)> = Vec::new();
    let mut found = Vec::new();

    let mut pos = 0;
    while pos < chars.len() {
        if chars[pos] != '<' {
            pos += 1;
            continue;
        }
        let Some(len) = chars[pos..].iter().position(|c| *c == '>') else {
            break;
        };
        let tag_end = pos + len + 1;
        let body: String = chars[pos + 1..tag_end - 1].iter().collect();
        let span = pos..tag_end;
        pos = tag_end;

        if body.starts_with('!') || body.starts_with('?') || body.ends_with('/') {
            continue;
        }
        if let Some(rest) = body.strip_prefix('/') {
            let name = tag_name(rest);
            if let Some(idx) = stack.iter().rposition(|(n, _)| *n == name) {
                stack.truncate(idx + 1);
                let Some((name, open)) = stack.pop() else {
                    continue;
                };
                found.push(Element {
                    name,
                    open,
                    close: span,
                });
            }
            continue;
        }

        let name = tag_name(&body);
        if !name.is_empty() && !VOID_ELEMENTS.contains(&name.as_str()) {
            stack.push((name, span));
        }
    }

    found
}

fn tag_name(body: &str) -> SmolStr {
    let name: String = body
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '/')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    SmolStr::from(name)
}

/// Innermost element named one of `tags` whose content fully contains `range`.
pub fn enclosing_element(markup: &str, range: Range<usize>, tags: &[&str]) -> Option<Element> {
    elements(markup)
        .into_iter()
        .filter(|el| tags.contains(&el.name.as_str()))
        .filter(|el| el.open.end <= range.start && range.end <= el.close.start)
        .max_by_key(|el| el.open.start)
}

/// Put each top-level block element on its own line.
///
/// Browsers serialize blocks back to back (`<p>a</p><p>b</p>`); splitting
/// them lets line-based block commands see one block at a time.
pub fn one_block_per_line(markup: &str) -> String {
    let all = elements(markup);
    let mut blocks: Vec<&Element> = all
        .iter()
        .filter(|el| BLOCK_ELEMENTS.contains(&el.name.as_str()))
        .filter(|el| {
            !all.iter().any(|outer| {
                outer.open.start < el.open.start && el.close.end <= outer.close.end
            })
        })
        .collect();
    blocks.sort_by_key(|el| el.open.start);

    let breaks: Vec<usize> = blocks
        .windows(2)
        .filter(|pair| pair[0].close.end == pair[1].open.start)
        .map(|pair| pair[0].close.end)
        .collect();
    if breaks.is_empty() {
        return markup.to_owned();
    }

    let mut out = String::with_capacity(markup.len() + breaks.len());
    for (idx, c) in markup.chars().enumerate() {
        if breaks.contains(&idx) {
            out.push('\n');
        }
        out.push(c);
    }
    out
}

/// Block wrappers a line can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading(HeadingLevel),
    UnorderedList,
    OrderedList,
    BlockQuote,
    Preformatted,
    Aligned(Alignment),
}

impl BlockKind {
    const CANDIDATES: [BlockKind; 12] = [
        Self::Aligned(Alignment::Left),
        Self::Aligned(Alignment::Center),
        Self::Aligned(Alignment::Right),
        Self::Aligned(Alignment::Justify),
        Self::Paragraph,
        Self::Heading(HeadingLevel::H1),
        Self::Heading(HeadingLevel::H2),
        Self::Heading(HeadingLevel::H3),
        Self::UnorderedList,
        Self::OrderedList,
        Self::BlockQuote,
        Self::Preformatted,
    ];

    /// The block a formatting command produces, if it is a block command.
    pub fn for_command(command: FormatCommand) -> Option<Self> {
        match command {
            FormatCommand::Heading(level) => Some(Self::Heading(level)),
            FormatCommand::UnorderedList => Some(Self::UnorderedList),
            FormatCommand::OrderedList => Some(Self::OrderedList),
            FormatCommand::Align(alignment) => Some(Self::Aligned(alignment)),
            FormatCommand::BlockQuote => Some(Self::BlockQuote),
            FormatCommand::Preformatted => Some(Self::Preformatted),
            _ => None,
        }
    }

    pub fn open_tag(self) -> String {
        match self {
            Self::Paragraph => "<p>".to_owned(),
            Self::Heading(level) => format!("<{}>", level.tag()),
            Self::UnorderedList => "<ul><li>".to_owned(),
            Self::OrderedList => "<ol><li>".to_owned(),
            Self::BlockQuote => "<blockquote>".to_owned(),
            Self::Preformatted => "<pre>".to_owned(),
            Self::Aligned(alignment) => {
                format!("<p style=\"text-align: {}\">", alignment.css_value())
            }
        }
    }

    pub fn close_tag(self) -> &'static str {
        match self {
            Self::Paragraph | Self::Aligned(_) => "</p>",
            Self::Heading(HeadingLevel::H1) => "</h1>",
            Self::Heading(HeadingLevel::H2) => "</h2>",
            Self::Heading(HeadingLevel::H3) => "</h3>",
            Self::UnorderedList => "</li></ul>",
            Self::OrderedList => "</li></ol>",
            Self::BlockQuote => "</blockquote>",
            Self::Preformatted => "</pre>",
        }
    }

    pub fn wrap(self, inner: &str) -> String {
        format!("{}{}{}", self.open_tag(), inner, self.close_tag())
    }
}

/// A line split into its block wrapper and inner content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBlock {
    pub kind: Option<BlockKind>,
    /// Chars taken by the open tag.
    pub prefix_len: usize,
    /// Inner markup between the wrapper tags.
    pub inner: String,
}

/// Identify the block wrapper of a single line.
pub fn parse_line(line: &str) -> LineBlock {
    for kind in BlockKind::CANDIDATES {
        let open = kind.open_tag();
        let close = kind.close_tag();
        let Some(rest) = line.strip_prefix(open.as_str()) else {
            continue;
        };
        let Some(inner) = rest.strip_suffix(close) else {
            continue;
        };
        let several_items = matches!(kind, BlockKind::UnorderedList | BlockKind::OrderedList)
            && inner.contains("</li>");
        if inner.contains(close) || several_items {
            continue;
        }
        return LineBlock {
            kind: Some(kind),
            prefix_len: open.chars().count(),
            inner: inner.to_owned(),
        };
    }

    LineBlock {
        kind: None,
        prefix_len: 0,
        inner: line.to_owned(),
    }
}

/// Escape text for use as element content.
pub fn escape_text(text: &str) -> Result<String, fmt::Error> {
    let mut out = String::with_capacity(text.len());
    escape_html(&mut out, text)?;
    Ok(out)
}

/// Escape a URL for use inside a double-quoted `href`/`src` attribute.
pub fn escape_url(url: &str) -> Result<String, fmt::Error> {
    let mut out = String::with_capacity(url.len());
    escape_href(&mut out, url)?;
    Ok(out)
}

/// `<a href="URL">inner</a>`; the escaped URL doubles as text when `inner` is empty.
pub fn anchor(url: &str, inner: &str) -> Result<String, fmt::Error> {
    let href = escape_url(url)?;
    let mut out = String::new();
    if inner.is_empty() {
        write!(out, "<a href=\"{}\">{}</a>", href, escape_text(url)?)?;
    } else {
        write!(out, "<a href=\"{}\">{}</a>", href, inner)?;
    }
    Ok(out)
}

pub fn image(url: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "<img src=\"{}\" alt=\"\">", escape_url(url)?)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_match_nested_tags() {
        let els = elements("<p><strong>a<em>b</em></strong></p>");
        let names: Vec<&str> = els.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["em", "strong", "p"]);

        let strong = &els[1];
        assert_eq!(strong.open, 3..11);
        assert_eq!(strong.close, 22..31);
    }

    #[test]
    fn test_elements_skip_void_and_unclosed() {
        let els = elements("<p>x<br><img src=\"a\" alt=\"\"><b>y</p>");
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].name, "p");
    }

    #[test]
    fn test_enclosing_element_prefers_innermost() {
        let markup = "<b>x<strong>word</strong></b>";
        let el = enclosing_element(markup, 15..15, &["strong", "b"]).unwrap();
        assert_eq!(el.name, "strong");
        assert!(enclosing_element(markup, 1..1, &["strong", "b"]).is_none());
    }

    #[test]
    fn test_parse_line_blocks() {
        let block = parse_line("<h2>Title</h2>");
        assert_eq!(block.kind, Some(BlockKind::Heading(HeadingLevel::H2)));
        assert_eq!(block.prefix_len, 4);
        assert_eq!(block.inner, "Title");

        let block = parse_line("<p style=\"text-align: center\">x</p>");
        assert_eq!(block.kind, Some(BlockKind::Aligned(Alignment::Center)));
        assert_eq!(block.inner, "x");

        let block = parse_line("<ul><li>item</li></ul>");
        assert_eq!(block.kind, Some(BlockKind::UnorderedList));

        let block = parse_line("plain <em>text</em>");
        assert_eq!(block.kind, None);
        assert_eq!(block.inner, "plain <em>text</em>");
    }

    #[test]
    fn test_parse_line_rejects_two_blocks() {
        let block = parse_line("<p>a</p><p>b</p>");
        assert_eq!(block.kind, None);
    }

    #[test]
    fn test_one_block_per_line() {
        assert_eq!(
            one_block_per_line("<p>first</p><p>second</p><h2>third</h2>"),
            "<p>first</p>\n<p>second</p>\n<h2>third</h2>"
        );
        // Nested blocks and inline runs stay put.
        assert_eq!(
            one_block_per_line("<div><p>a</p><p>b</p></div>"),
            "<div><p>a</p><p>b</p></div>"
        );
        assert_eq!(
            one_block_per_line("<strong>a</strong><em>b</em>"),
            "<strong>a</strong><em>b</em>"
        );
        assert_eq!(one_block_per_line("<p>a</p>\n<p>b</p>"), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn test_parse_line_rejects_multi_item_list() {
        assert_eq!(parse_line("<ul><li>a</li><li>b</li></ul>").kind, None);
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & c").unwrap(), "a &lt; b &amp; c");
        assert_eq!(escape_url("/x y").unwrap(), "/x%20y");
    }

    #[test]
    fn test_anchor_escapes_url() {
        assert_eq!(
            anchor("https://a.example/?q=1&r=\"2\"", "").unwrap(),
            "<a href=\"https://a.example/?q=1&amp;r=%222%22\">https://a.example/?q=1&amp;r=&quot;2&quot;</a>"
        );
        assert_eq!(
            anchor("https://a.example", "<b>site</b>").unwrap(),
            "<a href=\"https://a.example\"><b>site</b></a>"
        );
        assert_eq!(
            image("https://img.example/cat.png").unwrap(),
            "<img src=\"https://img.example/cat.png\" alt=\"\">"
        );
    }
}
