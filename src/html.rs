use log::debug;

use crate::block::{BlockKind, Span};
use crate::error::{Error, Result};
use crate::inline::tokenize;
use crate::node::Node;
use crate::parser::{FENCE, classify, split_blocks};

/// Build the node tree for a whole document: a `div` holding one node per block.
pub fn build_document(markdown: &str) -> Result<Node> {
    let blocks = split_blocks(markdown);
    let mut children = Vec::with_capacity(blocks.len());

    for (i, block) in blocks.into_iter().enumerate() {
        let kind = classify(block);
        debug!("block {i}: {kind:?}");
        children.push(kind_to_node(kind, block)?);
    }

    Ok(Node::parent("div", children))
}

/// Convert a single block into its node subtree.
pub fn block_to_node(block: &str) -> Result<Node> {
    kind_to_node(classify(block), block)
}

fn kind_to_node(kind: BlockKind, block: &str) -> Result<Node> {
    match kind {
        BlockKind::Paragraph => paragraph_to_node(block),
        BlockKind::Heading => heading_to_node(block),
        BlockKind::Code => code_to_node(block),
        BlockKind::Quote => quote_to_node(block),
        BlockKind::UnorderedList => unordered_list_to_node(block),
        BlockKind::OrderedList => ordered_list_to_node(block),
    }
}

fn paragraph_to_node(block: &str) -> Result<Node> {
    let text = block.lines().collect::<Vec<_>>().join(" ");
    Ok(Node::parent("p", text_to_children(&text)?))
}

/// Strips the `#` markers and the whitespace after them. The remaining content
/// is trimmed, so `#  Title` and `# Title` both give `<h1>Title</h1>`.
fn heading_to_node(block: &str) -> Result<Node> {
    let invalid = || Error::InvalidHeading {
        block: block.to_owned(),
    };

    let level = block.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return Err(invalid());
    }

    // Markers are ASCII, so `level` is also a byte offset.
    let mut rest = block[level..].chars();
    if !rest.next().is_some_and(char::is_whitespace) {
        return Err(invalid());
    }
    let content = rest.as_str().trim();
    if content.is_empty() {
        return Err(invalid());
    }

    Ok(Node::parent(format!("h{level}"), text_to_children(content)?))
}

/// The interior between the fences is kept verbatim, minus the newline that
/// ends the opening fence line. Fences that overlap (```` ``` ```` alone)
/// leave an empty interior.
fn code_to_node(block: &str) -> Result<Node> {
    if !block.starts_with(FENCE) || !block.ends_with(FENCE) {
        return Err(Error::InvalidCodeBlock {
            block: block.to_owned(),
        });
    }

    let inner = block
        .get(FENCE.len()..block.len() - FENCE.len())
        .unwrap_or_default();
    let content = inner.strip_prefix('\n').unwrap_or(inner);

    Ok(Node::parent("pre", vec![Node::leaf("code", content)]))
}

fn quote_to_node(block: &str) -> Result<Node> {
    let mut lines = Vec::new();
    for line in block.lines() {
        let Some(rest) = line.strip_prefix('>') else {
            return Err(Error::InvalidQuote {
                line: line.to_owned(),
            });
        };
        lines.push(rest.trim());
    }

    let text = lines.join(" ");
    Ok(Node::parent("blockquote", text_to_children(&text)?))
}

fn unordered_list_to_node(block: &str) -> Result<Node> {
    let items = block
        .lines()
        .map(|line| match line.strip_prefix("- ") {
            Some(rest) => list_item(rest),
            None => Err(not_a_list(block)),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Node::parent("ul", items))
}

fn ordered_list_to_node(block: &str) -> Result<Node> {
    let items = block
        .lines()
        .map(|line| match line.split_once(". ") {
            Some((_, rest)) => list_item(rest),
            None => Err(not_a_list(block)),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Node::parent("ol", items))
}

fn list_item(text: &str) -> Result<Node> {
    Ok(Node::parent("li", text_to_children(text)?))
}

fn not_a_list(block: &str) -> Error {
    Error::InvalidBlockType {
        block: block.to_owned(),
    }
}

fn text_to_children(text: &str) -> Result<Vec<Node>> {
    Ok(tokenize(text)?.into_iter().map(span_to_node).collect())
}

/// Map an inline span onto the leaf that renders it.
pub fn span_to_node(span: Span) -> Node {
    match span {
        Span::Plain(text) => Node::text(text),
        Span::Bold(text) => Node::leaf("b", text),
        Span::Italic(text) => Node::leaf("i", text),
        Span::Code(text) => Node::leaf("code", text),
        Span::Link { text, url } => Node::leaf("a", text).with_attribute("href", url),
        Span::Image { alt, url } => Node::leaf("img", "")
            .with_attribute("src", url)
            .with_attribute("alt", alt),
    }
}
