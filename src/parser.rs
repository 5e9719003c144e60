use std::sync::LazyLock;

use regex::Regex;

use crate::block::BlockKind;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s").expect("valid heading pattern"));

pub(crate) const FENCE: &str = "```";

/// Split markdown text into trimmed, non-empty blocks.
///
/// Only an exact blank line (`"\n\n"`) separates blocks. Longer runs of
/// newlines leave whitespace-only pieces behind, which are dropped.
pub fn split_blocks(markdown: &str) -> Vec<&str> {
    markdown
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Classify a block. Rules are checked in priority order and the first
/// match wins; anything unmatched is a paragraph.
pub fn classify(block: &str) -> BlockKind {
    if HEADING.is_match(block) {
        return BlockKind::Heading;
    }
    if block.starts_with(FENCE) && block.ends_with(FENCE) {
        return BlockKind::Code;
    }

    let lines: Vec<&str> = block.lines().collect();
    if all_lines_start_with(&lines, ">") {
        BlockKind::Quote
    } else if all_lines_start_with(&lines, "- ") {
        BlockKind::UnorderedList
    } else if is_ordered_list(&lines) {
        BlockKind::OrderedList
    } else {
        BlockKind::Paragraph
    }
}

fn all_lines_start_with(lines: &[&str], prefix: &str) -> bool {
    lines.iter().all(|line| line.starts_with(prefix))
}

/// Lines must be numbered `1. `, `2. `, ... with no gaps.
fn is_ordered_list(lines: &[&str]) -> bool {
    lines
        .iter()
        .enumerate()
        .all(|(i, line)| line.starts_with(&format!("{}. ", i + 1)))
}
