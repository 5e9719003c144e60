//! Inline tokenizer: turns a run of text into flat [`Span`]s.
//!
//! Tokenizing is a fixed sequence of passes. Each pass only splits
//! [`Span::Plain`] spans further and passes every other span through, so
//! spans never nest. Images are extracted before links because the link
//! pattern would otherwise match the `[alt](url)` tail of an image.

use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use crate::block::Span;
use crate::error::{Error, Result};

type Pass = fn(Vec<Span>) -> Result<Vec<Span>>;

const PASSES: [(&str, Pass); 5] = [
    ("bold", split_bold),
    ("italic", split_italic),
    ("code", split_code),
    ("image", split_images),
    ("link", split_links),
];

/// Tokenize inline Markdown into spans.
///
/// Empty input yields no spans.
pub fn tokenize(text: &str) -> Result<Vec<Span>> {
    let mut spans = if text.is_empty() {
        Vec::new()
    } else {
        vec![Span::Plain(text.to_owned())]
    };

    for (name, pass) in PASSES {
        spans = pass(spans)?;
        trace!("{name} pass produced {} spans", spans.len());
    }

    Ok(spans)
}

fn split_bold(spans: Vec<Span>) -> Result<Vec<Span>> {
    split_delimiter(spans, "**", Span::Bold)
}

fn split_italic(spans: Vec<Span>) -> Result<Vec<Span>> {
    split_delimiter(spans, "_", Span::Italic)
}

fn split_code(spans: Vec<Span>) -> Result<Vec<Span>> {
    split_delimiter(spans, "`", Span::Code)
}

/// Split every plain span on `delimiter`, wrapping the odd chunks with `make`.
///
/// Chunks alternate plain/formatted starting with plain. Empty chunks are
/// dropped, so `**a**` yields a single formatted span.
pub fn split_delimiter(
    spans: Vec<Span>,
    delimiter: &'static str,
    make: fn(String) -> Span,
) -> Result<Vec<Span>> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let text = match span {
            Span::Plain(text) => text,
            other => {
                out.push(other);
                continue;
            }
        };

        let chunks: Vec<&str> = text.split(delimiter).collect();
        if chunks.len() % 2 == 0 {
            return Err(Error::UnbalancedDelimiter {
                delimiter,
                text: text.clone(),
            });
        }

        for (i, chunk) in chunks.into_iter().enumerate() {
            if chunk.is_empty() {
                continue;
            }
            if i % 2 == 0 {
                out.push(Span::Plain(chunk.to_owned()));
            } else {
                out.push(make(chunk.to_owned()));
            }
        }
    }

    Ok(out)
}

static IMAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").expect("valid image pattern"));
static IMAGE_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\(").expect("valid image opener"));
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").expect("valid link pattern"));
static LINK_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\(").expect("valid link opener"));

/// `label`/`url` media syntax shared by images and links
struct Media {
    marker: &'static str,
    pattern: &'static LazyLock<Regex>,
    opener: &'static LazyLock<Regex>,
    // `regex` has no lookbehind, so a `!` before the match is checked by hand.
    reject_after_bang: bool,
    make: fn(String, String) -> Span,
}

static IMAGE: Media = Media {
    marker: "image",
    pattern: &IMAGE_PATTERN,
    opener: &IMAGE_OPENER,
    reject_after_bang: false,
    make: image_span,
};

static LINK: Media = Media {
    marker: "link",
    pattern: &LINK_PATTERN,
    opener: &LINK_OPENER,
    reject_after_bang: true,
    make: link_span,
};

fn image_span(alt: String, url: String) -> Span {
    Span::Image { alt, url }
}

fn link_span(text: String, url: String) -> Span {
    Span::Link { text, url }
}

/// Extract `![alt](url)` images from plain spans.
pub fn split_images(spans: Vec<Span>) -> Result<Vec<Span>> {
    split_media(spans, &IMAGE)
}

/// Extract `[text](url)` links from plain spans. A `[` directly after `!` is
/// never a link.
pub fn split_links(spans: Vec<Span>) -> Result<Vec<Span>> {
    split_media(spans, &LINK)
}

fn split_media(spans: Vec<Span>, media: &Media) -> Result<Vec<Span>> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let text = match span {
            Span::Plain(text) => text,
            other => {
                out.push(other);
                continue;
            }
        };

        let mut pos = 0;
        while let Some(found) = find_media(media.pattern, &text, pos, media.reject_after_bang) {
            let leading = &text[pos..found.start];
            ensure_terminated(leading, &text, media)?;
            if !leading.is_empty() {
                out.push(Span::Plain(leading.to_owned()));
            }
            out.push((media.make)(found.label.to_owned(), found.url.to_owned()));
            pos = found.end;
        }

        let trailing = &text[pos..];
        ensure_terminated(trailing, &text, media)?;
        if !trailing.is_empty() {
            out.push(Span::Plain(trailing.to_owned()));
        }
    }

    Ok(out)
}

struct MediaMatch<'t> {
    start: usize,
    end: usize,
    label: &'t str,
    url: &'t str,
}

fn find_media<'t>(
    pattern: &Regex,
    text: &'t str,
    mut from: usize,
    reject_after_bang: bool,
) -> Option<MediaMatch<'t>> {
    loop {
        let caps = pattern.captures_at(text, from)?;
        let whole = caps.get(0)?;
        if reject_after_bang && text[..whole.start()].ends_with('!') {
            // The match starts with an ASCII `[`, so one byte on is a char boundary.
            from = whole.start() + 1;
            continue;
        }
        return Some(MediaMatch {
            start: whole.start(),
            end: whole.end(),
            label: caps.get(1).map_or("", |m| m.as_str()),
            url: caps.get(2).map_or("", |m| m.as_str()),
        });
    }
}

fn ensure_terminated(segment: &str, text: &str, media: &Media) -> Result<()> {
    match find_media(media.opener, segment, 0, media.reject_after_bang) {
        Some(_) => Err(Error::UnterminatedMedia {
            marker: media.marker,
            text: text.to_owned(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn plain(text: &str) -> Span {
        Span::Plain(text.into())
    }

    fn image(alt: &str, url: &str) -> Span {
        Span::Image {
            alt: alt.into(),
            url: url.into(),
        }
    }

    fn link(text: &str, url: &str) -> Span {
        Span::Link {
            text: text.into(),
            url: url.into(),
        }
    }

    #[rstest]
    #[case("**", Span::Bold as fn(String) -> Span, "This is text with a **bold** word", Span::Bold("bold".into()))]
    #[case("_", Span::Italic as fn(String) -> Span, "This is text with a _italic_ word", Span::Italic("italic".into()))]
    #[case("`", Span::Code as fn(String) -> Span, "This is text with a `code block` word", Span::Code("code block".into()))]
    fn delimiter_splits_word(
        #[case] delimiter: &'static str,
        #[case] make: fn(String) -> Span,
        #[case] text: &str,
        #[case] expected: Span,
    ) {
        let spans = split_delimiter(vec![plain(text)], delimiter, make).unwrap();
        assert_eq!(
            spans,
            vec![plain("This is text with a "), expected, plain(" word")]
        );
    }

    #[test]
    fn delimiter_around_whole_text() {
        let spans = split_delimiter(vec![plain("**Bold Word**")], "**", Span::Bold).unwrap();
        assert_eq!(spans, vec![Span::Bold("Bold Word".into())]);
    }

    #[test]
    fn missing_closing_delimiter() {
        let err = split_delimiter(vec![plain("This is text with a **bold word")], "**", Span::Bold)
            .unwrap_err();
        assert!(matches!(err, Error::UnbalancedDelimiter { delimiter: "**", .. }));
    }

    #[test]
    fn delimiter_leaves_formatted_spans_alone() {
        let spans = split_delimiter(
            vec![
                plain("This is a text block"),
                plain("This is text with a **bold word**"),
                Span::Code("`Code`".into()),
                plain("This is text block again"),
            ],
            "**",
            Span::Bold,
        )
        .unwrap();
        assert_eq!(
            spans,
            vec![
                plain("This is a text block"),
                plain("This is text with a "),
                Span::Bold("bold word".into()),
                Span::Code("`Code`".into()),
                plain("This is text block again"),
            ]
        );
    }

    #[test]
    fn images_are_extracted() {
        let spans = split_images(vec![plain(
            "This is text with an image ![first](https://x.dev/a.png) and ![second](https://x.dev/b.webp)",
        )])
        .unwrap();
        assert_eq!(
            spans,
            vec![
                plain("This is text with an image "),
                image("first", "https://x.dev/a.png"),
                plain(" and "),
                image("second", "https://x.dev/b.webp"),
            ]
        );
    }

    #[rstest]
    #[case("![alt]()", image("alt", ""))]
    #[case("![](https://example.com/img.png)", image("", "https://example.com/img.png"))]
    fn image_parts_may_be_empty(#[case] text: &str, #[case] expected: Span) {
        assert_eq!(split_images(vec![plain(text)]).unwrap(), vec![expected]);
    }

    #[test]
    fn links_are_extracted() {
        let spans = split_links(vec![plain(
            "This is text with a link [to docs](https://docs.rs) and [to crates](https://crates.io/@me)",
        )])
        .unwrap();
        assert_eq!(
            spans,
            vec![
                plain("This is text with a link "),
                link("to docs", "https://docs.rs"),
                plain(" and "),
                link("to crates", "https://crates.io/@me"),
            ]
        );
    }

    #[test]
    fn link_pass_skips_image_syntax() {
        let spans = split_links(vec![plain("see ![pic](a.png) and [site](b.html)")]).unwrap();
        assert_eq!(
            spans,
            vec![
                plain("see ![pic](a.png) and "),
                link("site", "b.html"),
            ]
        );
    }

    #[test]
    fn link_after_bang_inside_brackets() {
        // The first `[` follows `!`, the second does not.
        let spans = split_links(vec![plain("![x[y](z)")]).unwrap();
        assert_eq!(spans, vec![plain("![x"), link("y", "z")]);
    }

    #[test]
    fn media_pass_without_matches() {
        let spans = split_links(vec![plain("This is text with a link ")]).unwrap();
        assert_eq!(spans, vec![plain("This is text with a link ")]);
        assert_eq!(split_images(vec![]).unwrap(), vec![]);
    }

    #[rstest]
    #[case("an ![image](http://x/y.png")]
    #[case("![a](b) then ![c](d")]
    fn unterminated_image(#[case] text: &str) {
        let err = split_images(vec![plain(text)]).unwrap_err();
        assert!(matches!(err, Error::UnterminatedMedia { marker: "image", .. }));
    }

    #[test]
    fn unterminated_link() {
        let err = tokenize("a [link](https://x.dev").unwrap_err();
        assert!(matches!(err, Error::UnterminatedMedia { marker: "link", .. }));
    }

    #[test]
    fn brackets_without_url_are_text() {
        assert_eq!(tokenize("a [note] here").unwrap(), vec![plain("a [note] here")]);
    }

    #[test]
    fn tokenize_everything() {
        let spans = tokenize(
            "This is **text** with an _italic_ word and a `code block` and an ![wizard](https://i.imgur.com/fJRm4Vk.jpeg) and a [link](https://boot.dev)",
        )
        .unwrap();
        assert_eq!(
            spans,
            vec![
                plain("This is "),
                Span::Bold("text".into()),
                plain(" with an "),
                Span::Italic("italic".into()),
                plain(" word and a "),
                Span::Code("code block".into()),
                plain(" and an "),
                image("wizard", "https://i.imgur.com/fJRm4Vk.jpeg"),
                plain(" and a "),
                link("link", "https://boot.dev"),
            ]
        );
    }

    #[test]
    fn tokenize_empty() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn tokenize_repeated_images() {
        let spans = tokenize(&"![wizard](https://i.imgur.com/fJRm4Vk.jpeg)".repeat(5)).unwrap();
        assert_eq!(
            spans,
            vec![image("wizard", "https://i.imgur.com/fJRm4Vk.jpeg"); 5]
        );
    }

    #[test]
    fn tokenize_single_image() {
        let spans = tokenize("![alt](http://x/y.png)").unwrap();
        assert_eq!(spans, vec![image("alt", "http://x/y.png")]);
        assert_eq!(spans[0].text(), "alt");
        assert_eq!(spans[0].target(), Some("http://x/y.png"));
    }

    #[rstest]
    #[case("**bold")]
    #[case("an _odd")]
    #[case("`a` and `b")]
    fn tokenize_unbalanced(#[case] text: &str) {
        assert!(matches!(
            tokenize(text),
            Err(Error::UnbalancedDelimiter { .. })
        ));
    }

    #[test]
    fn span_text_reconstructs_content() {
        let spans = tokenize("plain **bold** _it_ `code` [here](u) ![pic](v) end").unwrap();
        let joined: String = spans.iter().map(Span::text).collect();
        assert_eq!(joined, "plain bold it code here pic end");
    }

    #[test]
    fn tokenize_is_deterministic() {
        let text = "**a** _b_ [c](d)";
        assert_eq!(tokenize(text).unwrap(), tokenize(text).unwrap());
    }
}
