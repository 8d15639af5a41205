//! Message text → ratatui `Text` renderer.
//!
//! Replies may contain a small amount of markup: `**bold**` spans, HTML
//! anchors (`<a href="...">label</a>`) and newlines. Everything is treated as
//! untrusted:
//!
//! 1. [`sanitize`] drops control characters (no terminal escape sequences)
//!    and every HTML tag except anchors. `<br>` becomes a newline.
//! 2. [`format`] splits the result into [`Fragment`]s.
//! 3. [`to_text`] styles the fragments for display.
//!
//! Only `http`, `https` and `mailto` links survive as links; anything else
//! is shown as its plain label.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use regex::Regex;

/// Any opening or closing HTML tag, capturing the tag name.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("valid tag regex"));

/// Anchor tags only, used to clean up unpaired `<a>`/`</a>` left in plain text.
static ANCHOR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?a\b[^>]*>").expect("valid anchor regex"));

/// Inline tokens, tried left to right at each position: bold, link, paragraph break, line break.
static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\*\*(?P<bold>.*?)\*\*",
        r#"|(?i:<a\s+(?:[^>]*?\s+)?href=")(?P<url>[^"]*)"[^>]*>(?P<label>.*?)(?i:</a>)"#,
        r"|(?P<para>\n\n)",
        r"|(?P<br>\n)",
    ))
    .expect("valid inline regex")
});

const SAFE_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];

/// A piece of formatted message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Bold(String),
    Link { url: String, label: String },
    LineBreak,
    ParagraphBreak,
}

/// Removes control characters and every non-anchor HTML tag.
pub fn sanitize(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n");
    let printable: String = normalized
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    TAG.replace_all(&printable, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        if name.eq_ignore_ascii_case("a") {
            caps[0].to_string()
        } else if name.eq_ignore_ascii_case("br") {
            "\n".to_string()
        } else {
            String::new()
        }
    })
    .into_owned()
}

fn strip_anchors(text: &str) -> String {
    ANCHOR_TAG.replace_all(text, "").into_owned()
}

fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    SAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

fn push_text(out: &mut Vec<Fragment>, text: &str) {
    let cleaned = strip_anchors(text);
    if cleaned.is_empty() {
        return;
    }
    // Merge with a preceding plain run, e.g. an unsafe link's label.
    if let Some(Fragment::Text(prev)) = out.last_mut() {
        prev.push_str(&cleaned);
    } else {
        out.push(Fragment::Text(cleaned));
    }
}

/// Sanitizes `raw` and splits it into display fragments.
pub fn format(raw: &str) -> Vec<Fragment> {
    let text = sanitize(raw);
    let mut out = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(&text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut out, &text[last..whole.start()]);
        last = whole.end();

        if let Some(bold) = caps.name("bold") {
            let inner = strip_anchors(bold.as_str());
            if !inner.is_empty() {
                out.push(Fragment::Bold(inner));
            }
        } else if let (Some(url), Some(label)) = (caps.name("url"), caps.name("label")) {
            let label = strip_anchors(label.as_str());
            let url = url.as_str().trim().to_string();
            if is_safe_url(&url) {
                let label = if label.is_empty() { url.clone() } else { label };
                out.push(Fragment::Link { url, label });
            } else {
                push_text(&mut out, &label);
            }
        } else if caps.name("para").is_some() {
            out.push(Fragment::ParagraphBreak);
        } else if caps.name("br").is_some() {
            out.push(Fragment::LineBreak);
        }
    }
    push_text(&mut out, &text[last..]);

    out
}

/// Styles fragments on top of `base`.
///
/// Bold adds `BOLD`; links are blue and underlined, followed by the URL in
/// dark gray when it differs from the label.
pub fn to_text(fragments: &[Fragment], base: Style) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = vec![Line::default()];

    for fragment in fragments {
        match fragment {
            Fragment::Text(s) => push_span(&mut lines, Span::styled(s.clone(), base)),
            Fragment::Bold(s) => {
                push_span(&mut lines, Span::styled(s.clone(), base.add_modifier(Modifier::BOLD)))
            }
            Fragment::Link { url, label } => {
                let link_style = base.fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
                push_span(&mut lines, Span::styled(label.clone(), link_style));
                if url != label {
                    push_span(
                        &mut lines,
                        Span::styled(format!(" ({url})"), Style::default().fg(Color::DarkGray)),
                    );
                }
            }
            Fragment::LineBreak => lines.push(Line::default()),
            Fragment::ParagraphBreak => {
                lines.push(Line::default());
                lines.push(Line::default());
            }
        }
    }

    Text::from(lines)
}

fn push_span(lines: &mut Vec<Line<'static>>, span: Span<'static>) {
    if let Some(line) = lines.last_mut() {
        line.push_span(span);
    } else {
        lines.push(Line::from(vec![span]));
    }
}

/// Convenience: sanitize, format and style in one go.
pub fn render(raw: &str, base: Style) -> Text<'static> {
    to_text(&format(raw), base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Fragment {
        Fragment::Text(s.to_string())
    }

    #[test]
    fn bold_then_paragraph() {
        assert_eq!(
            format("**hi** there\n\nnext"),
            vec![
                Fragment::Bold("hi".to_string()),
                text(" there"),
                Fragment::ParagraphBreak,
                text("next"),
            ]
        );
    }

    #[test]
    fn single_newline_is_line_break() {
        assert_eq!(format("a\nb"), vec![text("a"), Fragment::LineBreak, text("b")]);
    }

    #[test]
    fn triple_newline_is_paragraph_then_line() {
        assert_eq!(
            format("a\n\n\nb"),
            vec![text("a"), Fragment::ParagraphBreak, Fragment::LineBreak, text("b")]
        );
    }

    #[test]
    fn bold_is_non_greedy() {
        assert_eq!(
            format("**a** and **b**"),
            vec![
                Fragment::Bold("a".to_string()),
                text(" and "),
                Fragment::Bold("b".to_string()),
            ]
        );
    }

    #[test]
    fn unmatched_bold_marker_stays_literal() {
        assert_eq!(format("2 ** 3"), vec![text("2 ** 3")]);
    }

    #[test]
    fn bold_does_not_span_lines() {
        assert_eq!(
            format("**a\nb**"),
            vec![text("**a"), Fragment::LineBreak, text("b**")]
        );
    }

    #[test]
    fn anchor_becomes_link() {
        let out = format(r#"See <a class="x" href="https://example.com/menu" target="_self">our menu</a>."#);
        assert_eq!(
            out,
            vec![
                text("See "),
                Fragment::Link {
                    url: "https://example.com/menu".to_string(),
                    label: "our menu".to_string(),
                },
                text("."),
            ]
        );
    }

    #[test]
    fn javascript_link_is_plain_label() {
        let out = format(r#"<a href="javascript:alert(1)">click</a> me"#);
        assert_eq!(out, vec![text("click me")]);
    }

    #[test]
    fn sanitize_strips_script_tags() {
        assert_eq!(sanitize("<script>alert(1)</script>hi"), "alert(1)hi");
    }

    #[test]
    fn sanitize_strips_escape_sequences() {
        assert_eq!(sanitize("red\x1b[31mtext\x07"), "red[31mtext");
    }

    #[test]
    fn sanitize_keeps_newlines_tabs_and_anchors() {
        assert_eq!(
            sanitize("a\r\nb\t<a href=\"https://x\">y</a>"),
            "a\nb\t<a href=\"https://x\">y</a>"
        );
    }

    #[test]
    fn br_tags_become_line_breaks() {
        assert_eq!(
            format("one<br>two<br/>three"),
            vec![
                text("one"),
                Fragment::LineBreak,
                text("two"),
                Fragment::LineBreak,
                text("three"),
            ]
        );
    }

    #[test]
    fn stray_anchor_tags_are_dropped() {
        assert_eq!(format("before</a> after"), vec![text("before after")]);
    }

    #[test]
    fn comparison_operators_are_not_tags() {
        assert_eq!(format("1 < 2 > 0"), vec![text("1 < 2 > 0")]);
    }

    #[test]
    fn empty_input_has_no_fragments() {
        assert!(format("").is_empty());
    }

    #[test]
    fn to_text_styles_bold_and_breaks() {
        let base = Style::default().fg(Color::White);
        let rendered = render("**hi** there\n\nnext", base);

        assert_eq!(rendered.lines.len(), 3);
        let first = &rendered.lines[0];
        assert_eq!(first.spans[0].content, "hi");
        assert!(first.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(first.spans[1].content, " there");
        assert!(rendered.lines[1].spans.is_empty());
        assert_eq!(rendered.lines[2].spans[0].content, "next");
    }

    #[test]
    fn to_text_shows_url_after_label() {
        let rendered = render(r#"<a href="https://x.test">docs</a>"#, Style::default());
        let spans = &rendered.lines[0].spans;
        assert_eq!(spans[0].content, "docs");
        assert!(spans[0].style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(spans[0].style.fg, Some(Color::Blue));
        assert_eq!(spans[1].content, " (https://x.test)");
    }
}
