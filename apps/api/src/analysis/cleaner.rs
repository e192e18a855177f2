//! Text Cleaner — turns one raw section body into display-ready text.
//!
//! Markdown emphasis, `- ` bullets and numbered-line prefixes are converted to
//! a small HTML subset (`strong`, `em`, `ul`, `li`). Every other tag is removed.
//! `clean` is idempotent: its output contains nothing it would rewrite again.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Tags that survive sanitizing. Attributes are never kept.
const ALLOWED_TAGS: &[&str] = &["strong", "em", "ul", "li"];

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?([A-Za-z][A-Za-z0-9]*)\b[^<>]*>").expect("tag pattern is valid"));

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").expect("bold pattern is valid"));

// Inner text must not start or end with a space, so "2 * 3 * 4" is left alone.
static ITALIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").expect("italic pattern is valid")
});

static MARKDOWN_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(?:#{1,6}[ \t]+)+").expect("heading pattern is valid"));

static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*- (.*)$").expect("bullet pattern is valid"));

static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)(\d+\.)[ \t]+(.*)$").expect("numbered pattern is valid"));

/// Cleans one section body for direct display.
pub fn clean(raw: &str) -> String {
    let text = inline_markup(&raw.replace("\r\n", "\n"));
    let lines: Vec<String> = text
        .lines()
        .map(|line| MARKDOWN_HEADING.replace(line, "").into_owned())
        .collect();
    let lines = wrap_lists(&lines);
    let lines: Vec<String> = lines.iter().map(|line| bold_numeral(line)).collect();
    collapse_blank_lines(&lines)
}

/// Sanitizes and converts emphasis until nothing changes. A single pass is
/// not enough: removing `<b>` from `<scr<b>ipt>` forms a new tag, and
/// converting one pair of asterisks can make a leftover pair adjacent.
fn inline_markup(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = convert_emphasis(&sanitize_tags(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Drops every tag outside `ALLOWED_TAGS`, and strips attributes from allowed ones.
fn sanitize_tags(text: &str) -> String {
    HTML_TAG
        .replace_all(text, |caps: &Captures<'_>| {
            let name = caps[1].to_ascii_lowercase();
            if !ALLOWED_TAGS.contains(&name.as_str()) {
                return String::new();
            }
            if caps[0].starts_with("</") {
                format!("</{name}>")
            } else {
                format!("<{name}>")
            }
        })
        .into_owned()
}

fn convert_emphasis(text: &str) -> String {
    let text = BOLD.replace_all(text, "<strong>$1</strong>");
    ITALIC.replace_all(&text, "<em>$1</em>").into_owned()
}

/// Turns `- ` lines into `<li>` items, each consecutive run inside one `<ul>`.
fn wrap_lists(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut in_list = false;

    for line in lines {
        match BULLET.captures(line) {
            Some(caps) => {
                if !in_list {
                    out.push("<ul>".to_string());
                    in_list = true;
                }
                out.push(format!("<li>{}</li>", caps[1].trim_end()));
            }
            None => {
                if in_list {
                    out.push("</ul>".to_string());
                    in_list = false;
                }
                out.push(line.clone());
            }
        }
    }

    if in_list {
        out.push("</ul>".to_string());
    }
    out
}

/// `1. Do this` → `<strong>1.</strong> Do this`.
fn bold_numeral(line: &str) -> String {
    NUMBERED
        .replace(line, "$1<strong>$2</strong> $3")
        .into_owned()
}

/// Trims line ends, keeps at most one blank line in a row, trims the whole text.
fn collapse_blank_lines(lines: &[String]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() && out.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    out.join("\n").trim().to_string()
}
