//! Section Parser — segments a free-text completion into named section bodies.
//!
//! A header line follows a small grammar:
//!
//! ```text
//! header  := indent heading? bullet? emph ordinal? emph NAME emph ( ':' | EOL-if-heading )
//! heading := '#'{1,6}
//! ordinal := DIGITS ( '.' | ')' )
//! emph    := '*'*
//! ```
//!
//! `NAME` is one of the known section names, case-insensitive, with any run of
//! spaces or tabs between its words. Two strategies are tried in order:
//! `BoundaryScan` anchors on header lines, and `PerSectionFallback` searches each
//! name anywhere in the text when no header line was found at all.
//!
//! Lines that look like headings of sections outside the vocabulary end the
//! current section only where they cannot be nested content: a heading at the
//! same or a higher markdown level than the current header, the next top-level
//! number (`5.` right after `4. Placard:`), or any title line after the last
//! section of the vocabulary. Anything else stays in the body.
//!
//! Parsing never fails: a section that cannot be found maps to "".

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::analysis::sections::{Section, SectionSet, Sections, SubSection};

static REPORT_GRAMMAR: Lazy<HeaderGrammar<Section>> = Lazy::new(|| {
    HeaderGrammar::new()
        .and_then(|grammar| grammar.with_foreign_headings::<SubSection>())
        .expect("report header grammar is valid")
});

static COMPOSITE_GRAMMAR: Lazy<HeaderGrammar<SubSection>> =
    Lazy::new(|| HeaderGrammar::new().expect("composite header grammar is valid"));

/// Segments a completion into the four report sections.
pub fn parse_sections(text: &str) -> Sections<Section> {
    segment(&*REPORT_GRAMMAR, text)
}

/// Splits the composite benefits-and-risks body on its `Benefits:` / `Risks:` sub-headers.
pub fn split_benefits_and_risks(block: &str) -> Sections<SubSection> {
    segment(&*COMPOSITE_GRAMMAR, block)
}

/// Runs each strategy in turn and returns the first that found anything.
pub fn segment<S: SectionSet>(grammar: &HeaderGrammar<S>, text: &str) -> Sections<S> {
    let text = normalize_line_endings(text);

    for strategy in strategies::<S>() {
        if let Some(sections) = strategy.segment(grammar, &text) {
            debug!(
                "Segmented {} of {} sections with {}",
                sections.len(),
                S::ALL.len(),
                strategy.name()
            );
            return sections;
        }
    }

    debug!("No recognizable section headers in {} bytes of text", text.len());
    Sections::default()
}

/// Strategies in order of preference.
fn strategies<S: SectionSet>() -> [&'static dyn SegmentStrategy<S>; 2] {
    [&BoundaryScan, &PerSectionFallback]
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Grammar
// ────────────────────────────────────────────────────────────────────────────

/// Compiled header grammar for one section vocabulary.
pub struct HeaderGrammar<S: SectionSet> {
    /// Strict header line; one capture group per section, named `s0`, `s1`, ...
    header_line: Regex,
    /// Looser per-section patterns used by the fallback strategy.
    loose: Vec<(S, Regex)>,
    /// Any known name in the loose form; marks where a fallback body ends.
    any_loose: Regex,
    /// Headings for sections outside the vocabulary, if they should be boundaries.
    foreign: Option<ForeignHeadings>,
    group_names: Vec<String>,
}

struct ForeignHeadings {
    /// `# Title`, `5. Title:` or `Title:` on a line of its own.
    line: Regex,
    /// Names that look like headings but belong inside a known section.
    nested: Regex,
    /// Start of any numbered line.
    numbered: Regex,
}

/// A header occurrence: where its line starts and where its body starts.
#[derive(Debug, Clone, Copy)]
struct Anchor<S> {
    start: usize,
    body_start: usize,
    section: Option<S>,
    /// `3` for `3. Steps to Adapt:`.
    ordinal: Option<u32>,
    /// Markdown heading level, `2` for `## Placard`.
    level: Option<usize>,
}

impl<S: SectionSet> HeaderGrammar<S> {
    pub fn new() -> Result<Self, regex::Error> {
        let group_names: Vec<String> = (0..S::ALL.len()).map(|i| format!("s{i}")).collect();

        let alternatives = S::ALL
            .iter()
            .zip(&group_names)
            .map(|(section, group)| format!("(?P<{group}>{})", section.name_pattern()))
            .collect::<Vec<_>>()
            .join("|");

        let header_line = Regex::new(&format!(
            r"(?mi)^[ \t]*(?P<hash>#{{1,6}}[ \t]*)?(?:[-+][ \t]+)?(?P<pre>\**)[ \t]*(?:(?P<ord>\d+)[.)][ \t]*)?(?P<pre2>\**)[ \t]*(?:{alternatives})[ \t]*(?P<post>\**)[ \t]*(?:(?P<colon>:)|$)"
        ))?;

        let loose = S::ALL
            .iter()
            .map(|section| Ok((*section, Regex::new(&loose_pattern(&section.name_pattern()))?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let any_names = S::ALL
            .iter()
            .map(|s| s.name_pattern())
            .collect::<Vec<_>>()
            .join("|");
        let any_loose = Regex::new(&loose_pattern(&any_names))?;

        Ok(Self {
            header_line,
            loose,
            any_loose,
            foreign: None,
            group_names,
        })
    }

    /// Treats markdown headings and numbered title lines outside the vocabulary
    /// as section boundaries, except for names from the nested vocabulary `N`.
    pub fn with_foreign_headings<N: SectionSet>(self) -> Result<Self, regex::Error> {
        let line = Regex::new(
            r"(?m)^[ \t]*(?:(?P<hash>#{1,6})[ \t]+\S.*|(?:(?P<ord>\d+)[.)][ \t]*)?\**[ \t]*[A-Za-z][^:\n*]{0,60}\**[ \t]*:[ \t]*\**[ \t]*)$",
        )?;
        let numbered = Regex::new(r"(?m)^[ \t]*\d+[.)]")?;
        let nested_names = N::ALL
            .iter()
            .map(|s| s.name_pattern())
            .collect::<Vec<_>>()
            .join("|");
        let nested = Regex::new(&format!(
            r"(?i)^[ \t]*(?:#{{1,6}}[ \t]*)?(?:\d+[.)][ \t]*)?\**[ \t]*(?:{nested_names})[ \t]*\**[ \t]*:?[ \t]*\**[ \t]*$"
        ))?;

        Ok(Self {
            foreign: Some(ForeignHeadings {
                line,
                nested,
                numbered,
            }),
            ..self
        })
    }

    fn section_of(&self, caps: &Captures<'_>) -> Option<S> {
        self.group_names
            .iter()
            .position(|group| caps.name(group).is_some())
            .map(|i| S::ALL[i])
    }

    /// Header lines for known sections, in text order.
    fn known_anchors(&self, text: &str) -> Vec<Anchor<S>> {
        self.header_line
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                // Without a colon only a markdown heading line counts as a header.
                if caps.name("colon").is_none() && caps.name("hash").is_none() {
                    return None;
                }
                let section = self.section_of(&caps)?;
                let opened = group_len(&caps, "pre") + group_len(&caps, "pre2");
                let closed = group_len(&caps, "post");
                Some(Anchor {
                    start: whole.start(),
                    body_start: skip_closing_emphasis(text, whole.end(), opened.saturating_sub(closed)),
                    section: Some(section),
                    ordinal: caps.name("ord").and_then(|m| m.as_str().parse().ok()),
                    level: caps.name("hash").map(|m| m.as_str().matches('#').count()),
                })
            })
            .collect()
    }

    /// Headings of sections outside the vocabulary. Their bodies are discarded.
    ///
    /// `known` must be in text order. A candidate line is judged against the
    /// closest known header above it; lines before the first header belong to
    /// the preamble, which is dropped anyway.
    fn foreign_anchors(&self, text: &str, known: &[Anchor<S>]) -> Vec<Anchor<S>> {
        let Some(foreign) = &self.foreign else {
            return Vec::new();
        };
        let last_section = S::ALL.last().copied();

        foreign
            .line
            .captures_iter(text)
            .filter_map(|caps| {
                let line = caps.get(0)?;
                if known.iter().any(|a| a.start == line.start())
                    || foreign.nested.is_match(line.as_str())
                {
                    return None;
                }
                let owner = known.iter().take_while(|a| a.start < line.start()).last()?;

                let ends_owner = if owner.section.is_some() && owner.section == last_section {
                    true
                } else if let Some(hash) = caps.name("hash") {
                    owner.level.is_some_and(|level| hash.len() <= level)
                } else if let Some(ord) = caps.name("ord") {
                    owner.ordinal.is_some_and(|n| {
                        ord.as_str().parse::<u32>().ok() == n.checked_add(1)
                            && !foreign
                                .numbered
                                .is_match(text.get(owner.body_start..line.start()).unwrap_or(""))
                    })
                } else {
                    false
                };

                ends_owner.then_some(Anchor {
                    start: line.start(),
                    body_start: line.end(),
                    section: None,
                    ordinal: None,
                    level: None,
                })
            })
            .collect()
    }
}

fn loose_pattern(names: &str) -> String {
    format!(r"(?i)(?P<pre>\**)[ \t]*\b(?:{names})\b[ \t]*(?P<post>\**)[ \t]*(?::|[-–—]|\n)")
}

fn group_len(caps: &Captures<'_>, name: &str) -> usize {
    caps.name(name).map_or(0, |m| m.len())
}

/// Skips blanks after a header and up to `unclosed` asterisks that close
/// emphasis opened before the header name (`**Placard:** text`).
fn skip_closing_emphasis(text: &str, from: usize, unclosed: usize) -> usize {
    if unclosed == 0 {
        return from;
    }
    let rest = &text[from..];
    let blanks = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let stars = rest[blanks..]
        .bytes()
        .take_while(|b| *b == b'*')
        .take(unclosed)
        .count();
    if stars == 0 {
        from
    } else {
        from + blanks + stars
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategies
// ────────────────────────────────────────────────────────────────────────────

/// A way of segmenting text into sections.
pub trait SegmentStrategy<S: SectionSet> {
    fn name(&self) -> &'static str;

    /// Returns `None` when the strategy found no header to anchor on.
    fn segment(&self, grammar: &HeaderGrammar<S>, text: &str) -> Option<Sections<S>>;
}

/// One pass over header lines; each body runs to the next header of any kind.
pub struct BoundaryScan;

impl<S: SectionSet> SegmentStrategy<S> for BoundaryScan {
    fn name(&self) -> &'static str {
        "boundary-scan"
    }

    fn segment(&self, grammar: &HeaderGrammar<S>, text: &str) -> Option<Sections<S>> {
        let known = grammar.known_anchors(text);
        if known.is_empty() {
            return None;
        }

        let mut anchors = grammar.foreign_anchors(text, &known);
        anchors.extend(known);
        anchors.sort_by_key(|a| a.start);

        let mut sections = Sections::default();
        for (i, anchor) in anchors.iter().enumerate() {
            let Some(section) = anchor.section else {
                continue;
            };
            let end = anchors.get(i + 1).map_or(text.len(), |next| next.start);
            sections.insert_first(section, text[anchor.body_start..end].trim().to_string());
        }
        Some(sections)
    }
}

/// Searches each name on its own, anywhere in the text, and captures
/// non-greedily up to the next known name or end of text.
pub struct PerSectionFallback;

impl<S: SectionSet> SegmentStrategy<S> for PerSectionFallback {
    fn name(&self) -> &'static str {
        "per-section-fallback"
    }

    fn segment(&self, grammar: &HeaderGrammar<S>, text: &str) -> Option<Sections<S>> {
        let mut sections = Sections::default();

        for (section, pattern) in &grammar.loose {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let unclosed = group_len(&caps, "pre").saturating_sub(group_len(&caps, "post"));
            let body_start = skip_closing_emphasis(text, whole.end(), unclosed);
            let end = grammar
                .any_loose
                .find_at(text, whole.end())
                .map_or(text.len(), |next| next.start());
            let body = text.get(body_start..end.max(body_start)).unwrap_or("");
            sections.insert_first(*section, body.trim().to_string());
        }

        (!sections.is_empty()).then_some(sections)
    }
}
