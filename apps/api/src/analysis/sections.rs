//! Section vocabulary shared by the prompt builder and the section parser.
//!
//! The prompt renders its header list from `Section::ALL` and the parser
//! compiles its header grammar from the same list, so the two cannot drift.

use std::collections::HashMap;
use std::hash::Hash;

/// A closed set of headers the parser can segment text by.
pub trait SectionSet: Copy + Eq + Hash + std::fmt::Debug + Send + Sync + 'static {
    /// Every member, in the order the model is asked to emit them.
    const ALL: &'static [Self];

    /// Canonical header text, without the trailing colon.
    fn header(self) -> &'static str;

    /// Regex fragment matching the header name. Words are separated by any
    /// run of spaces or tabs; case is handled by the grammar's flags.
    fn name_pattern(self) -> String {
        words_pattern(self.header())
    }
}

pub(crate) fn words_pattern(header: &str) -> String {
    header
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[ \t]+")
}

/// The four top-level report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    GeneralOutlook,
    PotentialBenefitsAndRisks,
    StepsToAdapt,
    Placard,
}

impl SectionSet for Section {
    const ALL: &'static [Self] = &[
        Section::GeneralOutlook,
        Section::PotentialBenefitsAndRisks,
        Section::StepsToAdapt,
        Section::Placard,
    ];

    fn header(self) -> &'static str {
        match self {
            Section::GeneralOutlook => "General Outlook",
            Section::PotentialBenefitsAndRisks => "Potential Benefits and Risks",
            Section::StepsToAdapt => "Steps to Adapt",
            Section::Placard => "Placard",
        }
    }
}

impl Section {
    /// Field name in the serialized report.
    pub fn field_key(self) -> &'static str {
        match self {
            Section::GeneralOutlook => "outlook",
            Section::PotentialBenefitsAndRisks => "benefitsAndRisks",
            Section::StepsToAdapt => "steps",
            Section::Placard => "placard",
        }
    }

    /// What to show when the model left the section out.
    pub fn fallback(self) -> &'static str {
        match self {
            Section::GeneralOutlook => "No outlook found.",
            Section::PotentialBenefitsAndRisks => "No benefits and risks found.",
            Section::StepsToAdapt => "No steps found.",
            Section::Placard => "No placard found.",
        }
    }

    /// One-line description rendered into the prompt next to the header.
    pub fn instruction(self) -> &'static str {
        match self {
            Section::GeneralOutlook => {
                "How AI is likely to change this profession in the user's region over the next 5-10 years."
            }
            Section::PotentialBenefitsAndRisks => {
                "Two labeled parts, \"Benefits:\" and \"Risks:\", each a short bullet list using \"- \"."
            }
            Section::StepsToAdapt => {
                "A numbered list of concrete, practical steps matched to the user's experience and skill level."
            }
            Section::Placard => "One shareable sentence summarizing the outlook.",
        }
    }
}

/// Sub-headers inside the composite benefits-and-risks section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubSection {
    Benefits,
    Risks,
}

impl SectionSet for SubSection {
    const ALL: &'static [Self] = &[SubSection::Benefits, SubSection::Risks];

    fn header(self) -> &'static str {
        match self {
            SubSection::Benefits => "Benefits",
            SubSection::Risks => "Risks",
        }
    }

    fn name_pattern(self) -> String {
        format!(r"(?:potential[ \t]+)?{}", words_pattern(self.header()))
    }
}

impl SubSection {
    pub fn fallback(self) -> &'static str {
        match self {
            SubSection::Benefits => "No benefits found.",
            SubSection::Risks => "No risks found.",
        }
    }
}

/// Raw section bodies keyed by section. Absent sections read as "".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections<S: SectionSet> {
    bodies: HashMap<S, String>,
}

impl<S: SectionSet> Default for Sections<S> {
    fn default() -> Self {
        Self {
            bodies: HashMap::new(),
        }
    }
}

impl<S: SectionSet> Sections<S> {
    pub fn get(&self, section: S) -> &str {
        self.bodies.get(&section).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, section: S) -> bool {
        self.bodies.contains_key(&section)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Keeps the first body seen for a section; later duplicates are ignored.
    pub(crate) fn insert_first(&mut self, section: S, body: String) {
        self.bodies.entry(section).or_insert(body);
    }
}
