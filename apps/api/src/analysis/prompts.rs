// Prompt constants for the career impact analysis.
// The header list is rendered from `Section::ALL`; never hard-code header names here.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::AnalysisRequest;
use crate::analysis::sections::{Section, SectionSet, SubSection};

/// Role description that opens the system prompt.
pub const ROLE_DESCRIPTION: &str = "You are a labor-market analyst who explains, in plain \
    language, how artificial intelligence is likely to affect a specific person's career.";

/// Behavioral guidelines, rendered as a bulleted list.
pub const GUIDELINES: &[&str] = &[
    "Keep a balanced tone: name real opportunities and real threats, without hype or doom.",
    "Ground claims in current, observable trends in AI adoption and automation for this field and region.",
    "State plainly that work centred on empathy, care and creativity is also exposed to AI, not only routine tasks.",
    "Be practical and actionable: prefer specific skills, tools and habits over generic advice.",
    "Tailor depth to the user's years of experience and self-rated skill level.",
];

/// Analysis prompt template.
/// Replace: {role}, {guidelines}, {headers}, {profession}, {experience_years},
///          {region}, {skill_level}, {details}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"{role}

GUIDELINES:
{guidelines}

OUTPUT FORMAT:
Respond with EXACTLY these sections, in this order, each header on its own line and followed by a colon:
{headers}

Do NOT add any other sections, introductions or closing remarks.

--- USER SCENARIO ---
Profession: {profession}
Years of experience: {experience_years}
Region: {region}
Skill level (1-10): {skill_level}
Additional details: {details}
--- END USER SCENARIO ---"#;

const NO_DETAILS: &str = "None provided";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// Renders the full system prompt for one request. User values are substituted verbatim.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    let details = request
        .details
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DETAILS);

    let experience_years = request.experience_years.to_string();
    let skill_level = request.skill_level.to_string();
    let guidelines = render_guidelines();
    let headers = render_headers();

    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("role", ROLE_DESCRIPTION),
            ("guidelines", guidelines.as_str()),
            ("headers", headers.as_str()),
            ("profession", request.profession.as_str()),
            ("experience_years", experience_years.as_str()),
            ("region", request.region.as_str()),
            ("skill_level", skill_level.as_str()),
            ("details", details),
        ],
    )
}

/// Substitutes `{name}` placeholders in a single pass, so substituted text is
/// never re-scanned for placeholders. Unknown placeholders are left as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn render_guidelines() -> String {
    GUIDELINES
        .iter()
        .map(|g| format!("- {g}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_headers() -> String {
    Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let mut line = format!("{}. {}: {}", i + 1, section.header(), section.instruction());
            if *section == Section::PotentialBenefitsAndRisks {
                for sub in SubSection::ALL {
                    line.push_str(&format!("\n   {}:", sub.header()));
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
