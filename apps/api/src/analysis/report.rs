//! Report assembly — cleans each extracted section and fills in fallbacks,
//! so every text field of an `AnalysisReport` is non-empty by construction.

use serde::{Deserialize, Serialize};

use crate::analysis::cleaner::clean;
use crate::analysis::parser::split_benefits_and_risks;
use crate::analysis::sections::{Section, SectionSet, Sections, SubSection};

/// The structured career-impact report handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub profession: String,
    pub outlook: String,
    pub benefits_and_risks: String,
    pub benefits: String,
    pub risks: String,
    pub steps: String,
    pub placard: String,
}

impl AnalysisReport {
    /// Builds a report from raw section bodies. Deterministic for a given input.
    pub fn assemble(profession: &str, sections: &Sections<Section>) -> Self {
        let composite = sections.get(Section::PotentialBenefitsAndRisks);
        let split = split_benefits_and_risks(composite);

        Self {
            profession: profession.trim().to_string(),
            outlook: field(sections, Section::GeneralOutlook),
            benefits_and_risks: field(sections, Section::PotentialBenefitsAndRisks),
            benefits: sub_field(&split, SubSection::Benefits),
            risks: sub_field(&split, SubSection::Risks),
            steps: field(sections, Section::StepsToAdapt),
            placard: or_fallback(
                strip_wrapping_quotes(&clean(sections.get(Section::Placard))),
                Section::Placard.fallback(),
            ),
        }
    }

    /// Looks a top-level section up by its shared field key.
    pub fn field_by_key(&self, key: &str) -> Option<&str> {
        let section = Section::ALL.iter().copied().find(|s| s.field_key() == key)?;
        Some(match section {
            Section::GeneralOutlook => self.outlook.as_str(),
            Section::PotentialBenefitsAndRisks => self.benefits_and_risks.as_str(),
            Section::StepsToAdapt => self.steps.as_str(),
            Section::Placard => self.placard.as_str(),
        })
    }
}

fn field(sections: &Sections<Section>, section: Section) -> String {
    or_fallback(clean(sections.get(section)), section.fallback())
}

fn sub_field(split: &Sections<SubSection>, sub: SubSection) -> String {
    or_fallback(clean(split.get(sub)), sub.fallback())
}

fn or_fallback(cleaned: String, fallback: &str) -> String {
    if cleaned.trim().is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// `"Adapt and thrive."` → `Adapt and thrive.`
fn strip_wrapping_quotes(text: &str) -> String {
    const QUOTES: &[(char, char)] = &[('"', '"'), ('“', '”'), ('\'', '\'')];
    for (open, close) in QUOTES {
        if let Some(inner) = text
            .strip_prefix(*open)
            .and_then(|rest| rest.strip_suffix(*close))
        {
            return inner.trim().to_string();
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parser::parse_sections;

    const COMPLETION: &str = "\
1. General Outlook:
AI will take over documentation, not care.

2. Potential Benefits and Risks:
Benefits:
- Less charting
Risks:
- Alert fatigue

3. Steps to Adapt:
1. Learn the EHR assistant.

4. Placard:
\"Care stays human; paperwork doesn't.\"";

    #[test]
    fn test_assembles_all_fields() {
        let report = AnalysisReport::assemble(" Nurse ", &parse_sections(COMPLETION));
        assert_eq!(report.profession, "Nurse");
        assert_eq!(report.outlook, "AI will take over documentation, not care.");
        assert_eq!(
            report.benefits_and_risks,
            "Benefits:\n<ul>\n<li>Less charting</li>\n</ul>\nRisks:\n<ul>\n<li>Alert fatigue</li>\n</ul>"
        );
        assert_eq!(report.benefits, "<ul>\n<li>Less charting</li>\n</ul>");
        assert_eq!(report.risks, "<ul>\n<li>Alert fatigue</li>\n</ul>");
        assert_eq!(report.steps, "<strong>1.</strong> Learn the EHR assistant.");
        assert_eq!(report.placard, "Care stays human; paperwork doesn't.");
    }

    #[test]
    fn test_missing_section_gets_fallback_only_there() {
        let without_steps = COMPLETION.replace("3. Steps to Adapt:\n1. Learn the EHR assistant.\n\n", "");
        let report = AnalysisReport::assemble("Nurse", &parse_sections(&without_steps));
        assert_eq!(report.steps, "No steps found.");
        assert_eq!(report.outlook, "AI will take over documentation, not care.");
        assert_eq!(report.placard, "Care stays human; paperwork doesn't.");
        assert_eq!(report.benefits, "<ul>\n<li>Less charting</li>\n</ul>");
    }

    #[test]
    fn test_whitespace_only_section_gets_fallback() {
        let report =
            AnalysisReport::assemble("Nurse", &parse_sections("General Outlook:\n   \n\nPlacard: Go."));
        assert_eq!(report.outlook, "No outlook found.");
        assert_eq!(report.placard, "Go.");
    }

    #[test]
    fn test_no_headers_degrades_every_field() {
        let report = AnalysisReport::assemble("Nurse", &parse_sections("Just some prose."));
        assert_eq!(report.outlook, Section::GeneralOutlook.fallback());
        assert_eq!(
            report.benefits_and_risks,
            Section::PotentialBenefitsAndRisks.fallback()
        );
        assert_eq!(report.benefits, "No benefits found.");
        assert_eq!(report.risks, "No risks found.");
        assert_eq!(report.steps, Section::StepsToAdapt.fallback());
        assert_eq!(report.placard, Section::Placard.fallback());
    }

    #[test]
    fn test_composite_without_sub_headers_keeps_block_but_defaults_split() {
        let report = AnalysisReport::assemble(
            "Nurse",
            &parse_sections("Potential Benefits and Risks:\nMixed picture overall."),
        );
        assert_eq!(report.benefits_and_risks, "Mixed picture overall.");
        assert_eq!(report.benefits, "No benefits found.");
        assert_eq!(report.risks, "No risks found.");
    }

    #[test]
    fn test_field_by_key_follows_shared_vocabulary() {
        let report = AnalysisReport::assemble("Nurse", &parse_sections(COMPLETION));
        for section in Section::ALL {
            assert!(report.field_by_key(section.field_key()).is_some());
        }
        assert_eq!(report.field_by_key("placard"), Some(report.placard.as_str()));
        assert_eq!(report.field_by_key("unknown"), None);
    }

    #[test]
    fn test_serializes_with_field_keys() {
        let report = AnalysisReport::assemble("Nurse", &parse_sections(COMPLETION));
        let value = serde_json::to_value(&report).unwrap();
        for section in Section::ALL {
            assert!(value.get(section.field_key()).is_some(), "{section:?}");
        }
        assert_eq!(value["profession"], "Nurse");
    }

    #[test]
    fn test_strip_wrapping_quotes() {
        assert_eq!(strip_wrapping_quotes("\"Hi.\""), "Hi.");
        assert_eq!(strip_wrapping_quotes("“Hi.”"), "Hi.");
        assert_eq!(strip_wrapping_quotes("Say \"hi\"."), "Say \"hi\".");
    }
}
