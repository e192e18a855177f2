//! Analysis pipeline — turns one submission into a report.
//!
//! Flow: validate → record usage → build_prompt → fetch (timeout race) →
//!       parse_sections → assemble.
//!
//! Only validation, configuration and the fetch can fail. A completion that
//! parses badly still yields a report, with fallbacks in the missing fields.

use tracing::info;

use crate::analysis::fetcher::CompletionFetcher;
use crate::analysis::models::AnalysisRequest;
use crate::analysis::parser::parse_sections;
use crate::analysis::prompts::build_prompt;
use crate::analysis::report::AnalysisReport;
use crate::analysis::sections::{Section, SectionSet};
use crate::analysis::validation::validate;
use crate::errors::AppError;
use crate::models::usage::UsageEvent;
use crate::usage::{UsageLogger, ANALYSIS_REQUESTED};

/// Runs the full pipeline for one request.
///
/// `fetcher` is `None` when the completion credential is not configured.
pub async fn generate_report(
    fetcher: Option<&CompletionFetcher>,
    usage: &UsageLogger,
    user_id: Option<String>,
    request: &AnalysisRequest,
) -> Result<AnalysisReport, AppError> {
    validate(request).map_err(|e| AppError::Validation(e.to_string()))?;

    let fetcher = fetcher.ok_or(AppError::Configuration)?;

    usage.record(UsageEvent::now(ANALYSIS_REQUESTED, user_id));

    info!(
        "Generating career impact report: profession={:?}, region={:?}",
        request.profession.trim(),
        request.region.trim()
    );

    let prompt = build_prompt(request);
    let raw = fetcher.fetch(&prompt).await?;

    let sections = parse_sections(raw.as_str());
    info!(
        "Parsed {} of {} report sections",
        sections.len(),
        Section::ALL.len()
    );

    Ok(AnalysisReport::assemble(&request.profession, &sections))
}
