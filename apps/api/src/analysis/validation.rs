//! Input validation for analysis submissions.
//!
//! Checks run in a fixed order and the first failure wins:
//! profession → experience → region → skill level → details.

use thiserror::Error;

use crate::analysis::models::AnalysisRequest;

pub const MIN_EXPERIENCE_YEARS: i64 = 0;
pub const MAX_EXPERIENCE_YEARS: i64 = 50;
pub const MIN_SKILL_LEVEL: i64 = 1;
pub const MAX_SKILL_LEVEL: i64 = 10;
pub const MAX_DETAILS_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("Profession is required.")]
    MissingProfession,

    #[error("Experience must be between 0 and 50 years.")]
    ExperienceOutOfRange,

    #[error("Region is required.")]
    MissingRegion,

    #[error("Skill level must be between 1 and 10.")]
    SkillLevelOutOfRange,

    #[error("Details must be 500 characters or fewer.")]
    DetailsTooLong,
}

pub fn validate(request: &AnalysisRequest) -> Result<(), InvalidInput> {
    if request.profession.trim().is_empty() {
        return Err(InvalidInput::MissingProfession);
    }
    if !(MIN_EXPERIENCE_YEARS..=MAX_EXPERIENCE_YEARS).contains(&request.experience_years) {
        return Err(InvalidInput::ExperienceOutOfRange);
    }
    if request.region.trim().is_empty() {
        return Err(InvalidInput::MissingRegion);
    }
    if !(MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&request.skill_level) {
        return Err(InvalidInput::SkillLevelOutOfRange);
    }
    if let Some(details) = &request.details {
        if details.chars().count() > MAX_DETAILS_CHARS {
            return Err(InvalidInput::DetailsTooLong);
        }
    }
    Ok(())
}
