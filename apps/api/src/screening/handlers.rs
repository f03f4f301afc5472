use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::analysis::{analyze_candidate, normalize_text, CandidateAnalysis};
use crate::errors::AppError;
use crate::models::screening::{MandatorySkillStatus, RequirementProfile, SkillStatus};
use crate::screening::batch::{screen_batch, ScreeningReport};
use crate::screening::extraction::ResumeDocument;
use crate::screening::profile::ProfileRequest;
use crate::state::AppState;

const PROFILE_FIELD: &str = "profile";
const RESUMES_FIELD: &str = "resumes";

fn current_year() -> i32 {
    Utc::now().year()
}

/// POST /api/v1/screenings
///
/// Multipart body: one `profile` field (JSON) and one or more `resumes` files.
pub async fn handle_create_screening(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningReport>, AppError> {
    let mut profile: Option<ProfileRequest> = None;
    let mut documents = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            PROFILE_FIELD => {
                let raw = field.text().await?;
                let request = serde_json::from_str(&raw).map_err(|e| {
                    AppError::Validation(format!("'{PROFILE_FIELD}' is not a valid profile: {e}"))
                })?;
                profile = Some(request);
            }
            RESUMES_FIELD => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("resume-{}", documents.len() + 1));
                let bytes = field.bytes().await?;
                documents.push(ResumeDocument { filename, bytes });
            }
            other => warn!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    let profile = profile
        .ok_or_else(|| AppError::Validation(format!("missing '{PROFILE_FIELD}' field")))?
        .validate()?;

    if documents.is_empty() {
        return Err(AppError::Validation(
            "at least one resume must be uploaded".to_string(),
        ));
    }

    let report = screen_batch(
        profile,
        documents,
        state.extractor.clone(),
        state.assistant.clone(),
        state.config.batch_options(),
        current_year(),
    )
    .await;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub profile: ProfileRequest,
    /// Pre-judged mandatory skill outcomes; required when the profile has mandatory skills.
    #[serde(default)]
    pub mandatory_skill_status: Option<BTreeMap<String, SkillStatus>>,
    #[serde(default)]
    pub current_year: Option<i32>,
}

/// POST /api/v1/screenings/analyze
///
/// Runs the deterministic analysis on already-extracted text. No remote calls.
pub async fn handle_analyze(
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<CandidateAnalysis>, AppError> {
    let profile = req.profile.validate()?;

    let text = normalize_text(&req.text);
    if text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let mandatory = resolve_mandatory_status(&profile, req.mandatory_skill_status)?;
    let year = req.current_year.unwrap_or_else(current_year);

    Ok(Json(analyze_candidate(&text, &profile, mandatory, year)))
}

/// Keys must cover exactly the profile's mandatory skills (case-insensitive).
fn resolve_mandatory_status(
    profile: &RequirementProfile,
    provided: Option<BTreeMap<String, SkillStatus>>,
) -> Result<MandatorySkillStatus, AppError> {
    if !profile.has_mandatory_skills() {
        return match provided {
            Some(statuses) if !statuses.is_empty() => Err(AppError::Validation(
                "mandatory_skill_status given but the profile has no mandatory skills".to_string(),
            )),
            _ => Ok(MandatorySkillStatus::NotApplicable),
        };
    }

    let provided = provided.ok_or_else(|| {
        AppError::Validation("mandatory_skill_status is required for this profile".to_string())
    })?;

    let mut statuses = BTreeMap::new();
    for (skill, status) in provided {
        let wanted = skill.trim().to_lowercase();
        let canonical = profile
            .mandatory_skill_years
            .keys()
            .find(|mandatory| mandatory.to_lowercase() == wanted)
            .ok_or_else(|| {
                AppError::Validation(format!("'{skill}' is not a mandatory skill of the profile"))
            })?;
        statuses.insert(canonical.clone(), status);
    }

    if statuses.len() != profile.mandatory_skill_years.len() {
        return Err(AppError::Validation(
            "mandatory_skill_status must cover every mandatory skill".to_string(),
        ));
    }

    Ok(MandatorySkillStatus::Evaluated(statuses))
}
