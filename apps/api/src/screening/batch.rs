//! Batch Orchestrator: screens a set of resumes against one validated profile.
//!
//! Each document is an independent unit: extraction, the assistant calls and the
//! deterministic analysis run per candidate, bounded by a semaphore. A failing candidate
//! is recorded with its error and never aborts the batch. Results are put back in upload
//! order before ranking so the shortlist does not depend on completion order.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::scoring::{describe_criteria, rank_shortlist};
use crate::analysis::{analyze_candidate, CandidateAnalysis};
use crate::llm_client::LlmError;
use crate::models::screening::{
    CandidateSignals, ContactInfo, MandatorySkillStatus, RequirementProfile, Verdict,
};
use crate::screening::assistant::{AssistantError, ResumeAssistant};
use crate::screening::extraction::{ExtractionError, ResumeDocument, TextExtractor};

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub shortlist_size: usize,
    pub concurrency: usize,
    pub reorganize_sections: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            shortlist_size: 3,
            concurrency: 4,
            reorganize_sections: true,
        }
    }
}

/// Why a single candidate could not be screened.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("remote model service failed: {0}")]
    RemoteService(LlmError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortlistEntry {
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub matched_skill_count: usize,
    pub required_skill_count: usize,
    pub skill_coverage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    Screened {
        contact: ContactInfo,
        signals: CandidateSignals,
        verdict: Verdict,
        eligible: bool,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub filename: String,
    #[serde(flatten)]
    pub outcome: CandidateOutcome,
    pub processing_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub screening_id: Uuid,
    pub current_year: i32,
    pub criteria: Vec<String>,
    pub shortlist: Vec<ShortlistEntry>,
    /// Upload order.
    pub candidates: Vec<CandidateReport>,
}

pub async fn screen_batch(
    profile: RequirementProfile,
    documents: Vec<ResumeDocument>,
    extractor: Arc<dyn TextExtractor>,
    assistant: Arc<dyn ResumeAssistant>,
    options: BatchOptions,
    current_year: i32,
) -> ScreeningReport {
    let screening_id = Uuid::new_v4();
    info!(
        "Screening {screening_id}: {} resume(s), {} required skill(s)",
        documents.len(),
        profile.required_skills.len()
    );

    let profile = Arc::new(profile);
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let filenames: Vec<String> = documents.iter().map(|d| d.filename.clone()).collect();
    let mut tasks = JoinSet::new();

    for (index, document) in documents.into_iter().enumerate() {
        let profile = Arc::clone(&profile);
        let extractor = Arc::clone(&extractor);
        let assistant = Arc::clone(&assistant);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            // The semaphore is never closed, so acquisition only fails if it is dropped.
            let _permit = semaphore.acquire_owned().await.ok();
            let started = Instant::now();
            let result = screen_candidate(
                &document,
                &profile,
                extractor.as_ref(),
                assistant.as_ref(),
                options.reorganize_sections,
                current_year,
            )
            .await;
            let processing_ms = started.elapsed().as_millis() as u64;
            (index, candidate_report(document.filename, result, processing_ms))
        });
    }

    let mut slots: Vec<Option<CandidateReport>> = filenames.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, report)) => slots[index] = Some(report),
            Err(e) => error!("Screening task for {screening_id} aborted: {e}"),
        }
    }

    let candidates: Vec<CandidateReport> = slots
        .into_iter()
        .zip(filenames)
        .map(|(slot, filename)| {
            slot.unwrap_or_else(|| CandidateReport {
                filename,
                outcome: CandidateOutcome::Failed {
                    error: "internal error while screening this resume".to_string(),
                },
                processing_ms: 0,
            })
        })
        .collect();

    let shortlist = build_shortlist(&candidates, &profile, options.shortlist_size);
    info!(
        "Screening {screening_id} finished: {} of {} candidate(s) shortlisted",
        shortlist.len(),
        candidates.len()
    );

    ScreeningReport {
        screening_id,
        current_year,
        criteria: describe_criteria(&profile),
        shortlist,
        candidates,
    }
}

async fn screen_candidate(
    document: &ResumeDocument,
    profile: &RequirementProfile,
    extractor: &dyn TextExtractor,
    assistant: &dyn ResumeAssistant,
    reorganize_sections: bool,
    current_year: i32,
) -> Result<(ContactInfo, CandidateAnalysis), CandidateError> {
    let filename = document.filename.as_str();
    let mut text = extractor.extract(document).await?;

    if reorganize_sections {
        let reorganized = assistant.reorganize_sections(&text).await;
        text = tolerate_malformed(reorganized, filename, "section reorganization", || {
            text.clone()
        })?;
    }

    let contact = tolerate_malformed(
        assistant.extract_contact_info(&text).await,
        filename,
        "contact info",
        ContactInfo::default,
    )?;

    let mandatory_skills = if profile.has_mandatory_skills() {
        let statuses = tolerate_malformed(
            assistant
                .evaluate_mandatory_skill_years(&text, &profile.mandatory_skill_years)
                .await,
            filename,
            "mandatory skill",
            BTreeMap::new,
        )?;
        MandatorySkillStatus::Evaluated(statuses)
    } else {
        MandatorySkillStatus::NotApplicable
    };

    Ok((
        contact,
        analyze_candidate(&text, profile, mandatory_skills, current_year),
    ))
}

/// A malformed reply degrades to `fallback`; an unavailable service fails the candidate.
fn tolerate_malformed<T>(
    result: Result<T, AssistantError>,
    filename: &str,
    step: &str,
    fallback: impl FnOnce() -> T,
) -> Result<T, CandidateError> {
    match result {
        Ok(value) => Ok(value),
        Err(AssistantError::Malformed(reason)) => {
            warn!("{filename}: malformed {step} reply ({reason}), continuing without it");
            Ok(fallback())
        }
        Err(AssistantError::Remote(e)) => Err(CandidateError::RemoteService(e)),
    }
}

fn candidate_report(
    filename: String,
    result: Result<(ContactInfo, CandidateAnalysis), CandidateError>,
    processing_ms: u64,
) -> CandidateReport {
    let outcome = match result {
        Ok((contact, analysis)) => {
            info!(
                "{filename}: processed in {processing_ms}ms, experience={} years, education={}, skills={:?}, mandatory={:?}, eligible={}",
                analysis.signals.experience_years,
                analysis
                    .signals
                    .education
                    .map(|tier| tier.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                analysis.signals.matched_skills,
                analysis.signals.mandatory_skills,
                analysis.eligible
            );
            CandidateOutcome::Screened {
                contact,
                signals: analysis.signals,
                verdict: analysis.verdict,
                eligible: analysis.eligible,
            }
        }
        Err(e) => {
            warn!("{filename}: not screened: {e}");
            CandidateOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    CandidateReport {
        filename,
        outcome,
        processing_ms,
    }
}

fn build_shortlist(
    candidates: &[CandidateReport],
    profile: &RequirementProfile,
    limit: usize,
) -> Vec<ShortlistEntry> {
    let scored: Vec<(&CandidateReport, Verdict)> = candidates
        .iter()
        .filter_map(|report| match &report.outcome {
            CandidateOutcome::Screened { verdict, .. } => Some((report, verdict.clone())),
            CandidateOutcome::Failed { .. } => None,
        })
        .collect();

    rank_shortlist(scored, limit)
        .into_iter()
        .map(|(report, verdict)| {
            let contact = match &report.outcome {
                CandidateOutcome::Screened { contact, .. } => contact.clone(),
                CandidateOutcome::Failed { .. } => ContactInfo::default(),
            };
            ShortlistEntry {
                filename: report.filename.clone(),
                name: contact.name,
                email: contact.email,
                phone: contact.phone,
                matched_skill_count: verdict.matched_skill_count,
                required_skill_count: profile.required_skills.len(),
                skill_coverage: verdict.skill_coverage_fraction,
            }
        })
        .collect()
}
