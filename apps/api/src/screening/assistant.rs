//! Resume Assistant: the three natural-language collaborators backed by the remote model.
//!
//! Model replies are never trusted as-is: every structured reply goes through a strict
//! decode that checks the shape, the keys and the value domain, and reports any deviation
//! as `AssistantError::Malformed`. Callers decide how to degrade.

use std::collections::BTreeMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{extract_json_object, LlmClient, LlmError};
use crate::models::screening::{ContactInfo, SkillStatus};
use crate::screening::prompts::{
    format_skill_requirements, CONTACT_INFO_PROMPT, MANDATORY_SKILLS_PROMPT,
    REORGANIZE_SECTIONS_PROMPT,
};

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("remote model unavailable: {0}")]
    Remote(#[from] LlmError),

    #[error("malformed model reply: {0}")]
    Malformed(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Held in `AppState` as `Arc<dyn ResumeAssistant>` and handed to the batch orchestrator.
#[async_trait]
pub trait ResumeAssistant: Send + Sync {
    /// Rewrites disordered text under one header per section. The result is plain text.
    async fn reorganize_sections(&self, text: &str) -> Result<String, AssistantError>;

    async fn extract_contact_info(&self, text: &str) -> Result<ContactInfo, AssistantError>;

    /// Judges each `{skill: required years}` entry. Keys of the result are exactly the
    /// keys of `requirements`.
    async fn evaluate_mandatory_skill_years(
        &self,
        text: &str,
        requirements: &BTreeMap<String, u32>,
    ) -> Result<BTreeMap<String, SkillStatus>, AssistantError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmResumeAssistant
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmResumeAssistant {
    llm: LlmClient,
}

impl LlmResumeAssistant {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeAssistant for LlmResumeAssistant {
    async fn reorganize_sections(&self, text: &str) -> Result<String, AssistantError> {
        let prompt = REORGANIZE_SECTIONS_PROMPT.replace("{resume_text}", text);
        let reply = self.llm.call_text(&prompt, PLAIN_TEXT_SYSTEM).await?;

        let cleaned = sanitize_reorganized_text(&reply);
        if cleaned.is_empty() {
            return Err(AssistantError::Malformed(
                "reorganized text is empty after cleanup".to_string(),
            ));
        }
        debug!(
            "Reorganized resume text: {} chars in, {} chars out",
            text.len(),
            cleaned.len()
        );
        Ok(cleaned)
    }

    async fn extract_contact_info(&self, text: &str) -> Result<ContactInfo, AssistantError> {
        let prompt = CONTACT_INFO_PROMPT.replace("{resume_text}", text);
        let reply = self.llm.call_text(&prompt, JSON_ONLY_SYSTEM).await?;
        decode_contact_info(&reply)
    }

    async fn evaluate_mandatory_skill_years(
        &self,
        text: &str,
        requirements: &BTreeMap<String, u32>,
    ) -> Result<BTreeMap<String, SkillStatus>, AssistantError> {
        let prompt = MANDATORY_SKILLS_PROMPT
            .replace("{skill_requirements}", &format_skill_requirements(requirements))
            .replace("{resume_text}", text);
        let reply = self.llm.call_text(&prompt, JSON_ONLY_SYSTEM).await?;
        decode_skill_statuses(&reply, requirements)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structured decode
// ────────────────────────────────────────────────────────────────────────────

fn parse_object(reply: &str) -> Result<serde_json::Map<String, Value>, AssistantError> {
    match serde_json::from_str::<Value>(extract_json_object(reply)) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AssistantError::Malformed(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(AssistantError::Malformed(format!("not valid JSON: {e}"))),
    }
}

fn is_absent_marker(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || ["none", "null", "n/a"]
            .iter()
            .any(|marker| value.eq_ignore_ascii_case(marker))
}

/// Decodes `{"name", "email", "phone"}`. All three keys must be present; each value must
/// be a string, a number (phone numbers), or null. Other keys are ignored unless nested.
pub fn decode_contact_info(reply: &str) -> Result<ContactInfo, AssistantError> {
    let map = parse_object(reply)?;

    if let Some((key, _)) = map
        .iter()
        .find(|(_, value)| value.is_object() || value.is_array())
    {
        return Err(AssistantError::Malformed(format!(
            "contact field '{key}' is nested"
        )));
    }

    let field = |name: &str| -> Result<Option<String>, AssistantError> {
        match map.get(name) {
            None => Err(AssistantError::Malformed(format!(
                "contact field '{name}' is missing"
            ))),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if is_absent_marker(s) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(AssistantError::Malformed(format!(
                "contact field '{name}' has unexpected value {other}"
            ))),
        }
    };

    Ok(ContactInfo {
        name: field("name")?,
        email: field("email")?,
        phone: field("phone")?,
    })
}

/// Decodes `{skill: "meets" | "does not meet"}` against the submitted requirements.
///
/// Keys match case-insensitively and are reported under the submitted spelling. A missing,
/// extra or duplicated key, or an unknown status, rejects the whole reply.
pub fn decode_skill_statuses(
    reply: &str,
    requirements: &BTreeMap<String, u32>,
) -> Result<BTreeMap<String, SkillStatus>, AssistantError> {
    let map = parse_object(reply)?;
    let mut statuses = BTreeMap::new();

    for (key, value) in &map {
        let wanted = key.trim().to_lowercase();
        let skill = requirements
            .keys()
            .find(|skill| skill.to_lowercase() == wanted)
            .ok_or_else(|| AssistantError::Malformed(format!("unexpected skill '{key}'")))?;

        let status = match value.as_str().map(|s| s.trim().to_lowercase()).as_deref() {
            Some("meets") => SkillStatus::Meets,
            Some("does not meet") => SkillStatus::DoesNotMeet,
            _ => {
                return Err(AssistantError::Malformed(format!(
                    "skill '{key}' has unexpected status {value}"
                )))
            }
        };

        if statuses.insert(skill.clone(), status).is_some() {
            return Err(AssistantError::Malformed(format!(
                "skill '{skill}' appears more than once"
            )));
        }
    }

    let missing: Vec<&str> = requirements
        .keys()
        .filter(|skill| !statuses.contains_key(*skill))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(AssistantError::Malformed(format!(
            "missing skills: {}",
            missing.join(", ")
        )));
    }

    Ok(statuses)
}

// ────────────────────────────────────────────────────────────────────────────
// Reorganized text cleanup
// ────────────────────────────────────────────────────────────────────────────

static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*|__").expect("static emphasis pattern"));

static RULES_AND_PIPES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[|\u{2500}-\u{257F}]").expect("static box-drawing pattern"));

static LINE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-•*▪●◦►]+[ \t]*|\d{1,2}[.)][ \t]+|#{1,6}[ \t]+)")
        .expect("static line marker pattern")
});

static SPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("static space run pattern"));

/// Strips the markup a model tends to add anyway (bullets, numbering, emphasis, table
/// pipes, box-drawing rules) so the section and date patterns see plain prose.
pub fn sanitize_reorganized_text(text: &str) -> String {
    let text = EMPHASIS.replace_all(text, "");
    let text = RULES_AND_PIPES.replace_all(&text, " ");
    let text = LINE_MARKER.replace_all(&text, "");
    let text = SPACE_RUN.replace_all(&text, " ");

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
