// Prompt templates for the resume assistant.
// Placeholders are substituted with `str::replace` before sending.

pub const REORGANIZE_SECTIONS_PROMPT: &str = r#"The following text was extracted from a resume and may be disorganized because of multi-column layouts.
Identify the key sections and restructure the text under these headers, each on its own line:

Summary
Work Experience
Education
Skills
Projects
Certifications

Omit a header when the resume has no content for it. If some information appears misplaced, reconstruct it logically.
Keep every date exactly as written. Do not invent content.
Return plain text only. Do NOT use markdown formatting such as '**', '*', '-', '|', numbering, or bullet points.

RESUME TEXT:
{resume_text}"#;

pub const CONTACT_INFO_PROMPT: &str = r#"Extract the candidate's name, email address and phone number from the resume below.

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this flat object, no nesting):
{
  "name": "string" | null,
  "email": "string" | null,
  "phone": "string" | null
}

Use null for any detail that is not present. Copy values exactly as they appear in the resume."#;

pub const MANDATORY_SKILLS_PROMPT: &str = r#"Check whether the candidate meets each required skill for the minimum number of years given (format "skill: required years").

REQUIRED SKILLS:
{skill_requirements}

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly one key per required skill, spelled exactly as listed above):
{
  "<skill>": "meets" | "does not meet"
}

Answer "does not meet" when the resume does not show enough years of experience with the skill."#;

/// Renders `{skill: years}` as one "skill: years" line per entry.
pub fn format_skill_requirements<'a>(
    requirements: impl IntoIterator<Item = (&'a String, &'a u32)>,
) -> String {
    requirements
        .into_iter()
        .map(|(skill, years)| format!("{skill}: {years}"))
        .collect::<Vec<_>>()
        .join("\n")
}
