// Shared system prompts. Task-specific prompts live next to the code that sends them
// (see screening/prompts.rs).

/// System prompt for calls whose reply is parsed as a JSON object.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for calls whose reply is used as plain document text.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a careful document editor. \
    Respond with the edited document text only. \
    Do NOT use markdown formatting, bullet symbols, or tables. \
    Do NOT add commentary before or after the document.";
