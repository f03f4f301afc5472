use std::sync::Arc;

use crate::config::Config;
use crate::screening::assistant::ResumeAssistant;
use crate::screening::extraction::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Remote-model collaborators. Default: `LlmResumeAssistant` over the single `LlmClient`.
    pub assistant: Arc<dyn ResumeAssistant>,
    pub extractor: Arc<dyn TextExtractor>,
}
