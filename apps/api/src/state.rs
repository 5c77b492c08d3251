use std::sync::Arc;

use crate::analysis::backend::AnalysisBackend;
use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::intake::working_set::WorkingSet;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Every resource uploaded this session, in upload order.
    pub workspace: Arc<WorkingSet>,
    pub extractor: TextExtractor,
    /// Pluggable analysis backend. Default: the Anthropic `LlmClient`.
    pub analyzer: Arc<dyn AnalysisBackend>,
    pub config: Config,
}
