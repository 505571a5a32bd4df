use std::sync::Arc;

use crate::config::Config;
use crate::screening::extract::ResumeReader;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable resume reader. Default: PdfTextReader.
    pub reader: Arc<dyn ResumeReader>,
}
