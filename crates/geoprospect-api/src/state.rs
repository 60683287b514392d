use std::sync::Arc;

use geoprospect_analysis::{AnalysisSession, SessionSettings};
use geoprospect_llm::ModelGateway;

/// Gateway shared by every request
pub type SharedGateway = Arc<dyn ModelGateway>;

#[derive(Clone)]
pub struct AppState {
    pub session: AnalysisSession<SharedGateway>,
}

impl AppState {
    pub fn new(gateway: SharedGateway, settings: SessionSettings) -> Self {
        Self { session: AnalysisSession::new(gateway, settings) }
    }
}
