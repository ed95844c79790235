use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::store::DealStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence seam. `PgDealStore` in production.
    pub store: Arc<dyn DealStore>,
    /// Text generation seam. `LlmClient` in production.
    pub llm: Arc<dyn TextGenerator>,
}
