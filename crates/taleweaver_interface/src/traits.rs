//! The provider adapter trait.

use crate::ProviderProfile;
use async_trait::async_trait;
use taleweaver_core::{GenerationRequest, RequestClass};
use taleweaver_error::ProviderResult;

/// Core trait that all generation backends must implement.
///
/// Adapters are stateless between calls apart from connection reuse. Every
/// failure must come back classified as a [`taleweaver_error::ProviderErrorKind`];
/// an adapter never retries on its own.
#[async_trait]
pub trait StoryProvider: Send + Sync {
    /// Generate output for one request.
    async fn generate(&self, req: &GenerationRequest) -> ProviderResult;

    /// Static description of the adapter.
    fn profile(&self) -> &ProviderProfile;

    /// Provider name as registered in configuration.
    fn name(&self) -> &str {
        self.profile().name()
    }

    /// Whether the adapter can serve a request class.
    fn supports(&self, class: RequestClass) -> bool {
        self.profile().supports(class)
    }
}
