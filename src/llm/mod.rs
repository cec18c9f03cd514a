#[cfg(feature = "client")]
pub mod client;
pub mod prompts;
pub mod types;

#[cfg(feature = "client")]
pub use client::*;
pub use types::*;

use crate::error::Result;

/// Anything that can turn a [`CompletionRequest`] into the model's raw text
/// output. One call is one attempt; implementations do not retry.
#[allow(async_fn_in_trait)]
pub trait CompletionBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
