//! Model layer - registry, routing, and provider adapters

pub mod adapter;
pub mod clients;
pub mod registry;
pub mod router;
pub mod sse;
pub mod traits;
pub mod types;

pub use clients::{GeminiClient, OpenAiClient};
pub use registry::{ModelEntry, ModelRegistry, ProviderKind, RegistryError};
pub use router::{ResolvedTarget, resolve_target};
pub use traits::ChatAdapter;
pub use types::{ChatError, ChatStream, StreamFault};
