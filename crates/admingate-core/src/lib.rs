pub mod envelope;
pub mod error;
pub mod listing;
pub mod path;
pub mod resource;

pub use envelope::{BackendEnvelope, NormalizedListResponse};
pub use error::{GatewayError, Result};
pub use listing::{ListQuery, apply_post_processing};
pub use path::ResourcePath;
pub use resource::{ListMode, ResourcePolicy, ResourceRegistry};
