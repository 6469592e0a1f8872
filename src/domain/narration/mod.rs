pub mod service;

pub use service::{NarrationRequest, NarrationResult, NarrationService, NarrationServiceApi};
