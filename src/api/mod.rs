//! HTTP API

pub mod integration;
pub mod routes;
pub mod server;

pub use integration::{init_assessment_service, with_model};
pub use routes::build_router;
pub use server::serve;
