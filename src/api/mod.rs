//! HTTP API module for the Bill Split Engine.
//!
//! This module exposes the allocation, recalculation and expense payload
//! operations as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::AllocationRequest;
pub use response::{AllocationResponse, ApiError, ApiErrorResponse};
pub use state::AppState;
