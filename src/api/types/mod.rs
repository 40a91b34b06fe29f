//! API request, response and error types

pub mod answer;
pub mod error;
pub mod json;

pub use answer::{AnswerRequest, AnswerResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
