//! Request extractors that reject with `AppError` envelopes.

pub mod bearer;
pub mod json;

pub use bearer::BearerClaims;
pub use json::JsonBody;
