//! Request validation and credential handling shared by the handlers.

mod credentials;
mod validation;
pub use credentials::{
    hash_password, verify_password, verify_password_or_dummy, Claims, Role, TokenIssuer,
};
pub use validation::{is_email, FieldKind, FieldSpec, Format, RequestValidator, Validated};
