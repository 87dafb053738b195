//! Common types shared by the kubectl OIDC relay workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
