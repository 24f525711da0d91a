//! Core types shared across the crate.
//!
//! Currently this is the error module: the [`ExpandError`] taxonomy and the
//! [`ErrorContext`] wrapper used to render failures to the user.

pub mod error;

pub use error::{ErrorContext, ExpandError, user_friendly_error};
