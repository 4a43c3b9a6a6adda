//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Integer positions and velocities only
//! - Stable iteration order (ascending registration slot)
//! - No rendering or platform dependencies

pub mod body;
pub mod field;

pub use body::{Body, ReflectPolicy};
pub use field::{BodyHandle, Field, FieldError};
