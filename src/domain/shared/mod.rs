//! Shared domain building blocks

pub mod error;
pub mod result;
pub mod value_objects;
