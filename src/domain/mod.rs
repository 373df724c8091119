//! Core domain types: entities, errors, and type mapping.

pub mod entities;
pub mod errors;
pub mod mapping;
