//! Shared helpers

pub mod jwt;
