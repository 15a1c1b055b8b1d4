//! Clients for external services

pub mod aws;
pub mod client;

pub use client::HTTP_CLIENT;
