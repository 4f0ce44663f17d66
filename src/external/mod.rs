//! Shared plumbing for talking to external services.

pub mod client;

pub use client::HTTP_CLIENT;
