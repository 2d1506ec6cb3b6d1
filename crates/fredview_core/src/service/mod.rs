//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate cache, analysis and repository calls into use-case APIs.
//! - Keep front ends decoupled from storage details.

pub mod browse_service;
