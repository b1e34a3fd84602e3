//! Core domain concepts shared across the panel subdomain.
//!
//! - [`article::ArticleId`]: identifier of a news article
//! - [`language::Language`]: language a discussion was generated in
//! - [`error::DomainError`]: domain-level errors

pub mod article;
pub mod error;
pub mod language;
