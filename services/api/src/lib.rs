//! services/api/src/lib.rs
//!
//! The selections REST service: storage adapters, configuration, errors and
//! the axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
