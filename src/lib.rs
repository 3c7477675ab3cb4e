//! LearnHub - Learning platform backend core.
//!
//! Cached engagement counters reconciled into PostgreSQL, course catalog
//! queries, review validation and verification mail.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
