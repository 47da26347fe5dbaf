//! Core business logic for Cashbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `access` - Role-based scoping of agents per caller
//! - `ledger` - Daily balance continuity and the agent self-reported ledger
//! - `debt` - Debtor payment settlement
//! - `commission` - Commission validation
//! - `agent` - Agent profile validation
//! - `money` - Storable amount checks shared by every money field
//! - `dashboard` - Summary types and the dashboard read cache
//! - `auth` - Password hashing and email helpers

pub mod access;
pub mod agent;
pub mod auth;
pub mod commission;
pub mod dashboard;
pub mod debt;
pub mod ledger;
pub mod money;
