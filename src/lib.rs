//! Saaty AHP - pairwise-comparison decisions with the Analytic Hierarchy Process.
//!
//! A decision is a three-level hierarchy: one goal, its criteria, and the
//! alternatives judged under every criterion. Pairwise judgments are kept
//! reciprocal, turned into priority vectors, checked for consistency and
//! composed into a global ranking of the alternatives.
//!
//! # Architecture
//!
//! - `domain` - the engine and its value objects; pure, no I/O
//! - `ports` - the snapshot store interface
//! - `adapters` - file and in-memory snapshot stores
//! - `application` - command and query handlers
//! - `config`, `telemetry`, `cli` - the binary's ambient stack

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
