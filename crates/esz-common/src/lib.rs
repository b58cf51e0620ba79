//! Common types and utilities for the esz ECMAScript front end.
//!
//! This crate provides foundational types used across all esz crates:
//! - String interning (`Atom`, `Interner`)
//! - Source positions (`Position`, `Location`, `Range`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, codes and message templates)
//! - Recursion and time limits

// String interning for token text deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Position/Range types for line/column source locations
pub mod position;
pub use position::{Location, Position, Range};

// Diagnostics shared by the scanner, parser and regex translator
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;
