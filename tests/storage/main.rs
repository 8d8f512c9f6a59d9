//! Integration tests for Layer 1: Storage
//!
//! Tests for array sizing, storage layouts, typed ranges, and lookups.

mod layouts;
mod ranges;
mod tuples;
