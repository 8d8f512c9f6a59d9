//! Integration tests for Layer 0: Foundation
//!
//! Tests for scalar conversions, runtime type tags, and error reporting.

mod errors;
