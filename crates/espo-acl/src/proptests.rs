//! Property-based tests for scope evaluation.
