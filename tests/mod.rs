//! Test module organization.
//!
//! This module organizes all integration tests for the pipeline simulator.





/// Configuration, loading, comparison and reporting tests.
mod integration_tests;


/// Property-based stress tests.
mod stress_tests;
