//! Integration tests for the parameter system
//!
//! These tests verify that the parameter system behaves correctly in various scenarios.

// Tests for scene-level packing and unpacking
mod param_tests;


// Tests for run configuration files
mod config_tests;
