//! Integration test entry point.
//!
//! Individual test modules are in tests/integration/.
//!
//! Run all integration tests:
//!   cargo test --test integration
//!
//! Run specific test module:
//!   cargo test --test integration csharp

#[path = "integration/csharp_tests.rs"]
mod csharp_tests;

#[path = "integration/java_tests.rs"]
mod java_tests;

#[path = "integration/engine_tests.rs"]
mod engine_tests;

#[path = "integration/convention_tests.rs"]
mod convention_tests;
