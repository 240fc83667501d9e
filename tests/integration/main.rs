//! Integration tests against a mock HTTP server

mod traversal_tests;
