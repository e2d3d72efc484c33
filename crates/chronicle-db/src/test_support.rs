//! Shared test utilities for chronicle-db integration tests.
