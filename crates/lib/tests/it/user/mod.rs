//! User module integration tests
