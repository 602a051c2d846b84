//! Test suite: shared graph builders, unit tests, and property tests.
