//! Shared helpers for TeamLink integration tests live here if needed;
//! the actual tests are the binaries under `tests/`.
