//! FFI (Foreign Function Interface) module
//!
//! PyO3 bindings exposing the forecasting pipeline to the Python dashboard.
//!
//! # Design Principles
//!
//! 1. **Minimal boundary**: evaluate and search only
//! 2. **Simple types**: primitives, strings and dicts at the boundary
//! 3. **Validate inputs**: scenarios are validated before any computation
//! 4. **Safe errors**: validation → ValueError, configuration → RuntimeError
//! 5. **No references**: Python gets copies, never references to Rust state

pub mod engine;
pub mod types;
