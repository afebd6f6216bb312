// === PUBLIC CONTRACT ===
// Only the contract module should be public for other modules to consume
pub mod contract;

// Re-export the public contract components
pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::ShareIt;

// === INTERNAL MODULES ===
// Exposed for the server binary and integration tests.
// Only the `contract` module is a stable public API.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
