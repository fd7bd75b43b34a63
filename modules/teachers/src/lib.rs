// === PUBLIC CONTRACT ===
// Other modules consume teachers through the contract only
pub mod contract;

pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::TeachersModule;

pub mod config;
pub use config::TeachersConfig;

// === INTERNAL MODULES ===
// Exposed for integration tests and the server binary. Not a stable API.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
