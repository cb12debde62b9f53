// Router module - quoting, validation and execution planes
// The router contract facade plus the quote engine that selects paths
// and the executor that settles them
//
// Numan Thabit 2025 Nov

pub mod execution;
pub mod routes;
pub mod selector;
pub mod validation;

#[allow(clippy::module_inception)]
pub mod router;

pub use execution::{SwapExecutor, SwapOutcome, TxContext};
pub use router::SwapRouter;
pub use routes::{Hop, Path, Quote};
pub use selector::QuoteEngine;
