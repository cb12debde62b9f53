// Library root module for swap-aggr
// This file defines the public API and module structure for the swap
// aggregation router and the chain simulator it runs on
//
// Numan Thabit 2025 Nov

pub mod chain;
pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod events;
pub mod fee_tiers;
pub mod fees;
pub mod ledger;
pub mod metrics;
pub mod quant;
pub mod registry;
pub mod router;
pub mod service;
pub mod state;
pub mod telemetry;
pub mod venues;

pub use chain::{Chain, Receipt, World};
pub use config::RouterConfig;
pub use errors::{RouterError, VenueError};
pub use router::{Hop, Path, Quote, SwapOutcome, SwapRouter};
pub use service::RouterService;
