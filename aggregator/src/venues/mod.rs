// Venue module - external liquidity sources the router can call
// Each router kind has its own small call interface behind the Venue trait
//
// Numan Thabit 2025 Nov

pub mod adapter;
pub mod amm;
pub mod concentrated;

pub use adapter::{LegReq, Venue, VenueBook, VenueEnv};
pub use amm::ConstantProductVenue;
pub use concentrated::ConcentratedVenue;
