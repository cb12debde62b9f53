// Router-wide constants
// Limits that keep path search and storage bounded, plus the fixed
// numeric parameters of the constant-product formula
//
// Numan Thabit 2025 Nov

// --- Fees ---
pub const BPS_DENOMINATOR: u32 = 10_000; // 100%
pub const MAX_FEE_BPS: u32 = 1_000; // 10% hard cap on the protocol fee

// --- Constant product (V2-style) ---
pub const V2_FEE_NUMERATOR: u64 = 997; // 0.3% LP fee
pub const V2_FEE_DENOMINATOR: u64 = 1_000;

// --- Limits ---
pub const MAX_HOPS: usize = 2; // direct or one intermediate
pub const MAX_ROUTERS: usize = 32;
pub const MAX_FEE_TIERS: usize = 8;
pub const MAX_INTERMEDIATES: usize = 8;

// --- Defaults ---
pub const DEFAULT_FEE_TIERS: [u32; 4] = [1, 5, 30, 100];
