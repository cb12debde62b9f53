// Path validation module
// Structural checks on caller-supplied hops, then checks against the
// router's registry and fee-tier catalog
//
// Numan Thabit 2025 Nov

use crate::constants::MAX_HOPS;
use crate::errors::RouterError;
use crate::router::routes::{Hop, Path};
use crate::state::RouterStorage;

/// Accumulates every structural problem before failing.
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn into_result(self) -> Result<(), RouterError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(RouterError::InvalidPath(self.errors.join("; ")))
        }
    }
}

pub fn check_structure(hops: &[Hop]) -> ValidationResult {
    let mut result = ValidationResult::new();

    if hops.is_empty() {
        result.add_error("empty path".into());
        return result;
    }
    if hops.len() > MAX_HOPS {
        result.add_error(format!("{} hops exceeds maximum of {MAX_HOPS}", hops.len()));
    }

    for (i, hop) in hops.iter().enumerate() {
        if hop.router.is_zero() || hop.token_in.is_zero() || hop.token_out.is_zero() {
            result.add_error(format!("hop {i}: zero address"));
        }
        if hop.token_in == hop.token_out {
            result.add_error(format!("hop {i}: token in equals token out"));
        }
        match (hop.kind.requires_fee_tier(), hop.fee_tier) {
            (true, None) => {
                result.add_error(format!("hop {i}: {:?} hop without fee tier", hop.kind))
            }
            (false, Some(tier)) => {
                result.add_error(format!("hop {i}: {:?} hop with fee tier {tier}", hop.kind))
            }
            _ => {}
        }
        if let Some(next) = hops.get(i + 1) {
            if hop.token_out != next.token_in {
                result.add_error(format!("hop {i}: output does not feed hop {}", i + 1));
            }
        }
    }

    if let (Some(first), Some(last)) = (hops.first(), hops.last()) {
        if hops.len() > 1 && first.token_in == last.token_out {
            result.add_error("path starts and ends on the same token".into());
        }
    }

    result
}

/// Every router must be registered and active under the kind the hop
/// claims; every tier must be in the catalog.
pub fn check_against_storage(storage: &RouterStorage, path: &Path) -> Result<(), RouterError> {
    for (i, hop) in path.hops().iter().enumerate() {
        let entry = storage.registry.resolve_active(hop.router)?;
        if entry.kind != hop.kind {
            return Err(RouterError::InvalidPath(format!(
                "hop {i}: router {} is registered as {:?}, not {:?}",
                hop.router, entry.kind, hop.kind
            )));
        }
        if let Some(tier) = hop.fee_tier {
            storage.fee_tiers.ensure_supported(tier)?;
        }
    }
    Ok(())
}

/// Structural checks followed by storage checks.
pub fn validate_path(storage: &RouterStorage, hops: &[Hop]) -> Result<Path, RouterError> {
    let path = Path::try_new(hops.to_vec())?;
    check_against_storage(storage, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::control::OwnerCap;
    use crate::fee_tiers::FeeTier;
    use crate::registry::RouterKind;
    use alloy_primitives::Address;

    fn t(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn collects_all_structural_errors() {
        let hops = vec![
            Hop::constant_product(t(0x10), t(1), t(1)),
            Hop::constant_product(t(0x10), t(2), t(3)),
            Hop::constant_product(t(0x10), t(3), t(4)),
        ];
        let result = check_structure(&hops);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn fee_tier_must_match_kind() {
        let mut hop = Hop::constant_product(t(0x10), t(1), t(2));
        hop.fee_tier = Some(FeeTier::new(30));
        let result = check_structure(&[hop]);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["hop 0: ConstantProduct hop with fee tier 30bps".to_string()]
        );

        let mut hop = Hop::concentrated(t(0x10), t(1), t(2), FeeTier::new(30));
        hop.fee_tier = None;
        let result = check_structure(&[hop]);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["hop 0: ConcentratedLiquidity hop without fee tier".to_string()]
        );

        let hop = Hop::concentrated(t(0x10), t(1), t(2), FeeTier::new(30));
        assert!(check_structure(&[hop]).is_valid);
    }

    #[test]
    fn cycle_is_rejected() {
        let hops = [
            Hop::constant_product(t(0x10), t(1), t(2)),
            Hop::constant_product(t(0x10), t(2), t(1)),
        ];
        assert!(!check_structure(&hops).is_valid);
    }

    #[test]
    fn storage_checks_registry_and_tiers() {
        let cap = OwnerCap::for_tests();
        let mut storage =
            RouterStorage::from_config(&RouterConfig::for_owner(t(0xee))).unwrap();
        let v2 = t(0x10);
        let v3 = t(0x20);

        let hop = Hop::constant_product(v2, t(1), t(2));
        assert_eq!(
            validate_path(&storage, &[hop]),
            Err(RouterError::UnknownRouter(v2))
        );

        storage
            .registry
            .add(&cap, v2, RouterKind::ConstantProduct)
            .unwrap();
        assert!(validate_path(&storage, &[hop]).is_ok());

        storage.registry.set_active(&cap, v2, false).unwrap();
        assert_eq!(
            validate_path(&storage, &[hop]),
            Err(RouterError::UnknownRouter(v2))
        );

        storage
            .registry
            .add(&cap, v3, RouterKind::ConcentratedLiquidity)
            .unwrap();
        let tiered = Hop::concentrated(v3, t(1), t(2), FeeTier::new(42));
        assert_eq!(
            validate_path(&storage, &[tiered]),
            Err(RouterError::UnsupportedFeeTier(FeeTier::new(42)))
        );

        let wrong_kind = Hop::constant_product(v3, t(1), t(2));
        assert!(matches!(
            validate_path(&storage, &[wrong_kind]),
            Err(RouterError::InvalidPath(_))
        ));
    }
}
