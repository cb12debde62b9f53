// Token ledger
// ERC-20 style balances for every token known to the simulated chain.
// The router contract, venues and traders are all plain holders here
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::errors::RouterError;
use crate::quant::checked_add;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    tokens: BTreeMap<Address, Token>,
    balances: HashMap<(Address, Address), U256>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, token: Token) -> Result<(), RouterError> {
        if token.address.is_zero() {
            return Err(RouterError::ZeroAddress);
        }
        self.tokens.insert(token.address, token);
        Ok(())
    }

    pub fn token(&self, address: Address) -> Option<&Token> {
        self.tokens.get(&address)
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) -> Result<(), RouterError> {
        if !self.tokens.contains_key(&token) {
            return Err(RouterError::UnknownToken(token));
        }
        let slot = self.balances.entry((token, to)).or_insert(U256::ZERO);
        *slot = checked_add(*slot, amount)?;
        Ok(())
    }

    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), RouterError> {
        if !self.tokens.contains_key(&token) {
            return Err(RouterError::UnknownToken(token));
        }
        if to.is_zero() {
            return Err(RouterError::ZeroAddress);
        }
        let available = self.balance_of(token, from);
        if available < amount {
            return Err(RouterError::InsufficientBalance {
                token,
                holder: from,
                needed: amount,
                available,
            });
        }
        if from == to || amount.is_zero() {
            return Ok(());
        }
        self.balances.insert((token, from), available - amount);
        let slot = self.balances.entry((token, to)).or_insert(U256::ZERO);
        *slot = checked_add(*slot, amount)?;
        Ok(())
    }

    /// Sum of all balances of `token`; constant under transfers.
    pub fn total_supply(&self, token: Address) -> Result<U256, RouterError> {
        self.balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .try_fold(U256::ZERO, |acc, (_, v)| checked_add(acc, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Ledger, Address, Address, Address) {
        let mut ledger = Ledger::new();
        let tok = Address::repeat_byte(0xaa);
        ledger.register(Token::new(tok, "AAA", 18)).unwrap();
        (ledger, tok, Address::repeat_byte(1), Address::repeat_byte(2))
    }

    #[test]
    fn transfer_moves_balance_and_keeps_supply() {
        let (mut ledger, tok, alice, bob) = setup();
        ledger.mint(tok, alice, U256::from(100u64)).unwrap();
        ledger.transfer(tok, alice, bob, U256::from(40u64)).unwrap();
        assert_eq!(ledger.balance_of(tok, alice), U256::from(60u64));
        assert_eq!(ledger.balance_of(tok, bob), U256::from(40u64));
        assert_eq!(ledger.total_supply(tok).unwrap(), U256::from(100u64));
    }

    #[test]
    fn overdraft_is_rejected() {
        let (mut ledger, tok, alice, bob) = setup();
        ledger.mint(tok, alice, U256::from(5u64)).unwrap();
        let Err(RouterError::InsufficientBalance { needed, available, .. }) =
            ledger.transfer(tok, alice, bob, U256::from(6u64))
        else {
            panic!("expected InsufficientBalance");
        };
        assert_eq!(needed, U256::from(6u64));
        assert_eq!(available, U256::from(5u64));
        assert_eq!(ledger.balance_of(tok, bob), U256::ZERO);
    }

    #[test]
    fn unknown_token_rejected() {
        let (mut ledger, _, alice, _) = setup();
        let other = Address::repeat_byte(0xbb);
        assert_eq!(
            ledger.mint(other, alice, U256::from(1u64)),
            Err(RouterError::UnknownToken(other))
        );
        assert!(ledger.token(other).is_none());
    }
}
