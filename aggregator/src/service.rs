// Router service
// Async handle shared between tasks. Calls queue on one mutex so the
// chain applies them in a total order, each against a consistent state
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::chain::{Chain, Receipt};
use crate::errors::RouterError;
use crate::router::{Hop, Quote, SwapOutcome};

/// Swap statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionStats {
    pub total_executions: u64,
    pub successful_executions: u64,
    pub failed_executions: u64,
    pub success_rate: f64,
}

#[derive(Debug, Default)]
struct Counters {
    total_executions: AtomicU64,
    successful_executions: AtomicU64,
    failed_executions: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct RouterService {
    chain: Arc<Mutex<Chain>>,
    counters: Arc<Counters>,
}

impl RouterService {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain: Arc::new(Mutex::new(chain)),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Exclusive access to the chain, e.g. for setup or inspection.
    pub async fn with_chain<R>(&self, f: impl FnOnce(&mut Chain) -> R) -> R {
        let mut chain = self.chain.lock().await;
        f(&mut chain)
    }

    pub async fn quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<Quote, RouterError> {
        self.chain.lock().await.quote(token_in, token_out, amount_in)
    }

    pub async fn execute_swap(
        &self,
        caller: Address,
        hops: Vec<Hop>,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<Receipt<SwapOutcome>, RouterError> {
        let result = self
            .chain
            .lock()
            .await
            .execute_swap(caller, &hops, amount_in, min_amount_out, deadline);
        self.record(caller, &result);
        result
    }

    pub async fn execute_best_swap(
        &self,
        caller: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<Receipt<SwapOutcome>, RouterError> {
        let result = self.chain.lock().await.execute_best_swap(
            caller,
            token_in,
            token_out,
            amount_in,
            min_amount_out,
            deadline,
        );
        self.record(caller, &result);
        result
    }

    pub fn get_stats(&self) -> ExecutionStats {
        let total = self.counters.total_executions.load(Ordering::Relaxed);
        let successful = self.counters.successful_executions.load(Ordering::Relaxed);
        let failed = self.counters.failed_executions.load(Ordering::Relaxed);
        ExecutionStats {
            total_executions: total,
            successful_executions: successful,
            failed_executions: failed,
            success_rate: if total > 0 {
                successful as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    fn record(&self, caller: Address, result: &Result<Receipt<SwapOutcome>, RouterError>) {
        self.counters.total_executions.fetch_add(1, Ordering::Relaxed);
        match result {
            Ok(receipt) => {
                self.counters
                    .successful_executions
                    .fetch_add(1, Ordering::Relaxed);
                info!(
                    caller = %caller,
                    block = receipt.block,
                    tx_hash = %receipt.tx_hash,
                    amount_out = %receipt.value.amount_out,
                    "swap committed"
                );
            }
            Err(e) => {
                self.counters.failed_executions.fetch_add(1, Ordering::Relaxed);
                warn!(caller = %caller, code = e.code(), error = %e, "swap failed");
            }
        }
    }
}
