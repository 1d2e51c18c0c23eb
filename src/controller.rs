//! Long-lived owner of the account list and its name resolution pass

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::account::{
    aggregate, Account, AccountSource, Aggregation, AggregationInput, BalanceSource,
    BalanceValidator, ChainId, EnsByAccountAddress, ItemLayout, RateSource,
};
use crate::ens::{EnsResolver, Liveness, NameLookupService, ResolutionOutcome, ResolutionState};

/// Display knobs that are not part of the wallet state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplaySettings {
    pub multi_account_balances: bool,
    pub layout: ItemLayout,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            multi_account_balances: true,
            layout: ItemLayout::default(),
        }
    }
}

struct ResolutionPass {
    chain: ChainId,
    addresses: Vec<String>,
    alive: Liveness,
    task: Option<JoinHandle<ResolutionOutcome>>,
}

/// Re-aggregates on every refresh and keeps at most one resolution pass
/// running. Consumers read results through the watch channels.
pub struct AccountsController {
    lookup: Arc<dyn NameLookupService>,
    settings: DisplaySettings,
    validator: Option<Arc<dyn BalanceValidator>>,
    accounts_tx: watch::Sender<Arc<Vec<Account>>>,
    names_tx: Arc<watch::Sender<Arc<EnsByAccountAddress>>>,
    state_tx: Arc<watch::Sender<ResolutionState>>,
    last: Aggregation,
    current: Option<ResolutionPass>,
}

impl AccountsController {
    pub fn new(lookup: Arc<dyn NameLookupService>, settings: DisplaySettings) -> Self {
        let (accounts_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (names_tx, _) = watch::channel(Arc::new(EnsByAccountAddress::new()));
        let (state_tx, _) = watch::channel(ResolutionState::Idle);
        Self {
            lookup,
            settings,
            validator: None,
            accounts_tx,
            names_tx: Arc::new(names_tx),
            state_tx: Arc::new(state_tx),
            last: Aggregation::default(),
            current: None,
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn BalanceValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn subscribe_accounts(&self) -> watch::Receiver<Arc<Vec<Account>>> {
        self.accounts_tx.subscribe()
    }

    pub fn subscribe_names(&self) -> watch::Receiver<Arc<EnsByAccountAddress>> {
        self.names_tx.subscribe()
    }

    pub fn accounts(&self) -> Arc<Vec<Account>> {
        self.accounts_tx.borrow().clone()
    }

    pub fn names(&self) -> Arc<EnsByAccountAddress> {
        self.names_tx.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ResolutionState> {
        self.state_tx.subscribe()
    }

    /// `Idle` until the first refresh, then the state of the latest pass
    pub fn resolution_state(&self) -> ResolutionState {
        *self.state_tx.borrow()
    }

    pub fn is_resolving(&self) -> bool {
        self.current
            .as_ref()
            .and_then(|p| p.task.as_ref())
            .map(|t| !t.is_finished())
            .unwrap_or(false)
    }

    /// Recompute the account list from the sources.
    ///
    /// A new resolution pass starts only when the address list or the chain
    /// changed; balance or rate changes keep the names already resolved.
    /// While the account source is still loading, nothing is recomputed and
    /// the previous result is returned. Must be called from within a tokio
    /// runtime.
    pub fn refresh(
        &mut self,
        accounts: &dyn AccountSource,
        balances: &dyn BalanceSource,
        rates: &dyn RateSource,
        chain: ChainId,
        ticker: &str,
    ) -> Aggregation {
        if accounts.is_loading() {
            debug!("Account source still loading, keeping previous list");
            return self.last.clone();
        }
        let raw = accounts.accounts();
        let selected = accounts.selected_address();
        let balance_map = balances.balances(chain);
        let rate = rates.rate();

        let aggregation = aggregate(&AggregationInput {
            accounts: &raw,
            selected_address: &selected,
            balances: &balance_map,
            rate: &rate,
            ticker,
            multi_account_balances: self.settings.multi_account_balances,
            layout: self.settings.layout,
            validator: self.validator.as_deref(),
        });
        debug!(
            "Aggregated {} accounts on {} (selected: {:?})",
            aggregation.accounts.len(),
            chain,
            aggregation.selected_index
        );
        self.accounts_tx.send_replace(Arc::new(aggregation.accounts.clone()));

        let addresses = aggregation.addresses();
        let unchanged = self
            .current
            .as_ref()
            .map(|p| p.chain == chain && p.addresses == addresses)
            .unwrap_or(false);
        if !unchanged {
            self.start_pass(&aggregation, chain, addresses);
        }
        self.last = aggregation.clone();
        aggregation
    }

    fn start_pass(&mut self, aggregation: &Aggregation, chain: ChainId, addresses: Vec<String>) {
        self.cancel_current();
        self.names_tx.send_replace(Arc::new(EnsByAccountAddress::new()));
        self.state_tx.send_replace(ResolutionState::Resolving);

        let alive = Liveness::new();
        let start = aggregation.resolution_start();
        info!(
            "Starting ENS pass on {} over {} accounts from index {}",
            chain,
            addresses.len(),
            start
        );

        let resolver = EnsResolver::new(self.lookup.clone());
        let accounts = aggregation.accounts.clone();
        let names_tx = self.names_tx.clone();
        let state_tx = self.state_tx.clone();
        let pass_alive = alive.clone();
        let task = tokio::spawn(async move {
            let publish_alive = pass_alive.clone();
            let outcome = resolver
                .resolve(&accounts, start, chain, &pass_alive, move |names| {
                    // Checked under the channel lock so a cancelled pass can
                    // never overwrite the next pass's snapshot
                    names_tx.send_if_modified(|current| {
                        if !publish_alive.is_alive() {
                            return false;
                        }
                        *current = Arc::new(names.clone());
                        true
                    });
                })
                .await;
            state_tx.send_if_modified(|state| {
                if !pass_alive.is_alive() {
                    return false;
                }
                *state = outcome.state;
                true
            });
            outcome
        });

        self.current = Some(ResolutionPass {
            chain,
            addresses,
            alive,
            task: Some(task),
        });
    }

    fn cancel_current(&mut self) {
        if let Some(pass) = self.current.take() {
            pass.alive.cancel();
            self.state_tx.send_if_modified(|state| {
                if *state != ResolutionState::Resolving {
                    return false;
                }
                *state = ResolutionState::Cancelled;
                true
            });
            if pass.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false) {
                debug!("Cancelled in-flight ENS pass on {}", pass.chain);
            }
        }
    }

    /// Wait for the running pass to finish; `None` if there is none or it
    /// was already awaited
    pub async fn wait_for_resolution(&mut self) -> Option<ResolutionOutcome> {
        let task = self.current.as_mut()?.task.take()?;
        match task.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("ENS pass task failed: {}", e);
                None
            }
        }
    }

    /// Teardown: stop the running pass; nothing is published afterwards
    pub fn shutdown(&mut self) {
        self.cancel_current();
    }
}

impl Drop for AccountsController {
    fn drop(&mut self) {
        self.cancel_current();
    }
}
