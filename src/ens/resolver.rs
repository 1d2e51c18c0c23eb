//! Incremental reverse resolution of account names

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::lookup::NameLookupService;
use super::order::ResolutionOrder;
use crate::account::{Account, ChainId, EnsByAccountAddress};

/// Lifecycle of one resolution pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionState {
    Idle,
    Resolving,
    Completed,
    Cancelled,
}

impl ResolutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolutionState::Completed | ResolutionState::Cancelled)
    }
}

/// What a pass produced before it finished or was stopped
#[derive(Clone, Debug, PartialEq)]
pub struct ResolutionOutcome {
    pub state: ResolutionState,
    pub names: EnsByAccountAddress,
    /// Indices attempted, in order
    pub attempted: Vec<usize>,
}

/// Liveness flag shared between a pass and its owner
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Liveness(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves names one lookup at a time, nearest to the selection first.
pub struct EnsResolver<L> {
    lookup: L,
}

impl<L: NameLookupService> EnsResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Run one pass over `accounts`, starting at `start`.
    ///
    /// `publish` receives the accumulated mapping after every attempted
    /// index. Once `alive` is cleared no further lookup is issued and nothing
    /// more is published.
    pub async fn resolve<F>(
        &self,
        accounts: &[Account],
        start: usize,
        chain: ChainId,
        alive: &Liveness,
        mut publish: F,
    ) -> ResolutionOutcome
    where
        F: FnMut(&EnsByAccountAddress),
    {
        let mut outcome = ResolutionOutcome {
            state: ResolutionState::Resolving,
            names: EnsByAccountAddress::new(),
            attempted: Vec::with_capacity(accounts.len()),
        };

        for index in ResolutionOrder::new(accounts.len(), start) {
            if !alive.is_alive() {
                outcome.state = ResolutionState::Cancelled;
                break;
            }

            let address = &accounts[index].address;
            outcome.attempted.push(index);
            match self.lookup.reverse_lookup(address, chain).await {
                Ok(Some(name)) if !name.is_empty() => {
                    outcome.names.insert(address.clone(), name);
                }
                Ok(_) => debug!("No ENS name for {}", address),
                Err(e) => debug!("ENS lookup failed for {}: {}", address, e),
            }

            // Owner may have gone away while the lookup was in flight
            if !alive.is_alive() {
                outcome.state = ResolutionState::Cancelled;
                break;
            }
            publish(&outcome.names);
        }

        if outcome.state == ResolutionState::Resolving {
            outcome.state = ResolutionState::Completed;
        }
        info!(
            "ENS pass on {} {:?}: {} of {} attempted, {} resolved",
            chain,
            outcome.state,
            outcome.attempted.len(),
            accounts.len(),
            outcome.names.len()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::KeyringType;
    use crate::error::AccountsError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn accounts(n: usize) -> Vec<Account> {
        (0..n)
            .map(|i| Account {
                name: format!("Account {}", i + 1),
                address: format!("0x{:040x}", i + 1),
                keyring: KeyringType::Hd,
                y_offset: 78 * i as u32,
                is_selected: false,
                assets: None,
                balance_error: None,
            })
            .collect()
    }

    fn index_of(address: &str) -> usize {
        usize::from_str_radix(&address[2..], 16).unwrap() - 1
    }

    /// Records call order; optionally fails one index and cancels after N calls
    struct Recording {
        calls: Mutex<Vec<usize>>,
        fail_index: Option<usize>,
        cancel_after: Option<(usize, Liveness)>,
    }

    impl Recording {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_index: None,
                cancel_after: None,
            }
        }

        fn calls(&self) -> Vec<usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NameLookupService for Recording {
        async fn reverse_lookup(
            &self,
            address: &str,
            _chain: ChainId,
        ) -> Result<Option<String>, AccountsError> {
            let index = index_of(address);
            let count = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(index);
                calls.len()
            };
            if let Some((n, alive)) = &self.cancel_after {
                if count == *n {
                    alive.cancel();
                }
            }
            tokio::task::yield_now().await;
            if self.fail_index == Some(index) {
                return Err(AccountsError::Lookup("resolver unreachable".to_string()));
            }
            Ok(Some(format!("account{}.eth", index)))
        }
    }

    #[tokio::test]
    async fn test_bidirectional_order() {
        let resolver = EnsResolver::new(Recording::new());
        let list = accounts(5);
        let mut published = Vec::new();
        let outcome = resolver
            .resolve(&list, 2, ChainId::MAINNET, &Liveness::new(), |names| {
                published.push(names.len())
            })
            .await;

        assert_eq!(resolver.lookup().calls(), vec![2, 1, 3, 0, 4]);
        assert_eq!(outcome.attempted, vec![2, 1, 3, 0, 4]);
        assert_eq!(outcome.state, ResolutionState::Completed);
        assert_eq!(outcome.names.len(), 5);
        // Snapshots only ever grow
        assert_eq!(published, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_edge_starting_points() {
        let list = accounts(5);

        let resolver = EnsResolver::new(Recording::new());
        resolver.resolve(&list, 0, ChainId::MAINNET, &Liveness::new(), |_| {}).await;
        assert_eq!(resolver.lookup().calls(), vec![0, 1, 2, 3, 4]);

        let resolver = EnsResolver::new(Recording::new());
        resolver.resolve(&list, 4, ChainId::MAINNET, &Liveness::new(), |_| {}).await;
        assert_eq!(resolver.lookup().calls(), vec![4, 3, 2, 1, 0]);

        let resolver = EnsResolver::new(Recording::new());
        resolver.resolve(&list, 99, ChainId::MAINNET, &Liveness::new(), |_| {}).await;
        assert_eq!(resolver.lookup().calls(), vec![4, 3, 2, 1, 0]);
    }

    #[tokio::test]
    async fn test_empty_list_does_nothing() {
        let resolver = EnsResolver::new(Recording::new());
        let mut published = 0;
        let outcome = resolver
            .resolve(&[], 0, ChainId::MAINNET, &Liveness::new(), |_| published += 1)
            .await;
        assert!(resolver.lookup().calls().is_empty());
        assert_eq!(published, 0);
        assert_eq!(outcome.state, ResolutionState::Completed);
    }

    #[tokio::test]
    async fn test_cancellation_stops_lookups_and_publication() {
        let alive = Liveness::new();
        let mut lookup = Recording::new();
        lookup.cancel_after = Some((2, alive.clone()));
        let resolver = EnsResolver::new(lookup);
        let list = accounts(5);

        let mut published = Vec::new();
        let outcome = resolver
            .resolve(&list, 2, ChainId::MAINNET, &alive, |names| published.push(names.clone()))
            .await;

        assert_eq!(resolver.lookup().calls(), vec![2, 1]);
        assert_eq!(outcome.state, ResolutionState::Cancelled);
        assert!(outcome.state.is_terminal());
        assert!(outcome.names.len() <= 2);
        // Only the step finished before cancellation was published
        assert_eq!(published.len(), 1);
        assert!(published.iter().all(|names| names.len() <= 2));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let alive = Liveness::new();
        alive.cancel();
        let resolver = EnsResolver::new(Recording::new());
        let outcome = resolver
            .resolve(&accounts(3), 1, ChainId::MAINNET, &alive, |_| panic!("published after cancel"))
            .await;
        assert!(resolver.lookup().calls().is_empty());
        assert_eq!(outcome.state, ResolutionState::Cancelled);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_tolerated() {
        let mut lookup = Recording::new();
        lookup.fail_index = Some(1);
        let resolver = EnsResolver::new(lookup);
        let list = accounts(5);

        let outcome = resolver
            .resolve(&list, 2, ChainId::MAINNET, &Liveness::new(), |_| {})
            .await;

        assert_eq!(outcome.state, ResolutionState::Completed);
        assert_eq!(outcome.names.len(), 4);
        assert!(!outcome.names.contains_key(&list[1].address));
        for i in [0, 2, 3, 4] {
            assert_eq!(outcome.names.get(&list[i].address), Some(&format!("account{}.eth", i)));
        }
    }
}
