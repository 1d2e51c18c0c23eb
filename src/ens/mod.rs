//! ENS reverse resolution for account lists

pub mod lookup;
pub mod namehash;
pub mod order;
pub mod resolver;

pub use lookup::{CachedLookup, NameLookupService};
pub use order::ResolutionOrder;
pub use resolver::{EnsResolver, Liveness, ResolutionOutcome, ResolutionState};
