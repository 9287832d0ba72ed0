//! Run-scoped resolution caches.

use std::sync::Arc;

use dashmap::DashMap;
use rendu_carton::{CompactString, FilePath};

use crate::graph::{ComponentEntry, PropContract};
use crate::identity::ComponentIdentity;

/// Caches shared by every resolution call of one analysis run.
///
/// Create one per run and call [`reset`](Self::reset) (or drop it) before an
/// independent run, so cross-file declarations never leak between runs.
/// Population is idempotent, so concurrent hosts can share one context
/// through `&` references.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    /// `(file, local name)` → identity
    identities: DashMap<(FilePath, CompactString), Option<ComponentIdentity>>,
    /// Cross-file declaration pulls, keyed by the resolved identity
    entries: DashMap<ComponentIdentity, Option<Arc<ComponentEntry>>>,
    /// Per-prop `@renders` contracts of a component's props type
    prop_contracts: DashMap<ComponentIdentity, Arc<[PropContract]>>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached resolution.
    pub fn reset(&self) {
        self.identities.clear();
        self.entries.clear();
        self.prop_contracts.clear();
    }

    pub(crate) fn cached_identity(
        &self,
        file: &str,
        name: &str,
    ) -> Option<Option<ComponentIdentity>> {
        self.identities
            .get(&(FilePath::new(file), CompactString::new(name)))
            .map(|cached| cached.value().clone())
    }

    pub(crate) fn store_identity(
        &self,
        file: &str,
        name: &str,
        identity: Option<ComponentIdentity>,
    ) {
        self.identities
            .insert((FilePath::new(file), CompactString::new(name)), identity);
    }

    pub(crate) fn cached_entry(
        &self,
        identity: &ComponentIdentity,
    ) -> Option<Option<Arc<ComponentEntry>>> {
        self.entries.get(identity).map(|cached| cached.value().clone())
    }

    pub(crate) fn store_entry(
        &self,
        identity: ComponentIdentity,
        entry: Option<Arc<ComponentEntry>>,
    ) {
        self.entries.insert(identity, entry);
    }

    pub(crate) fn cached_prop_contracts(
        &self,
        identity: &ComponentIdentity,
    ) -> Option<Arc<[PropContract]>> {
        self.prop_contracts
            .get(identity)
            .map(|cached| Arc::clone(cached.value()))
    }

    pub(crate) fn store_prop_contracts(
        &self,
        identity: ComponentIdentity,
        contracts: Arc<[PropContract]>,
    ) {
        self.prop_contracts.insert(identity, contracts);
    }

    /// Number of cached identity resolutions.
    pub fn cached_identities(&self) -> usize {
        self.identities.len()
    }

    /// Number of cached cross-file declaration pulls.
    pub fn cached_declarations(&self) -> usize {
        self.entries.len()
    }
}
