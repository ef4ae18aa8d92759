use indexmap::{map::Entry, IndexMap};
use serde::Serialize;

use crate::{chain::RainbowChain, hash::Digest, password::Password};

/// Maps the endpoints of a rainbow table to the startpoints of the chains ending there.
///
/// Chains whose endpoints collide are all kept: the startpoint is appended to the list
/// of the existing endpoint instead of being discarded.
/// The insertion order is remembered so that the stored tables are reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RainbowChainMap {
    inner: IndexMap<Digest, Vec<Password>>,
}

impl RainbowChainMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: IndexMap::with_capacity(capacity),
        }
    }

    /// Rebuilds a map read from a stored table.
    /// The startpoints still have to be checked against the table context.
    pub(crate) fn from_stored(stored: IndexMap<Digest, Vec<String>>) -> Self {
        let inner = stored
            .into_iter()
            .map(|(endpoint, startpoints)| {
                let startpoints = startpoints
                    .into_iter()
                    .map(|startpoint| Password::from_raw(startpoint.into_bytes()))
                    .collect();
                (endpoint, startpoints)
            })
            .collect();

        Self { inner }
    }

    /// Inserts a chain. Returns `true` if its endpoint was not in the map yet.
    #[inline]
    pub fn insert(&mut self, chain: RainbowChain) -> bool {
        match self.inner.entry(chain.endpoint) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().push(chain.startpoint);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(vec![chain.startpoint]);
                true
            }
        }
    }

    /// Returns the startpoints associated to an endpoint, if it exists.
    #[inline]
    pub fn get(&self, endpoint: &Digest) -> Option<&[Password]> {
        self.inner.get(endpoint).map(Vec::as_slice)
    }

    /// The number of distinct endpoints.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The number of chains, counting colliding ones.
    pub fn chain_count(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &[Password])> {
        self.inner
            .iter()
            .map(|(endpoint, startpoints)| (endpoint, startpoints.as_slice()))
    }
}

impl Extend<RainbowChain> for RainbowChainMap {
    fn extend<T: IntoIterator<Item = RainbowChain>>(&mut self, iter: T) {
        for chain in iter {
            self.insert(chain);
        }
    }
}

impl FromIterator<RainbowChain> for RainbowChainMap {
    fn from_iter<T: IntoIterator<Item = RainbowChain>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
