//! Mapping between pattern and host nodes.

use contracts::*;
use serde::{Deserialize, Serialize};

/// A complete, validated node mapping: index is the pattern node, value is its
/// image in the host.
///
/// For full isomorphism this is a bijection; for subgraph matching it is
/// injective.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeMapping(Vec<usize>);

impl NodeMapping {
    /// Image of pattern node `p`.
    #[must_use]
    pub fn get(&self, p: usize) -> usize {
        self.0[p]
    }

    /// Images indexed by pattern node.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of mapped pattern nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the mapping of an empty pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(pattern, host)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().copied().enumerate()
    }

    /// Sorted host nodes covered by this mapping.
    #[must_use]
    pub fn signature(&self) -> Vec<usize> {
        let mut sig = self.0.clone();
        sig.sort_unstable();
        sig
    }

    /// Consume into the raw image list.
    #[must_use]
    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

/// A partial mapping built up and torn down during the search.
#[derive(Clone, Debug)]
pub(crate) struct PartialMapping {
    /// Pattern to host node mapping
    pattern_to_host: Vec<Option<usize>>,
    /// Host to pattern node mapping
    host_to_pattern: Vec<Option<usize>>,
    len: usize,
}

impl PartialMapping {
    #[debug_ensures(ret.is_consistent())]
    pub(crate) fn new(pattern_nodes: usize, host_nodes: usize) -> Self {
        Self {
            pattern_to_host: vec![None; pattern_nodes],
            host_to_pattern: vec![None; host_nodes],
            len: 0,
        }
    }

    /// Checks that both directions agree and the length is accurate.
    pub(crate) fn is_consistent(&self) -> bool {
        let forward = self
            .pattern_to_host
            .iter()
            .enumerate()
            .filter_map(|(p, h)| h.map(|h| (p, h)));
        let mut count = 0;
        for (p, h) in forward {
            count += 1;
            if self.host_to_pattern.get(h).copied().flatten() != Some(p) {
                return false;
            }
        }
        let backward = self.host_to_pattern.iter().flatten().count();
        count == self.len && backward == self.len
    }

    pub(crate) fn image(&self, p: usize) -> Option<usize> {
        self.pattern_to_host[p]
    }

    pub(crate) fn host_is_free(&self, h: usize) -> bool {
        self.host_to_pattern[h].is_none()
    }

    /// Mapped `(pattern, host)` pairs.
    pub(crate) fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pattern_to_host
            .iter()
            .enumerate()
            .filter_map(|(p, h)| h.map(|h| (p, h)))
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn done(&self) -> bool {
        self.len == self.pattern_to_host.len()
    }

    #[debug_requires(self.image(p).is_none())]
    #[debug_requires(self.host_is_free(h))]
    #[debug_ensures(self.image(p) == Some(h))]
    #[debug_ensures(self.is_consistent())]
    pub(crate) fn assign(&mut self, p: usize, h: usize) {
        self.pattern_to_host[p] = Some(h);
        self.host_to_pattern[h] = Some(p);
        self.len += 1;
    }

    #[debug_requires(self.image(p).is_some())]
    #[debug_ensures(self.image(p).is_none())]
    #[debug_ensures(self.is_consistent())]
    pub(crate) fn unassign(&mut self, p: usize) {
        if let Some(h) = self.pattern_to_host[p].take() {
            self.host_to_pattern[h] = None;
            self.len -= 1;
        }
    }

    /// Snapshot a finished mapping.
    #[debug_requires(self.done())]
    #[debug_ensures(ret.len() == self.pattern_to_host.len())]
    pub(crate) fn to_complete(&self) -> NodeMapping {
        NodeMapping(self.pattern_to_host.iter().flatten().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_consistency() {
        let mut st = PartialMapping::new(2, 3);
        st.assign(0, 2);
        assert_eq!(st.len(), 1);
        assert_eq!(st.image(0), Some(2));
        assert!(!st.host_is_free(2));
        assert!(st.is_consistent());

        st.assign(1, 0);
        assert!(st.done());
        assert_eq!(st.to_complete().as_slice(), &[2, 0]);

        st.unassign(0);
        assert_eq!(st.len(), 1);
        assert!(st.host_is_free(2));
        assert!(!st.done());
        assert_eq!(st.pairs().collect::<Vec<_>>(), vec![(1, 0)]);
    }

    #[test]
    fn mapping_signature_is_sorted() {
        let m = NodeMapping(vec![3, 0, 2]);
        assert_eq!(m.signature(), vec![0, 2, 3]);
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![(0, 3), (1, 0), (2, 2)]);
    }
}
