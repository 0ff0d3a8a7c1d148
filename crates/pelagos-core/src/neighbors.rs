//! Compressed neighbor list handed to filter engines.
//!
//! Neighbor search itself lives outside this workspace; [`NeighborList`]
//! is only the boundary type the search produces and the filters consume.

/// Per-particle neighbor indices in compressed sparse row layout.
///
/// `offsets` has `particle_count + 1` monotonically non-decreasing
/// entries; the neighbors of particle `i` are
/// `indices[offsets[i]..offsets[i + 1]]`. A particle never lists itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborList {
    offsets: Vec<u32>,
    indices: Vec<u32>,
}

impl NeighborList {
    /// Build from one neighbor collection per particle.
    ///
    /// Self references are dropped.
    pub fn from_lists<L, I>(lists: L) -> Self
    where
        L: IntoIterator<Item = I>,
        I: IntoIterator<Item = u32>,
    {
        let mut offsets = vec![0u32];
        let mut indices = Vec::new();
        for (i, list) in lists.into_iter().enumerate() {
            indices.extend(list.into_iter().filter(|&j| j as usize != i));
            offsets.push(indices.len() as u32);
        }
        Self { offsets, indices }
    }

    /// Build from raw CSR arrays.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `offsets` is empty, decreasing, does not end at
    /// `indices.len()`, or if any index points past the particle count.
    pub fn from_csr(offsets: Vec<u32>, indices: Vec<u32>) -> Result<Self, String> {
        let Some(&last) = offsets.last() else {
            return Err("offsets must contain at least one entry".to_string());
        };
        if offsets[0] != 0 {
            return Err(format!("offsets must start at 0, got {}", offsets[0]));
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err("offsets must be non-decreasing".to_string());
        }
        if last as usize != indices.len() {
            return Err(format!(
                "last offset {last} does not match {} indices",
                indices.len()
            ));
        }
        let particle_count = offsets.len() - 1;
        if let Some(&bad) = indices.iter().find(|&&j| j as usize >= particle_count) {
            return Err(format!(
                "neighbor index {bad} out of range for {particle_count} particles"
            ));
        }
        Ok(Self { offsets, indices })
    }

    /// Number of particles the list covers.
    pub fn particle_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Neighbors of particle `i`, empty if `i` is out of range.
    pub fn neighbors_of(&self, i: usize) -> &[u32] {
        match (self.offsets.get(i), self.offsets.get(i + 1)) {
            (Some(&start), Some(&end)) => &self.indices[start as usize..end as usize],
            _ => &[],
        }
    }

    /// Total number of stored (directed) neighbor entries.
    pub fn entry_count(&self) -> usize {
        self.indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_lists_drops_self() {
        let list = NeighborList::from_lists(vec![vec![0, 1, 2], vec![0], vec![]]);
        assert_eq!(list.particle_count(), 3);
        assert_eq!(list.neighbors_of(0), &[1, 2]);
        assert_eq!(list.neighbors_of(1), &[0]);
        assert!(list.neighbors_of(2).is_empty());
        assert_eq!(list.entry_count(), 3);
    }

    #[test]
    fn out_of_range_particle_has_no_neighbors() {
        let list = NeighborList::from_lists(vec![vec![1u32], vec![0]]);
        assert!(list.neighbors_of(7).is_empty());
    }

    #[test]
    fn from_csr_validates() {
        assert!(NeighborList::from_csr(vec![], vec![]).is_err());
        assert!(NeighborList::from_csr(vec![1, 1], vec![0]).is_err());
        assert!(NeighborList::from_csr(vec![0, 2, 1], vec![1, 0]).is_err());
        assert!(NeighborList::from_csr(vec![0, 1], vec![]).is_err());
        assert!(NeighborList::from_csr(vec![0, 1, 2], vec![5, 0]).is_err());

        let ok = NeighborList::from_csr(vec![0, 1, 2], vec![1, 0]).unwrap();
        assert_eq!(ok.neighbors_of(0), &[1]);
    }

    #[test]
    fn empty_list_has_zero_particles() {
        let list = NeighborList::default();
        assert_eq!(list.particle_count(), 0);
        assert!(list.neighbors_of(0).is_empty());
    }
}
