//! Trade network - how far apart regions are for trading purposes
//!
//! Distance is whatever the deployment measures (map hops, travel days);
//! the trade engine only compares it against the configured radius.

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::core::error::{EconomyError, Result};
use crate::core::types::RegionId;
use crate::region::RegionSpec;

/// Spatial collaborator consulted when discovering trade partners
pub trait TradeNetwork: Send {
    /// Distance between two regions, `None` if unreachable
    fn distance(&self, from: RegionId, to: RegionId) -> Option<u32>;

    fn within_radius(&self, from: RegionId, to: RegionId, radius: u32) -> bool {
        self.distance(from, to).is_some_and(|d| d <= radius)
    }
}

/// Hop-count network over an undirected adjacency graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionGraph {
    neighbors: Vec<Vec<RegionId>>,
    /// All-pairs hop counts, filled at construction
    hops: Vec<Vec<Option<u32>>>,
}

impl RegionGraph {
    /// Build from an adjacency list indexed by region id
    pub fn new(mut neighbors: Vec<Vec<RegionId>>) -> Self {
        // Make every edge symmetric
        let n = neighbors.len();
        for a in 0..n {
            for b in neighbors[a].clone() {
                if let Some(list) = neighbors.get_mut(b.index()) {
                    if !list.contains(&RegionId(a as u32)) {
                        list.push(RegionId(a as u32));
                    }
                }
            }
        }
        for list in &mut neighbors {
            list.sort();
            list.dedup();
        }

        let hops = (0..n).map(|start| bfs_hops(&neighbors, start)).collect();
        Self { neighbors, hops }
    }

    /// Build from scenario region specs, resolving neighbor names
    pub fn from_specs(specs: &[RegionSpec]) -> Result<Self> {
        let index: AHashMap<&str, RegionId> = specs
            .iter()
            .enumerate()
            .map(|(idx, spec)| (spec.name.as_str(), RegionId(idx as u32)))
            .collect();

        let neighbors = specs
            .iter()
            .map(|spec| {
                spec.neighbors
                    .iter()
                    .map(|name| {
                        index
                            .get(name.as_str())
                            .copied()
                            .ok_or_else(|| EconomyError::UnknownRegion(name.clone()))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(neighbors))
    }

    pub fn neighbors(&self, region: RegionId) -> &[RegionId] {
        self.neighbors
            .get(region.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn bfs_hops(neighbors: &[Vec<RegionId>], start: usize) -> Vec<Option<u32>> {
    let mut hops = vec![None; neighbors.len()];
    let mut queue = VecDeque::new();
    hops[start] = Some(0);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let depth = hops[current].unwrap_or(0);
        for next in &neighbors[current] {
            let idx = next.index();
            if idx < hops.len() && hops[idx].is_none() {
                hops[idx] = Some(depth + 1);
                queue.push_back(idx);
            }
        }
    }

    hops
}

impl TradeNetwork for RegionGraph {
    fn distance(&self, from: RegionId, to: RegionId) -> Option<u32> {
        self.hops.get(from.index())?.get(to.index()).copied().flatten()
    }
}

/// Every region can reach every other at distance 1
#[derive(Debug, Clone, Copy, Default)]
pub struct FullyConnected;

impl TradeNetwork for FullyConnected {
    fn distance(&self, from: RegionId, to: RegionId) -> Option<u32> {
        Some(u32::from(from != to))
    }
}
