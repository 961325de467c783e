//! Pairing strategies for faces within one subject group.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingStrategy {
    /// Single pass over ordered pairs; each face takes the first match it meets.
    #[default]
    Greedy,
    /// Maximum-cardinality matching over the group's match graph.
    Maximum,
}

impl fmt::Display for PairingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingStrategy::Greedy => write!(f, "greedy"),
            PairingStrategy::Maximum => write!(f, "maximum"),
        }
    }
}

impl FromStr for PairingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(PairingStrategy::Greedy),
            "maximum" => Ok(PairingStrategy::Maximum),
            other => Err(format!(
                "Pairing strategy must be 'greedy' or 'maximum', got '{other}'"
            )),
        }
    }
}

/// Maximum-cardinality matching on an undirected graph of `n` vertices
/// (Edmonds' blossom algorithm).
///
/// Returns `(low, high)` pairs sorted by the lower index. Self-loops and
/// out-of-range edges are ignored. Neighbours are visited in ascending
/// order, so the result is deterministic for a given edge set.
pub fn maximum_matching(n: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut adj = vec![Vec::new(); n];
    for &(a, b) in edges {
        if a != b && a < n && b < n {
            adj[a].push(b);
            adj[b].push(a);
        }
    }
    for neighbours in &mut adj {
        neighbours.sort_unstable();
        neighbours.dedup();
    }

    let mut search = BlossomSearch::new(adj);
    for root in 0..n {
        if search.mate[root].is_none() {
            if let Some(end) = search.find_augmenting_path(root) {
                search.augment(end);
            }
        }
    }

    (0..n)
        .filter_map(|v| search.mate[v].filter(|&m| v < m).map(|m| (v, m)))
        .collect()
}

struct BlossomSearch {
    adj: Vec<Vec<usize>>,
    mate: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
    base: Vec<usize>,
    used: Vec<bool>,
    in_blossom: Vec<bool>,
}

impl BlossomSearch {
    fn new(adj: Vec<Vec<usize>>) -> Self {
        let n = adj.len();
        Self {
            adj,
            mate: vec![None; n],
            parent: vec![None; n],
            base: (0..n).collect(),
            used: vec![false; n],
            in_blossom: vec![false; n],
        }
    }

    /// BFS from an unmatched `root`, contracting odd cycles as they appear.
    /// Returns the free vertex that ends an augmenting path.
    fn find_augmenting_path(&mut self, root: usize) -> Option<usize> {
        let n = self.adj.len();
        self.used.fill(false);
        self.parent.fill(None);
        for (i, b) in self.base.iter_mut().enumerate() {
            *b = i;
        }

        self.used[root] = true;
        let mut queue = VecDeque::from([root]);

        while let Some(v) = queue.pop_front() {
            let neighbours = self.adj[v].clone();
            for to in neighbours {
                if self.base[v] == self.base[to] || self.mate[v] == Some(to) {
                    continue;
                }

                let closes_odd_cycle = to == root
                    || self.mate[to].is_some_and(|m| self.parent[m].is_some());

                if closes_odd_cycle {
                    let cycle_base = self.lowest_common_ancestor(v, to);
                    self.in_blossom.fill(false);
                    self.mark_path(v, cycle_base, to);
                    self.mark_path(to, cycle_base, v);
                    for i in 0..n {
                        if self.in_blossom[self.base[i]] {
                            self.base[i] = cycle_base;
                            if !self.used[i] {
                                self.used[i] = true;
                                queue.push_back(i);
                            }
                        }
                    }
                } else if self.parent[to].is_none() {
                    self.parent[to] = Some(v);
                    match self.mate[to] {
                        None => return Some(to),
                        Some(m) => {
                            self.used[m] = true;
                            queue.push_back(m);
                        }
                    }
                }
            }
        }

        None
    }

    fn lowest_common_ancestor(&self, mut a: usize, mut b: usize) -> usize {
        let mut seen = vec![false; self.adj.len()];
        loop {
            a = self.base[a];
            seen[a] = true;
            match self.mate[a].and_then(|m| self.parent[m]) {
                Some(next) => a = next,
                None => break,
            }
        }
        loop {
            b = self.base[b];
            if seen[b] {
                return b;
            }
            match self.mate[b].and_then(|m| self.parent[m]) {
                Some(next) => b = next,
                None => return b,
            }
        }
    }

    fn mark_path(&mut self, mut v: usize, cycle_base: usize, mut child: usize) {
        while self.base[v] != cycle_base {
            let Some(m) = self.mate[v] else {
                break;
            };
            self.in_blossom[self.base[v]] = true;
            self.in_blossom[self.base[m]] = true;
            self.parent[v] = Some(child);
            child = m;
            match self.parent[m] {
                Some(next) => v = next,
                None => break,
            }
        }
    }

    /// Flips matched and unmatched edges along the path ending at `end`.
    fn augment(&mut self, end: usize) {
        let mut current = Some(end);
        while let Some(v) = current {
            let Some(pv) = self.parent[v] else {
                break;
            };
            let next = self.mate[pv];
            self.mate[v] = Some(pv);
            self.mate[pv] = Some(v);
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn assert_valid(n: usize, edges: &[(usize, usize)], pairs: &[(usize, usize)]) {
        let edge_set: HashSet<(usize, usize)> = edges
            .iter()
            .flat_map(|&(a, b)| [(a, b), (b, a)])
            .collect();
        let mut seen = HashSet::new();
        for &(a, b) in pairs {
            assert!(a < b && b < n, "pair ({a}, {b}) out of order or range");
            assert!(edge_set.contains(&(a, b)), "({a}, {b}) is not an edge");
            assert!(seen.insert(a), "{a} matched twice");
            assert!(seen.insert(b), "{b} matched twice");
        }
    }

    #[rstest]
    #[case::empty(0, vec![], 0)]
    #[case::no_edges(3, vec![], 0)]
    #[case::single_edge(2, vec![(0, 1)], 1)]
    #[case::path_of_four(4, vec![(0, 2), (0, 1), (1, 3)], 2)]
    #[case::triangle(3, vec![(0, 1), (1, 2), (2, 0)], 1)]
    #[case::star(4, vec![(0, 1), (0, 2), (0, 3)], 1)]
    #[case::five_cycle_with_stem(6, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (0, 5)], 3)]
    #[case::two_triangles_bridged(
        6,
        vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)],
        3
    )]
    #[case::five_cycle_with_two_stems(
        8,
        vec![(1, 2), (2, 3), (3, 4), (4, 5), (5, 1), (0, 1), (3, 6), (6, 7)],
        4
    )]
    #[case::complete_k4(4, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)], 2)]
    fn test_matching_size(
        #[case] n: usize,
        #[case] edges: Vec<(usize, usize)>,
        #[case] expected: usize,
    ) {
        let pairs = maximum_matching(n, &edges);
        assert_valid(n, &edges, &pairs);
        assert_eq!(pairs.len(), expected);
    }

    #[test]
    fn test_path_prefers_outer_pairs() {
        let pairs = maximum_matching(4, &[(0, 2), (0, 1), (1, 3)]);
        assert_eq!(pairs, vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn test_ignores_self_loops_and_out_of_range() {
        let pairs = maximum_matching(2, &[(0, 0), (1, 5), (0, 1)]);
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn test_duplicate_edges() {
        let pairs = maximum_matching(2, &[(0, 1), (1, 0), (0, 1)]);
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[rstest]
    #[case("greedy", PairingStrategy::Greedy)]
    #[case("maximum", PairingStrategy::Maximum)]
    fn test_parse_strategy(#[case] input: &str, #[case] expected: PairingStrategy) {
        assert_eq!(input.parse::<PairingStrategy>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn test_parse_strategy_rejects_unknown() {
        assert!("optimal".parse::<PairingStrategy>().is_err());
    }
}
