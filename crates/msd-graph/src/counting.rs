//! Exact counting and uniform sampling of consistent assignments.
//!
//! Free positions are processed in a fixed order while a frontier of already
//! assigned positions that still have unprocessed free neighbours is carried
//! as the dynamic-programming state. Dependency graphs built from secondary
//! structures have maximum degree equal to the number of structures, so the
//! frontier stays small when the order follows the graph (breadth first).

use std::collections::HashMap;

use msd_core::{IupacCode, Nucleotide};

/// Read-only view of the constraint network used by the counting routines.
pub(crate) struct Network<'a> {
    pub(crate) adjacency: &'a [Vec<usize>],
    pub(crate) codes: &'a [IupacCode],
}

impl Network<'_> {
    /// Whether `base` at `position` is allowed by the constraint and pairs
    /// with every fixed neighbour.
    pub(crate) fn admits(
        &self,
        position: usize,
        base: Nucleotide,
        fixed: &[Option<Nucleotide>],
    ) -> bool {
        self.codes[position].allows(base)
            && self.adjacency[position]
                .iter()
                .all(|&neighbour| fixed[neighbour].map_or(true, |other| base.pairs_with(other)))
    }

    /// Counts assignments of the free positions in `order` that are consistent
    /// with `fixed`. Every `None` entry of `fixed` must appear in `order`.
    pub(crate) fn count(&self, order: &[usize], fixed: &[Option<Nucleotide>]) -> u128 {
        let mut rank = vec![usize::MAX; fixed.len()];
        for (step, &position) in order.iter().enumerate() {
            rank[position] = step;
        }

        let mut layer: HashMap<Vec<(usize, Nucleotide)>, u128> = HashMap::new();
        layer.insert(Vec::new(), 1);

        for (step, &position) in order.iter().enumerate() {
            let mut next: HashMap<Vec<(usize, Nucleotide)>, u128> = HashMap::new();
            for (frontier, ways) in &layer {
                for base in Nucleotide::ALL {
                    if !self.admits(position, base, fixed) {
                        continue;
                    }
                    let clashes = frontier.iter().any(|&(other, other_base)| {
                        self.adjacency[position].contains(&other) && !base.pairs_with(other_base)
                    });
                    if clashes {
                        continue;
                    }
                    let mut state = frontier.clone();
                    state.push((position, base));
                    state.retain(|&(member, _)| {
                        self.adjacency[member]
                            .iter()
                            .any(|&neighbour| rank[neighbour] != usize::MAX && rank[neighbour] > step)
                    });
                    let entry = next.entry(state).or_insert(0);
                    *entry = entry.saturating_add(*ways);
                }
            }
            layer = next;
            if layer.is_empty() {
                return 0;
            }
        }

        layer
            .values()
            .fold(0u128, |acc, ways| acc.saturating_add(*ways))
    }

    /// Assigns the free positions of `order` one after another, weighting each
    /// candidate base by the number of completions it leaves. With a
    /// proportional `choose` the result is uniform over all consistent
    /// assignments. Returns `None` when no consistent assignment exists.
    pub(crate) fn assign<F>(
        &self,
        order: &[usize],
        fixed: &mut [Option<Nucleotide>],
        mut choose: F,
    ) -> Option<u128>
    where
        F: FnMut(&[u128]) -> Option<usize>,
    {
        let total = self.count(order, fixed);
        if total == 0 {
            return None;
        }
        for (step, &position) in order.iter().enumerate() {
            let rest = &order[step + 1..];
            let mut weights = [0u128; 4];
            for (slot, base) in Nucleotide::ALL.into_iter().enumerate() {
                if !self.admits(position, base, fixed) {
                    continue;
                }
                fixed[position] = Some(base);
                weights[slot] = self.count(rest, fixed);
                fixed[position] = None;
            }
            let slot = choose(&weights)?;
            fixed[position] = Some(Nucleotide::ALL[slot]);
        }
        Some(total)
    }
}
