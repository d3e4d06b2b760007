use std::collections::{BTreeMap, BTreeSet, VecDeque};

use msd_core::errors::{DesignError, ErrorInfo};
use msd_core::{
    parse_sequence, render_sequence, IupacCode, Nucleotide, RngHandle, SequenceConstraint,
    Structure,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::counting::Network;

/// Incremental resampling strategies understood by a dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleStrategy {
    /// One random position, resampled given its neighbours.
    Single,
    /// A random position together with its graph neighbours.
    Local,
    /// One connected component chosen in proportion to its solution count.
    Global,
    /// One helix or loop of one of the target structures.
    StructuralElement,
}

/// Result of one incremental resample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resample {
    /// Number of consistent assignments of the resampled positions.
    pub solutions: u128,
    /// Number of positions whose nucleotide actually changed.
    pub changed: usize,
}

/// Capability interface of a variable-dependency graph over sequence positions.
///
/// Implementations keep one current assignment. `resample` followed by
/// `revert(changed)` must restore it exactly, and `set_sequence` followed by
/// `get_sequence` must return the same sequence in canonical form.
///
/// Sequences are normalised on the way in: letters are case-insensitive and
/// `T` is read as `U`. `get_sequence` always returns upper-case `ACGU`, so
/// `"acgt"` reads back as `"ACGU"`.
pub trait DependencyGraph {
    /// Sequence length covered by the graph.
    fn len(&self) -> usize;

    /// Whether the graph covers zero positions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples a complete assignment and clears the change history. Returns the
    /// total number of consistent sequences.
    fn sample(&mut self, rng: &mut RngHandle) -> Result<u128, DesignError>;

    /// Replaces the current assignment and clears the change history.
    ///
    /// Lower-case letters and `T` are accepted and normalised.
    fn set_sequence(&mut self, sequence: &str) -> Result<(), DesignError>;

    /// Reads the current assignment as upper-case `ACGU`.
    fn get_sequence(&self) -> String;

    /// Resamples part of the assignment and records the changes.
    fn resample(
        &mut self,
        strategy: ResampleStrategy,
        rng: &mut RngHandle,
    ) -> Result<Resample, DesignError>;

    /// Undoes the last `count` recorded single-position changes.
    fn revert(&mut self, count: usize) -> Result<(), DesignError>;

    /// Number of sequences consistent with all structures and the constraint.
    fn number_of_sequences(&self) -> u128;

    /// Number of connected components.
    fn number_of_connected_components(&self) -> usize;

    /// Positions belonging to component `component`, sorted.
    fn component_vertices(&self, component: usize) -> Result<Vec<usize>, DesignError>;
}

#[derive(Debug, Clone, Copy)]
struct Change {
    position: usize,
    previous: Nucleotide,
}

/// Dependency graph whose vertices are sequence positions and whose edges are
/// the base pairs of every target structure.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    structures: Vec<Structure>,
    codes: Vec<IupacCode>,
    adjacency: Vec<Vec<usize>>,
    edge_structures: BTreeMap<(usize, usize), Vec<usize>>,
    components: Vec<Vec<usize>>,
    component_of: Vec<usize>,
    component_counts: Vec<u128>,
    rank: Vec<usize>,
    elements: Vec<Vec<usize>>,
    assignment: Vec<Nucleotide>,
    history: Vec<Change>,
}

impl ConstraintGraph {
    /// Builds the graph and validates that at least one sequence satisfies
    /// every structure and the constraint.
    pub fn new(
        structures: &[Structure],
        constraint: &SequenceConstraint,
    ) -> Result<Self, DesignError> {
        let length = constraint.len();
        for (index, structure) in structures.iter().enumerate() {
            if structure.len() != length {
                return Err(DesignError::Graph(
                    ErrorInfo::new("length-mismatch", "structure and constraint differ in length")
                        .with_context("structure", index.to_string())
                        .with_context("expected", length.to_string())
                        .with_context("found", structure.len().to_string()),
                ));
            }
        }

        let mut edge_structures: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        for (index, structure) in structures.iter().enumerate() {
            for pair in structure.pairs() {
                edge_structures
                    .entry((pair.i, pair.j))
                    .or_default()
                    .push(index);
            }
        }
        let mut adjacency = vec![Vec::new(); length];
        for &(i, j) in edge_structures.keys() {
            adjacency[i].push(j);
            adjacency[j].push(i);
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }

        let (components, component_of) = bipartite_components(&adjacency)?;
        let mut rank = vec![0; length];
        for (step, &position) in components.iter().flatten().enumerate() {
            rank[position] = step;
        }

        let mut unique = BTreeSet::new();
        for structure in structures {
            for element in structure.elements() {
                unique.insert(element.positions);
            }
        }

        let codes: Vec<IupacCode> = (0..length).map(|position| constraint.code(position)).collect();
        let mut graph = Self {
            structures: structures.to_vec(),
            codes,
            adjacency,
            edge_structures,
            components,
            component_of,
            component_counts: Vec::new(),
            rank,
            elements: unique.into_iter().collect(),
            assignment: vec![Nucleotide::A; length],
            history: Vec::new(),
        };

        let counts: Vec<u128> = graph
            .components
            .iter()
            .map(|component| graph.network().count(component, &vec![None; length]))
            .collect();
        if let Some(empty) = counts.iter().position(|count| *count == 0) {
            return Err(DesignError::Graph(
                ErrorInfo::new("unsatisfiable", "no sequence satisfies the constraint in a component")
                    .with_context("component", empty.to_string())
                    .with_context("positions", format!("{:?}", graph.components[empty]))
                    .with_hint("relax the sequence constraint on these positions"),
            ));
        }
        graph.component_counts = counts;

        // Deterministic first assignment so `get_sequence` is valid before sampling.
        let order: Vec<usize> = graph.components.iter().flatten().copied().collect();
        let mut fixed = vec![None; length];
        graph
            .network()
            .assign(&order, &mut fixed, |weights| {
                weights.iter().position(|weight| *weight > 0)
            })
            .ok_or_else(|| {
                DesignError::Graph(ErrorInfo::new(
                    "unsatisfiable",
                    "no initial assignment could be constructed",
                ))
            })?;
        graph.assignment = fixed.into_iter().flatten().collect();

        debug!(
            positions = length,
            edges = graph.edge_structures.len(),
            components = graph.components.len(),
            "dependency graph constructed"
        );
        Ok(graph)
    }

    /// Target structures the graph was built from.
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    /// Base-pair edges with the indices of the structures that contain them.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, &[usize])> + '_ {
        self.edge_structures
            .iter()
            .map(|(&(i, j), structures)| (i, j, structures.as_slice()))
    }

    /// Component index of `position`.
    pub fn component_of(&self, position: usize) -> usize {
        self.component_of[position]
    }

    /// Number of pending single-position changes that `revert` can undo.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn network(&self) -> Network<'_> {
        Network {
            adjacency: &self.adjacency,
            codes: &self.codes,
        }
    }

    fn pick_positions(&self, strategy: ResampleStrategy, rng: &mut RngHandle) -> Vec<usize> {
        let length = self.assignment.len();
        match strategy {
            ResampleStrategy::Single => rng.index(length).into_iter().collect(),
            ResampleStrategy::Local => match rng.index(length) {
                Some(position) => {
                    let mut positions = vec![position];
                    positions.extend_from_slice(&self.adjacency[position]);
                    positions
                }
                None => Vec::new(),
            },
            ResampleStrategy::Global => rng
                .weighted_index(&self.component_counts)
                .map(|component| self.components[component].clone())
                .unwrap_or_default(),
            ResampleStrategy::StructuralElement => rng
                .index(self.elements.len())
                .map(|element| self.elements[element].clone())
                .unwrap_or_default(),
        }
    }

    /// Resamples `positions` uniformly given the rest of the assignment.
    fn resample_positions(
        &mut self,
        mut positions: Vec<usize>,
        rng: &mut RngHandle,
    ) -> Result<Resample, DesignError> {
        positions.sort_by_key(|&position| self.rank[position]);
        positions.dedup();

        let mut fixed: Vec<Option<Nucleotide>> = self.assignment.iter().copied().map(Some).collect();
        for &position in &positions {
            fixed[position] = None;
        }
        let solutions = self
            .network()
            .assign(&positions, &mut fixed, |weights| rng.weighted_index(weights))
            .ok_or_else(|| {
                DesignError::Sampler(
                    ErrorInfo::new("inconsistent-resample", "no consistent values for resampled positions")
                        .with_context("positions", format!("{positions:?}")),
                )
            })?;

        let mut changed = 0;
        for &position in &positions {
            let Some(next) = fixed[position] else {
                continue;
            };
            let previous = self.assignment[position];
            if next != previous {
                self.history.push(Change { position, previous });
                self.assignment[position] = next;
                changed += 1;
            }
        }
        Ok(Resample { solutions, changed })
    }
}

impl DependencyGraph for ConstraintGraph {
    fn len(&self) -> usize {
        self.assignment.len()
    }

    fn sample(&mut self, rng: &mut RngHandle) -> Result<u128, DesignError> {
        let order: Vec<usize> = self.components.iter().flatten().copied().collect();
        let mut fixed = vec![None; self.assignment.len()];
        let total = self
            .network()
            .assign(&order, &mut fixed, |weights| rng.weighted_index(weights))
            .ok_or_else(|| {
                DesignError::Graph(ErrorInfo::new("unsatisfiable", "full sample found no assignment"))
            })?;
        self.assignment = fixed.into_iter().flatten().collect();
        self.history.clear();
        Ok(total)
    }

    fn set_sequence(&mut self, sequence: &str) -> Result<(), DesignError> {
        let bases = parse_sequence(sequence)?;
        if bases.len() != self.assignment.len() {
            return Err(DesignError::Constraint(
                ErrorInfo::new("length-mismatch", "sequence length differs from graph")
                    .with_context("expected", self.assignment.len().to_string())
                    .with_context("found", bases.len().to_string()),
            ));
        }
        for (position, base) in bases.iter().enumerate() {
            if !self.codes[position].allows(*base) {
                return Err(DesignError::Constraint(
                    ErrorInfo::new("violates-constraint", "nucleotide not allowed by constraint")
                        .with_context("position", position.to_string())
                        .with_context("nucleotide", base.to_string()),
                ));
            }
        }
        for (&(i, j), structures) in &self.edge_structures {
            if !bases[i].pairs_with(bases[j]) {
                return Err(DesignError::Constraint(
                    ErrorInfo::new("cannot-pair", "paired positions hold non-complementary nucleotides")
                        .with_context("i", i.to_string())
                        .with_context("j", j.to_string())
                        .with_context("structures", format!("{structures:?}")),
                ));
            }
        }
        self.assignment = bases;
        self.history.clear();
        Ok(())
    }

    fn get_sequence(&self) -> String {
        render_sequence(&self.assignment)
    }

    fn resample(
        &mut self,
        strategy: ResampleStrategy,
        rng: &mut RngHandle,
    ) -> Result<Resample, DesignError> {
        let positions = self.pick_positions(strategy, rng);
        if positions.is_empty() {
            return Ok(Resample {
                solutions: 1,
                changed: 0,
            });
        }
        self.resample_positions(positions, rng)
    }

    fn revert(&mut self, count: usize) -> Result<(), DesignError> {
        if count > self.history.len() {
            return Err(DesignError::Graph(
                ErrorInfo::new("revert-underflow", "more changes requested than recorded")
                    .with_context("requested", count.to_string())
                    .with_context("recorded", self.history.len().to_string()),
            ));
        }
        for _ in 0..count {
            if let Some(change) = self.history.pop() {
                self.assignment[change.position] = change.previous;
            }
        }
        Ok(())
    }

    fn number_of_sequences(&self) -> u128 {
        self.component_counts
            .iter()
            .fold(1u128, |acc, count| acc.saturating_mul(*count))
    }

    fn number_of_connected_components(&self) -> usize {
        self.components.len()
    }

    fn component_vertices(&self, component: usize) -> Result<Vec<usize>, DesignError> {
        let mut vertices = self
            .components
            .get(component)
            .cloned()
            .ok_or_else(|| {
                DesignError::Graph(
                    ErrorInfo::new("unknown-component", "component index out of range")
                        .with_context("component", component.to_string())
                        .with_context("available", self.components.len().to_string()),
                )
            })?;
        vertices.sort_unstable();
        Ok(vertices)
    }
}

/// Splits the graph into components in breadth-first order and rejects odd
/// cycles, which no assignment over the allowed pairs can satisfy.
fn bipartite_components(
    adjacency: &[Vec<usize>],
) -> Result<(Vec<Vec<usize>>, Vec<usize>), DesignError> {
    let mut colour: Vec<Option<bool>> = vec![None; adjacency.len()];
    let mut component_of = vec![0; adjacency.len()];
    let mut components = Vec::new();

    for root in 0..adjacency.len() {
        if colour[root].is_some() {
            continue;
        }
        let index = components.len();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([root]);
        colour[root] = Some(false);
        while let Some(position) = queue.pop_front() {
            order.push(position);
            component_of[position] = index;
            let side = colour[position].unwrap_or(false);
            for &neighbour in &adjacency[position] {
                match colour[neighbour] {
                    None => {
                        colour[neighbour] = Some(!side);
                        queue.push_back(neighbour);
                    }
                    Some(other) if other == side => {
                        return Err(DesignError::Graph(
                            ErrorInfo::new("not-bipartite", "structures induce an odd cycle of base pairs")
                                .with_context("i", position.to_string())
                                .with_context("j", neighbour.to_string())
                                .with_hint("no nucleotide assignment can satisfy an odd pairing cycle"),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
        components.push(order);
    }
    Ok((components, component_of))
}
