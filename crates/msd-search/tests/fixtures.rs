#![allow(dead_code)]

use msd_core::errors::{DesignError, ErrorInfo};
use msd_core::{parse_sequence, Nucleotide, RngHandle, Structure};
use msd_fold::FoldingEngine;
use msd_graph::{DependencyGraph, Resample, ResampleStrategy};

const CYCLE: [u8; 4] = [b'A', b'C', b'G', b'U'];

/// Graph double that rotates letters at a moving cursor and records calls.
#[derive(Debug, Clone)]
pub struct RecordingGraph {
    sequence: Vec<u8>,
    history: Vec<(usize, u8)>,
    cursor: usize,
    width: usize,
    fail_after: Option<usize>,
    pub strategies: Vec<ResampleStrategy>,
    pub reverts: Vec<usize>,
    pub samples: usize,
    pub loads: usize,
}

impl RecordingGraph {
    /// `width` positions change on every resample.
    pub fn new(len: usize, width: usize) -> Self {
        Self {
            sequence: vec![b'A'; len],
            history: Vec::new(),
            cursor: 0,
            width,
            fail_after: None,
            strategies: Vec::new(),
            reverts: Vec::new(),
            samples: 0,
            loads: 0,
        }
    }

    /// Fails every resample after the first `count`.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl DependencyGraph for RecordingGraph {
    fn len(&self) -> usize {
        self.sequence.len()
    }

    fn sample(&mut self, _rng: &mut RngHandle) -> Result<u128, DesignError> {
        self.samples += 1;
        self.sequence.iter_mut().for_each(|letter| *letter = b'G');
        self.history.clear();
        Ok(4u128.pow(self.sequence.len() as u32))
    }

    fn set_sequence(&mut self, sequence: &str) -> Result<(), DesignError> {
        self.loads += 1;
        self.sequence = sequence.as_bytes().to_vec();
        self.history.clear();
        Ok(())
    }

    fn get_sequence(&self) -> String {
        String::from_utf8_lossy(&self.sequence).into_owned()
    }

    fn resample(
        &mut self,
        strategy: ResampleStrategy,
        _rng: &mut RngHandle,
    ) -> Result<Resample, DesignError> {
        if self.fail_after.is_some_and(|limit| self.strategies.len() >= limit) {
            return Err(DesignError::Sampler(ErrorInfo::new(
                "inconsistent-resample",
                "double refused to resample",
            )));
        }
        self.strategies.push(strategy);
        for _ in 0..self.width {
            let position = self.cursor % self.sequence.len();
            self.cursor += 1;
            let previous = self.sequence[position];
            let next = CYCLE
                .iter()
                .position(|letter| *letter == previous)
                .map_or(b'A', |index| CYCLE[(index + 1) % CYCLE.len()]);
            self.sequence[position] = next;
            self.history.push((position, previous));
        }
        Ok(Resample {
            solutions: 4u128.pow(self.width as u32),
            changed: self.width,
        })
    }

    fn revert(&mut self, count: usize) -> Result<(), DesignError> {
        self.reverts.push(count);
        for _ in 0..count {
            let Some((position, previous)) = self.history.pop() else {
                return Err(DesignError::Graph(ErrorInfo::new(
                    "revert-underflow",
                    "nothing left to revert",
                )));
            };
            self.sequence[position] = previous;
        }
        Ok(())
    }

    fn number_of_sequences(&self) -> u128 {
        4u128.pow(self.sequence.len() as u32)
    }

    fn number_of_connected_components(&self) -> usize {
        self.sequence.len()
    }

    fn component_vertices(&self, component: usize) -> Result<Vec<usize>, DesignError> {
        Ok(vec![component])
    }
}

/// Engine whose structure energy is the number of `G`s and whose ensemble is zero.
#[derive(Debug, Default)]
pub struct GuanineEngine;

impl FoldingEngine for GuanineEngine {
    fn name(&self) -> &'static str {
        "guanine"
    }

    fn structure_energy(
        &self,
        sequence: &[Nucleotide],
        _structure: &Structure,
    ) -> Result<f64, DesignError> {
        Ok(sequence.iter().filter(|base| **base == Nucleotide::G).count() as f64)
    }

    fn ensemble_energy(&self, _sequence: &[Nucleotide]) -> Result<f64, DesignError> {
        Ok(0.0)
    }
}

/// Unpaired single target of length `len`.
pub fn open_structure(len: usize) -> Structure {
    Structure::parse(&".".repeat(len)).expect("open structure")
}

/// The three built-in targets padded to 38 positions.
pub fn padded_targets() -> Vec<Structure> {
    msd_core::DEFAULT_STRUCTURES
        .iter()
        .map(|raw| Structure::parse(&format!("{raw}..")).expect("padded structure"))
        .collect()
}

/// Whether every pair of every target can form on `sequence`.
pub fn satisfies(sequence: &str, targets: &[Structure]) -> bool {
    let Ok(bases) = parse_sequence(sequence) else {
        return false;
    };
    targets.iter().all(|target| {
        target
            .pairs()
            .iter()
            .all(|pair| bases[pair.i].pairs_with(bases[pair.j]))
    })
}
