#![deny(missing_docs)]
#![doc = "Core types for multi-stable design: errors, seeded randomness, the nucleotide alphabet, IUPAC constraints, dot-bracket structures and input parsing."]

pub mod alphabet;
pub mod errors;
pub mod input;
pub mod rng;
pub mod structure;

pub use alphabet::{parse_sequence, render_sequence, IupacCode, Nucleotide, SequenceConstraint};
pub use errors::{DesignError, ErrorInfo};
pub use input::{
    parse_design_input, read_design_file, read_design_stream, read_start_sequence, DesignInput,
    DEFAULT_STRUCTURES,
};
pub use rng::{derive_substream_seed, RngHandle};
pub use structure::{BasePair, BracketKind, ElementKind, Structure, StructuralElement};
