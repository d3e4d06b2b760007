//! Nucleotide alphabet, base pairing rules and IUPAC sequence constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DesignError, ErrorInfo};

const MASK_A: u8 = 1;
const MASK_C: u8 = 2;
const MASK_G: u8 = 4;
const MASK_U: u8 = 8;
const MASK_N: u8 = MASK_A | MASK_C | MASK_G | MASK_U;

/// One RNA nucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nucleotide {
    /// Adenine.
    A,
    /// Cytosine.
    C,
    /// Guanine.
    G,
    /// Uracil.
    U,
}

impl Nucleotide {
    /// All nucleotides in canonical order.
    pub const ALL: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::U];

    /// Parses a single letter; `T` is read as `U`.
    pub fn from_letter(letter: u8) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            b'A' => Some(Nucleotide::A),
            b'C' => Some(Nucleotide::C),
            b'G' => Some(Nucleotide::G),
            b'U' | b'T' => Some(Nucleotide::U),
            _ => None,
        }
    }

    /// Returns the upper-case letter for this nucleotide.
    pub fn letter(self) -> char {
        match self {
            Nucleotide::A => 'A',
            Nucleotide::C => 'C',
            Nucleotide::G => 'G',
            Nucleotide::U => 'U',
        }
    }

    /// Whether the two nucleotides form a Watson-Crick or GU wobble pair.
    pub fn pairs_with(self, other: Nucleotide) -> bool {
        matches!(
            (self, other),
            (Nucleotide::A, Nucleotide::U)
                | (Nucleotide::U, Nucleotide::A)
                | (Nucleotide::C, Nucleotide::G)
                | (Nucleotide::G, Nucleotide::C)
                | (Nucleotide::G, Nucleotide::U)
                | (Nucleotide::U, Nucleotide::G)
        )
    }

    fn mask(self) -> u8 {
        match self {
            Nucleotide::A => MASK_A,
            Nucleotide::C => MASK_C,
            Nucleotide::G => MASK_G,
            Nucleotide::U => MASK_U,
        }
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Bitmask of the nucleotides allowed at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IupacCode(u8);

impl IupacCode {
    /// Wildcard accepting every nucleotide.
    pub const ANY: IupacCode = IupacCode(MASK_N);

    /// Parses an IUPAC letter (case-insensitive). Unknown letters yield `None`.
    pub fn from_letter(letter: u8) -> Option<Self> {
        let mask = match letter.to_ascii_uppercase() {
            b'A' => MASK_A,
            b'C' => MASK_C,
            b'G' => MASK_G,
            b'T' | b'U' => MASK_U,
            b'W' => MASK_A | MASK_U,
            b'S' => MASK_C | MASK_G,
            b'M' => MASK_A | MASK_C,
            b'K' => MASK_G | MASK_U,
            b'R' => MASK_A | MASK_G,
            b'Y' => MASK_C | MASK_U,
            b'B' => MASK_C | MASK_G | MASK_U,
            b'D' => MASK_A | MASK_G | MASK_U,
            b'H' => MASK_A | MASK_C | MASK_U,
            b'V' => MASK_A | MASK_C | MASK_G,
            b'N' => MASK_N,
            _ => return None,
        };
        Some(Self(mask))
    }

    /// Whether `nucleotide` satisfies this code.
    #[inline]
    pub fn allows(self, nucleotide: Nucleotide) -> bool {
        self.0 & nucleotide.mask() != 0
    }

    /// Iterates over the allowed nucleotides in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Nucleotide> {
        Nucleotide::ALL
            .into_iter()
            .filter(move |nucleotide| self.allows(*nucleotide))
    }

    /// Number of allowed nucleotides.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether no nucleotide is allowed.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Per-position sequence constraint written as an IUPAC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConstraint {
    raw: String,
    codes: Vec<IupacCode>,
}

impl SequenceConstraint {
    /// Parses a constraint string such as `NNNNRYNN`.
    pub fn parse(raw: &str) -> Result<Self, DesignError> {
        let mut codes = Vec::with_capacity(raw.len());
        for (position, letter) in raw.bytes().enumerate() {
            let code = IupacCode::from_letter(letter).ok_or_else(|| {
                DesignError::Constraint(
                    ErrorInfo::new("invalid-iupac", "constraint contains a non-IUPAC letter")
                        .with_context("position", position.to_string())
                        .with_context("letter", (letter as char).to_string()),
                )
            })?;
            codes.push(code);
        }
        Ok(Self {
            raw: raw.to_ascii_uppercase(),
            codes,
        })
    }

    /// All-wildcard constraint of the given length.
    pub fn wildcard(len: usize) -> Self {
        Self {
            raw: "N".repeat(len),
            codes: vec![IupacCode::ANY; len],
        }
    }

    /// Number of positions covered by the constraint.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the constraint is empty.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Code at `position`.
    pub fn code(&self, position: usize) -> IupacCode {
        self.codes[position]
    }

    /// Constraint as written (upper case).
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SequenceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses a nucleotide string into bases, rejecting anything outside `ACGTU`.
pub fn parse_sequence(sequence: &str) -> Result<Vec<Nucleotide>, DesignError> {
    sequence
        .bytes()
        .enumerate()
        .map(|(position, letter)| {
            Nucleotide::from_letter(letter).ok_or_else(|| {
                DesignError::Constraint(
                    ErrorInfo::new("invalid-nucleotide", "sequence contains a non-nucleotide letter")
                        .with_context("position", position.to_string())
                        .with_context("letter", (letter as char).to_string()),
                )
            })
        })
        .collect()
}

/// Renders bases back into an upper-case RNA string.
pub fn render_sequence(bases: &[Nucleotide]) -> String {
    bases.iter().map(|base| base.letter()).collect()
}
