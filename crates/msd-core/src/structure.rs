//! Dot-bracket secondary structures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DesignError, ErrorInfo};

/// Bracket family used to write a base pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BracketKind {
    /// `(` and `)`.
    Round,
    /// `[` and `]`.
    Square,
    /// `{` and `}`.
    Curly,
    /// `<` and `>`.
    Angle,
}

impl BracketKind {
    const ALL: [BracketKind; 4] = [
        BracketKind::Round,
        BracketKind::Square,
        BracketKind::Curly,
        BracketKind::Angle,
    ];

    fn open(self) -> char {
        match self {
            BracketKind::Round => '(',
            BracketKind::Square => '[',
            BracketKind::Curly => '{',
            BracketKind::Angle => '<',
        }
    }

    fn close(self) -> char {
        match self {
            BracketKind::Round => ')',
            BracketKind::Square => ']',
            BracketKind::Curly => '}',
            BracketKind::Angle => '>',
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A base pair `(i, j)` with `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BasePair {
    /// 5' partner.
    pub i: usize,
    /// 3' partner.
    pub j: usize,
    /// Bracket family the pair was written with.
    pub kind: BracketKind,
}

/// Kind of a structural element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Maximal run of stacked base pairs, both strands.
    Helix,
    /// Maximal run of consecutive unpaired positions.
    Loop,
}

/// Group of positions that belong to one helix or one loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralElement {
    /// Helix or loop.
    pub kind: ElementKind,
    /// Sorted positions covered by the element.
    pub positions: Vec<usize>,
}

/// Parsed dot-bracket structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    raw: String,
    partners: Vec<Option<usize>>,
    pairs: Vec<BasePair>,
}

impl Structure {
    /// Parses a dot-bracket string. Pseudoknots may be written with `[]`, `{}`
    /// and `<>` on top of the nested `()` layer.
    pub fn parse(raw: &str) -> Result<Self, DesignError> {
        let mut partners = vec![None; raw.chars().count()];
        let mut pairs = Vec::new();
        let mut stacks: [Vec<usize>; 4] = Default::default();

        for (position, symbol) in raw.chars().enumerate() {
            if symbol == '.' {
                continue;
            }
            if let Some(kind) = BracketKind::ALL.iter().find(|kind| kind.open() == symbol) {
                stacks[kind.index()].push(position);
                continue;
            }
            let Some(kind) = BracketKind::ALL.iter().find(|kind| kind.close() == symbol) else {
                return Err(DesignError::Structure(
                    ErrorInfo::new("invalid-symbol", "unexpected symbol in dot-bracket string")
                        .with_context("position", position.to_string())
                        .with_context("symbol", symbol.to_string()),
                ));
            };
            let opening = stacks[kind.index()].pop().ok_or_else(|| {
                DesignError::Structure(
                    ErrorInfo::new("unbalanced", "closing bracket without a partner")
                        .with_context("position", position.to_string())
                        .with_context("structure", raw),
                )
            })?;
            partners[opening] = Some(position);
            partners[position] = Some(opening);
            pairs.push(BasePair {
                i: opening,
                j: position,
                kind: *kind,
            });
        }

        if let Some(open) = stacks.iter().flat_map(|stack| stack.iter()).min() {
            return Err(DesignError::Structure(
                ErrorInfo::new("unbalanced", "opening bracket without a partner")
                    .with_context("position", open.to_string())
                    .with_context("structure", raw),
            ));
        }

        pairs.sort();
        Ok(Self {
            raw: raw.to_string(),
            partners,
            pairs,
        })
    }

    /// Structure length in nucleotides.
    pub fn len(&self) -> usize {
        self.partners.len()
    }

    /// Whether the structure is empty.
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Partner of `position`, if paired.
    pub fn partner(&self, position: usize) -> Option<usize> {
        self.partners.get(position).copied().flatten()
    }

    /// All base pairs sorted by their 5' position.
    pub fn pairs(&self) -> &[BasePair] {
        &self.pairs
    }

    /// Whether the structure uses more than the nested `()` layer.
    pub fn has_pseudoknot(&self) -> bool {
        self.pairs.iter().any(|pair| pair.kind != BracketKind::Round)
    }

    /// Bracket families that occur in the structure, in canonical order.
    pub fn layers(&self) -> Vec<BracketKind> {
        let mut kinds: Vec<BracketKind> = self.pairs.iter().map(|pair| pair.kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// Nested sub-structure containing only the pairs of one bracket family,
    /// rewritten with round brackets.
    pub fn layer(&self, kind: BracketKind) -> Structure {
        let mut partners = vec![None; self.len()];
        let mut pairs = Vec::new();
        for pair in self.pairs.iter().filter(|pair| pair.kind == kind) {
            partners[pair.i] = Some(pair.j);
            partners[pair.j] = Some(pair.i);
            pairs.push(BasePair {
                i: pair.i,
                j: pair.j,
                kind: BracketKind::Round,
            });
        }
        let raw = (0..self.len())
            .map(|position| match partners[position] {
                Some(partner) if partner > position => '(',
                Some(_) => ')',
                None => '.',
            })
            .collect();
        Structure {
            raw,
            partners,
            pairs,
        }
    }

    /// Splits the structure into helices and unpaired loop runs.
    pub fn elements(&self) -> Vec<StructuralElement> {
        let mut elements = Vec::new();
        let mut seen = vec![false; self.pairs.len()];
        for (start, pair) in self.pairs.iter().enumerate() {
            if seen[start] {
                continue;
            }
            let mut positions = Vec::new();
            let (mut i, mut j) = (pair.i, pair.j);
            loop {
                positions.push(i);
                positions.push(j);
                if let Some(idx) = self.pairs.iter().position(|p| p.i == i && p.j == j) {
                    seen[idx] = true;
                }
                if i + 1 < j - 1 && self.partner(i + 1) == Some(j - 1) {
                    i += 1;
                    j -= 1;
                } else {
                    break;
                }
            }
            positions.sort_unstable();
            elements.push(StructuralElement {
                kind: ElementKind::Helix,
                positions,
            });
        }

        let mut run = Vec::new();
        for position in 0..self.len() {
            if self.partners[position].is_none() {
                run.push(position);
            } else if !run.is_empty() {
                elements.push(StructuralElement {
                    kind: ElementKind::Loop,
                    positions: std::mem::take(&mut run),
                });
            }
        }
        if !run.is_empty() {
            elements.push(StructuralElement {
                kind: ElementKind::Loop,
                positions: run,
            });
        }
        elements
    }

    /// The dot-bracket string as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
