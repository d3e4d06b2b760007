//! Structure/constraint ingestion from files, streams and built-in defaults.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alphabet::{parse_sequence, IupacCode, SequenceConstraint};
use crate::errors::{DesignError, ErrorInfo};
use crate::structure::Structure;

/// Tri-stable example used when no input is given.
pub const DEFAULT_STRUCTURES: [&str; 3] = [
    "((((....))))....((((....))))........",
    "........((((....((((....))))....))))",
    "((((((((....))))((((....))))....))))",
];

/// Validated design problem: target structures, constraint and optional start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignInput {
    /// Ordered target structures, all of the same length.
    pub structures: Vec<Structure>,
    /// Per-position IUPAC constraint.
    pub constraint: SequenceConstraint,
    /// Optional start sequence (upper case, `T` kept as written).
    pub start_sequence: Option<String>,
}

impl DesignInput {
    /// Builds and validates a design problem from raw strings.
    pub fn new(
        structures: &[&str],
        constraint: Option<&str>,
        start_sequence: Option<&str>,
    ) -> Result<Self, DesignError> {
        let structures = structures
            .iter()
            .map(|raw| Structure::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        let Some(first) = structures.first() else {
            return Err(DesignError::Input(
                ErrorInfo::new("no-structures", "at least one target structure is required")
                    .with_hint("add dot-bracket lines to the input"),
            ));
        };
        let length = first.len();
        for (index, structure) in structures.iter().enumerate() {
            if structure.len() != length {
                return Err(DesignError::Input(
                    ErrorInfo::new("length-mismatch", "structures differ in length")
                        .with_context("structure", index.to_string())
                        .with_context("expected", length.to_string())
                        .with_context("found", structure.len().to_string()),
                ));
            }
        }

        let constraint = match constraint {
            Some(raw) => SequenceConstraint::parse(raw)?,
            None => SequenceConstraint::wildcard(length),
        };
        if constraint.len() != length {
            return Err(DesignError::Input(
                ErrorInfo::new("length-mismatch", "constraint length differs from structures")
                    .with_context("expected", length.to_string())
                    .with_context("found", constraint.len().to_string()),
            ));
        }

        let start_sequence = match start_sequence {
            Some(raw) if !raw.is_empty() => {
                let bases = parse_sequence(raw)?;
                if bases.len() != length {
                    return Err(DesignError::Input(
                        ErrorInfo::new("length-mismatch", "start sequence length differs from structures")
                            .with_context("expected", length.to_string())
                            .with_context("found", bases.len().to_string()),
                    ));
                }
                Some(raw.to_ascii_uppercase())
            }
            _ => None,
        };

        Ok(Self {
            structures,
            constraint,
            start_sequence,
        })
    }

    /// The built-in tri-stable example with an all-wildcard constraint.
    pub fn builtin() -> Self {
        let structures = DEFAULT_STRUCTURES
            .iter()
            .filter_map(|raw| Structure::parse(raw).ok())
            .collect::<Vec<_>>();
        let length = structures.first().map(Structure::len).unwrap_or(0);
        Self {
            structures,
            constraint: SequenceConstraint::wildcard(length),
            start_sequence: None,
        }
    }

    /// Sequence length shared by all structures.
    pub fn len(&self) -> usize {
        self.constraint.len()
    }

    /// Whether the problem has zero length.
    pub fn is_empty(&self) -> bool {
        self.constraint.is_empty()
    }

    /// Replaces the start sequence, validating its length and alphabet.
    pub fn with_start_sequence(mut self, raw: &str) -> Result<Self, DesignError> {
        let bases = parse_sequence(raw)?;
        if bases.len() != self.len() {
            return Err(DesignError::Input(
                ErrorInfo::new("length-mismatch", "start sequence length differs from structures")
                    .with_context("expected", self.len().to_string())
                    .with_context("found", bases.len().to_string()),
            ));
        }
        self.start_sequence = Some(raw.to_ascii_uppercase());
        Ok(self)
    }
}

/// Parses the line-oriented design format.
///
/// Blank lines and lines starting with `;` or `#` are skipped. Only the first
/// whitespace-separated token of a line is read. Tokens made of `.()[]{}<>`
/// are structures; the first letter token is the constraint and a second one
/// the start sequence.
pub fn parse_design_input(text: &str) -> Result<DesignInput, DesignError> {
    let mut structures = Vec::new();
    let mut constraint = None;
    let mut start = None;

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }
        let Some(token) = trimmed.split_whitespace().next() else {
            continue;
        };
        if token.chars().all(|c| ".()[]{}<>".contains(c)) {
            structures.push(token);
        } else if token.bytes().all(|b| IupacCode::from_letter(b).is_some()) {
            if constraint.is_none() {
                constraint = Some(token);
            } else if start.is_none() {
                start = Some(token);
            } else {
                return Err(DesignError::Input(
                    ErrorInfo::new("extra-sequence", "more than two sequence lines in input")
                        .with_context("line", (line_no + 1).to_string()),
                ));
            }
        } else {
            return Err(DesignError::Input(
                ErrorInfo::new("unrecognised-line", "line is neither a structure nor a sequence")
                    .with_context("line", (line_no + 1).to_string())
                    .with_context("token", token),
            ));
        }
    }

    DesignInput::new(&structures, constraint, start)
}

/// Reads and parses a design file.
pub fn read_design_file(path: &Path) -> Result<DesignInput, DesignError> {
    let text = fs::read_to_string(path).map_err(|err| {
        DesignError::Input(
            ErrorInfo::new("input-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    parse_design_input(&text)
}

/// Reads and parses a design problem from a reader such as stdin.
pub fn read_design_stream<R: Read>(mut reader: R) -> Result<DesignInput, DesignError> {
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(|err| {
        DesignError::Input(ErrorInfo::new("stdin-read", err.to_string()))
    })?;
    parse_design_input(&text)
}

/// Reads a start sequence file, stripping trailing newlines.
pub fn read_start_sequence(path: &Path) -> Result<String, DesignError> {
    let text = fs::read_to_string(path).map_err(|err| {
        DesignError::Input(
            ErrorInfo::new("start-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    Ok(text.trim_end_matches(|c| c == '\n' || c == '\r').to_string())
}
