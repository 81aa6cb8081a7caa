//! Phrase alignments that restrict the search space of the decoder.

use core::str::FromStr;

use crate::errors::HmmAlignError;

/// A correspondence between a set of source positions and a set of target
/// positions, as reported by a phrase-based decoder.
///
/// An empty `source` marks the target positions as explicitly unaligned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhrasePair {
    pub source: Vec<usize>,
    pub target: Vec<usize>,
}

impl PhrasePair {
    pub fn new(source: Vec<usize>, target: Vec<usize>) -> Self {
        Self { source, target }
    }

    pub(crate) fn validate(&self, source_len: usize, target_len: usize) -> Result<(), HmmAlignError> {
        if self.target.is_empty() {
            return Err(HmmAlignError::InvalidConstraint(format!(
                "{self} has no target positions"
            )));
        }
        if let Some(&j) = self.target.iter().find(|&&j| j >= target_len) {
            return Err(HmmAlignError::InvalidConstraint(format!(
                "target position {j} of {self} exceeds target length {target_len}"
            )));
        }
        if let Some(&i) = self.source.iter().find(|&&i| i >= source_len) {
            return Err(HmmAlignError::InvalidConstraint(format!(
                "source position {i} of {self} exceeds source length {source_len}"
            )));
        }
        Ok(())
    }
}

fn parse_positions(s: &str) -> Result<Vec<usize>, HmmAlignError> {
    if s.is_empty() {
        return Ok(vec![]);
    }
    s.split(',')
        .map(|x| {
            x.parse()
                .map_err(|e| HmmAlignError::InvalidInput(format!("position `{x}`: {e}")))
        })
        .collect()
}

fn write_positions(f: &mut core::fmt::Formatter, positions: &[usize]) -> core::fmt::Result {
    for (n, p) in positions.iter().enumerate() {
        if n != 0 {
            write!(f, ",")?;
        }
        write!(f, "{p}")?;
    }
    Ok(())
}

impl core::fmt::Display for PhrasePair {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write_positions(f, &self.source)?;
        write!(f, "-")?;
        write_positions(f, &self.target)
    }
}

/// Parses `S-T`, where both sides are comma-separated positions and `S`
/// may be empty.
impl FromStr for PhrasePair {
    type Err = HmmAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, target) = s.split_once('-').ok_or_else(|| {
            HmmAlignError::InvalidInput(format!("`{s}` is not a source-target correspondence"))
        })?;
        Ok(Self {
            source: parse_positions(source)?,
            target: parse_positions(target)?,
        })
    }
}

/// Parses a whitespace-separated list of correspondences.
pub fn parse_phrase_alignment(s: &str) -> Result<Vec<PhrasePair>, HmmAlignError> {
    s.split_whitespace().map(PhrasePair::from_str).collect()
}
