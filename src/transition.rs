//! Jump distributions conditioned on the sentence length.

use std::io::{BufRead, BufReader, Read};

use hashbrown::HashMap;

use crate::errors::{HmmAlignError, Result};

/// Normalized jump probabilities for every observed sentence length.
#[derive(Debug, Default, Clone)]
pub struct TransitionModel {
    jumps: HashMap<usize, HashMap<i64, f64>>,
}

impl TransitionModel {
    /// Reads records of the form `length jump:weight; jump:weight; ...`.
    ///
    /// Weights of a length may be spread over several records; a jump given
    /// twice keeps the later weight. Each length is then normalized to sum
    /// to one.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let buf = BufReader::new(rdr);

        let mut jumps: HashMap<usize, HashMap<i64, f64>> = HashMap::new();
        let mut last_line = HashMap::new();
        for (i, line) in buf.lines().enumerate() {
            let line = line?;
            let lineno = i + 1;
            let line = line.replace(';', " ");
            let mut spl = line.split_whitespace();
            let length = match spl.next() {
                Some(length) => length,
                None => continue,
            };
            let length: usize = length.parse().map_err(|e| {
                HmmAlignError::malformed("transition", lineno, format!("length: {e}"))
            })?;
            for pair in spl {
                let (jump, weight) = pair.split_once(':').ok_or_else(|| {
                    HmmAlignError::malformed(
                        "transition",
                        lineno,
                        format!("`{pair}` is not a jump:weight pair"),
                    )
                })?;
                let jump: i64 = jump.parse().map_err(|e| {
                    HmmAlignError::malformed("transition", lineno, format!("jump: {e}"))
                })?;
                let weight: f64 = weight.parse().map_err(|e| {
                    HmmAlignError::malformed("transition", lineno, format!("weight: {e}"))
                })?;
                if !weight.is_finite() || weight < 0.0 {
                    return Err(HmmAlignError::malformed(
                        "transition",
                        lineno,
                        format!("weight must be a non-negative number, got {weight}"),
                    ));
                }
                jumps.entry(length).or_default().insert(jump, weight);
                last_line.insert(length, lineno);
            }
        }

        for (length, probs) in &mut jumps {
            let total: f64 = probs.values().sum();
            if total <= 0.0 {
                return Err(HmmAlignError::malformed(
                    "transition",
                    last_line.get(length).copied().unwrap_or(0),
                    format!("weights of length {length} sum to zero"),
                ));
            }
            for prob in probs.values_mut() {
                *prob /= total;
            }
        }
        tracing::debug!(lengths = jumps.len(), "loaded transition model");

        Ok(Self { jumps })
    }

    /// Returns the probability of `jump` in a sentence of length `length`.
    ///
    /// Unobserved lengths are uniform and yield 1 for every jump; an unseen
    /// jump of an observed length yields 0.
    pub fn jump_probability(&self, length: usize, jump: i64) -> f64 {
        match self.jumps.get(&length) {
            Some(probs) => probs.get(&jump).copied().unwrap_or(0.0),
            None => 1.0,
        }
    }

    /// Observed lengths in ascending order.
    pub fn lengths(&self) -> Vec<usize> {
        let mut lengths: Vec<_> = self.jumps.keys().copied().collect();
        lengths.sort_unstable();
        lengths
    }

    /// Observed jumps of `length` with their probabilities, sorted by jump.
    pub fn distribution(&self, length: usize) -> Vec<(i64, f64)> {
        let mut dist: Vec<_> = self
            .jumps
            .get(&length)
            .map(|probs| probs.iter().map(|(&j, &p)| (j, p)).collect())
            .unwrap_or_default();
        dist.sort_unstable_by_key(|&(jump, _)| jump);
        dist
    }

    pub fn is_empty(&self) -> bool {
        self.jumps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HMM_DATA: &str = "\
3 -2:182.773; -1:1106.93; 0:664.036; 1:44.329; 2:26.9507;
1 0:2.5;   \n\
5 -1:1; 1:3;
";

    #[test]
    fn test_distributions_are_normalized() {
        let model = TransitionModel::from_reader(HMM_DATA.as_bytes()).unwrap();

        assert_eq!(vec![1, 3, 5], model.lengths());
        for length in model.lengths() {
            let total: f64 = model
                .distribution(length)
                .iter()
                .map(|&(jump, _)| model.jump_probability(length, jump))
                .sum();
            assert!((total - 1.0).abs() < 1e-6, "length {length}: {total}");
        }
        assert!((model.jump_probability(5, 1) - 0.75).abs() < 1e-12);
        assert!((model.jump_probability(1, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fallbacks() {
        let model = TransitionModel::from_reader(HMM_DATA.as_bytes()).unwrap();

        assert_eq!(1.0, model.jump_probability(4, 0));
        assert_eq!(1.0, model.jump_probability(4, -17));
        assert_eq!(0.0, model.jump_probability(5, 0));
        assert_eq!(0.0, model.jump_probability(3, 3));

        let empty = TransitionModel::from_reader("".as_bytes()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(1.0, empty.jump_probability(1, 0));
    }

    #[test]
    fn test_records_merge_per_length() {
        let data = "\
2 -1:1; 0:1;
2 1:2;
2 0:3;
";
        let model = TransitionModel::from_reader(data.as_bytes()).unwrap();

        assert_eq!(
            vec![(-1, 1.0 / 6.0), (0, 3.0 / 6.0), (1, 2.0 / 6.0)],
            model.distribution(2)
        );
    }

    #[test]
    fn test_malformed_record() {
        let err = TransitionModel::from_reader("3 -1:1; 0\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            HmmAlignError::MalformedModelRecord { line: 1, .. }
        ));

        let err = TransitionModel::from_reader("x 0:1;\n".as_bytes()).unwrap_err();
        assert!(matches!(err, HmmAlignError::MalformedModelRecord { .. }));

        let err = TransitionModel::from_reader("2 0:0; 1:0;\n".as_bytes()).unwrap_err();
        assert!(matches!(err, HmmAlignError::MalformedModelRecord { .. }));
    }
}
