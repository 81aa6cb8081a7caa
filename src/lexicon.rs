//! Lexical translation probabilities p(target | source).

use std::io::{BufRead, BufReader, Read};

use crate::errors::{HmmAlignError, Result};
use crate::map::HashMap2;
use crate::WordId;

/// Sparse table of lexical translation probabilities.
///
/// Source id 0 holds the probabilities of the null word.
#[derive(Debug, Default)]
pub struct LexicalModel {
    probs: HashMap2<WordId, WordId, f64>,
}

fn parse_field<T>(field: &str, name: &str, line: usize) -> Result<T>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    field
        .parse()
        .map_err(|e| HmmAlignError::malformed("lexical", line, format!("{name}: {e}")))
}

impl LexicalModel {
    /// Reads `src tgt prob` or `src tgt count prob` records, keeping the
    /// entries whose probability is strictly greater than `min_prob`.
    pub fn from_reader<R>(rdr: R, min_prob: f64) -> Result<Self>
    where
        R: Read,
    {
        let buf = BufReader::new(rdr);

        let mut probs = HashMap2::new();
        let mut discarded = 0;
        for (i, line) in buf.lines().enumerate() {
            let line = line?;
            let lineno = i + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let (src, tgt, prob) = match fields[..] {
                [src, tgt, prob] => (src, tgt, prob),
                [src, tgt, count, prob] => {
                    parse_field::<f64>(count, "count", lineno)?;
                    (src, tgt, prob)
                }
                [] => continue,
                _ => {
                    return Err(HmmAlignError::malformed(
                        "lexical",
                        lineno,
                        format!("expected 3 or 4 fields, got {}", fields.len()),
                    ))
                }
            };
            let src: WordId = parse_field(src, "source id", lineno)?;
            let tgt: WordId = parse_field(tgt, "target id", lineno)?;
            let prob: f64 = parse_field(prob, "probability", lineno)?;
            if prob > min_prob {
                probs.insert(src, tgt, prob);
            } else {
                discarded += 1;
            }
        }
        tracing::debug!(
            entries = probs.len(),
            discarded,
            min_prob,
            "loaded lexical model"
        );

        Ok(Self { probs })
    }

    /// Returns p(`tgt` | `src`).
    ///
    /// # Errors
    ///
    /// [`HmmAlignError::MissingLexicalEntry`] is returned if `src` has no
    /// entry at all. A known `src` with an unseen `tgt` yields 0.
    pub fn probability(&self, src: WordId, tgt: WordId) -> Result<f64> {
        let row = self
            .probs
            .row(&src)
            .ok_or(HmmAlignError::MissingLexicalEntry { source_id: src })?;
        Ok(row.get(&tgt).copied().unwrap_or(0.0))
    }

    pub fn contains(&self, src: WordId) -> bool {
        self.probs.contains_row(&src)
    }

    /// Number of kept entries.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the kept probabilities of every source word, sorted by id.
    pub fn source_totals(&self) -> Vec<(WordId, f64)> {
        let mut totals: Vec<_> = self
            .probs
            .rows()
            .map(|(&src, row)| (src, row.values().sum::<f64>()))
            .collect();
        totals.sort_unstable_by_key(|&(src, _)| src);
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability() {
        let data = "\
0 7 0.1
5 7 0.8
5 8 3 0.2
";
        let lex = LexicalModel::from_reader(data.as_bytes(), 0.0).unwrap();

        assert_eq!(3, lex.len());
        assert_eq!(0.8, lex.probability(5, 7).unwrap());
        assert_eq!(0.2, lex.probability(5, 8).unwrap());
        assert_eq!(0.0, lex.probability(0, 8).unwrap());
        assert!(lex.contains(0));
    }

    #[test]
    fn test_missing_source() {
        let lex = LexicalModel::from_reader("5 7 0.8\n".as_bytes(), 0.0).unwrap();

        assert!(matches!(
            lex.probability(6, 7),
            Err(HmmAlignError::MissingLexicalEntry { source_id: 6 })
        ));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let data = "\
5 7 0.5
5 8 0.01
6 7 0.01
";
        let lex = LexicalModel::from_reader(data.as_bytes(), 0.01).unwrap();

        assert_eq!(1, lex.len());
        assert_eq!(0.0, lex.probability(5, 8).unwrap());
        // every entry of 6 was discarded, so 6 is unknown
        assert!(!lex.contains(6));
        assert!(lex.probability(6, 7).is_err());
    }

    #[test]
    fn test_source_totals() {
        let data = "\
5 7 0.5
5 8 0.25
0 7 1.0
";
        let lex = LexicalModel::from_reader(data.as_bytes(), 0.0).unwrap();

        assert_eq!(vec![(0, 1.0), (5, 0.75)], lex.source_totals());
    }

    #[test]
    fn test_malformed_record() {
        let err = LexicalModel::from_reader("5 7\n".as_bytes(), 0.0).unwrap_err();
        assert!(matches!(
            err,
            HmmAlignError::MalformedModelRecord { line: 1, .. }
        ));

        let err = LexicalModel::from_reader("5 7 0.1\n5 8 p\n".as_bytes(), 0.0).unwrap_err();
        assert!(matches!(
            err,
            HmmAlignError::MalformedModelRecord { line: 2, .. }
        ));
    }
}
