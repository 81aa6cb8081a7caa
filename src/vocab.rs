//! Word to id tables.

use std::io::{BufRead, BufReader, Read};

use hashbrown::HashMap;

use crate::errors::{HmmAlignError, Result};
use crate::WordId;

/// Id assigned to words missing from the vocabulary.
pub const UNKNOWN_ID: WordId = 0;

/// Bidirectional mapping between words and ids of one language side.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    ids: HashMap<String, WordId>,
    words: HashMap<WordId, String>,
}

impl Vocabulary {
    /// Reads a vocabulary of `id word count` records.
    ///
    /// The count is parsed but not kept. Duplicate ids or words overwrite
    /// earlier records.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let buf = BufReader::new(rdr);

        let mut vocab = Self::default();
        for (i, line) in buf.lines().enumerate() {
            let line = line?;
            let lineno = i + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let (id, word, count) = match fields[..] {
                [id, word, count] => (id, word, count),
                [] => continue,
                _ => {
                    return Err(HmmAlignError::malformed(
                        "vocabulary",
                        lineno,
                        format!("expected 3 fields, got {}", fields.len()),
                    ))
                }
            };
            let id: WordId = id
                .parse()
                .map_err(|e| HmmAlignError::malformed("vocabulary", lineno, format!("id: {e}")))?;
            count
                .parse::<u64>()
                .map_err(|e| HmmAlignError::malformed("vocabulary", lineno, format!("count: {e}")))?;
            vocab.ids.insert(word.to_string(), id);
            vocab.words.insert(id, word.to_string());
        }
        tracing::debug!(words = vocab.ids.len(), "loaded vocabulary");

        Ok(vocab)
    }

    pub fn id(&self, word: &str) -> Option<WordId> {
        self.ids.get(word).copied()
    }

    pub fn word(&self, id: WordId) -> Option<&str> {
        self.words.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Maps whitespace-separated tokens to ids, using [`UNKNOWN_ID`] for
    /// words that are not in the vocabulary.
    pub fn map_sentence(&self, text: &str, lowercase: bool) -> Vec<WordId> {
        text.split_whitespace()
            .map(|token| {
                let id = if lowercase {
                    self.id(&token.to_lowercase())
                } else {
                    self.id(token)
                };
                id.unwrap_or(UNKNOWN_ID)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_vocabulary() {
        let data = "\
2 the 1200
3 house 17

4 green 9
";
        let vocab = Vocabulary::from_reader(data.as_bytes()).unwrap();

        assert_eq!(3, vocab.len());
        assert_eq!(Some(3), vocab.id("house"));
        assert_eq!(Some("green"), vocab.word(4));
        assert_eq!(None, vocab.word(1));
    }

    #[test]
    fn test_duplicates_overwrite() {
        let data = "\
2 the 1
2 a 1
5 the 1
";
        let vocab = Vocabulary::from_reader(data.as_bytes()).unwrap();

        assert_eq!(Some(5), vocab.id("the"));
        assert_eq!(Some("a"), vocab.word(2));
        assert_eq!(Some("the"), vocab.word(5));
    }

    #[test]
    fn test_map_sentence() {
        let data = "\
2 the 1
3 house 1
";
        let vocab = Vocabulary::from_reader(data.as_bytes()).unwrap();

        assert_eq!(vec![2, 0, 3], vocab.map_sentence(" the The house ", false));
        assert_eq!(vec![2, 2, 3], vocab.map_sentence("the The HOUSE", true));
        assert!(vocab.map_sentence("", false).is_empty());
    }

    #[test]
    fn test_malformed_record() {
        let data = "2 the\n";
        let err = Vocabulary::from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            HmmAlignError::MalformedModelRecord { line: 1, .. }
        ));

        let data = "2 the 1\nx house 1\n";
        let err = Vocabulary::from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            HmmAlignError::MalformedModelRecord { line: 2, .. }
        ));
    }
}
