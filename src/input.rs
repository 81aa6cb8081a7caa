//! Sentence pairs read by the command-line aligner.
//!
//! Each line holds `source ||| target`, optionally followed by
//! `||| phrase-alignment` (see [`parse_phrase_alignment`]).

use crate::constraint::{parse_phrase_alignment, PhrasePair};
use crate::errors::{HmmAlignError, Result};
use crate::AlignmentPoint;

const FIELD_SEPARATOR: &str = "|||";

/// One sentence pair of the input.
#[derive(Debug, PartialEq, Eq)]
pub struct InputPair<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub phrase_alignment: Option<Vec<PhrasePair>>,
}

pub fn parse_line(line: &str) -> Result<InputPair<'_>> {
    let mut spl = line.split(FIELD_SEPARATOR).map(str::trim);
    let source = spl.next();
    let target = spl.next();
    let phrases = spl.next();
    match (source, target, phrases, spl.next()) {
        (Some(source), Some(target), phrases, None) => {
            let phrase_alignment = phrases.map(parse_phrase_alignment).transpose()?;
            Ok(InputPair {
                source,
                target,
                phrase_alignment,
            })
        }
        _ => Err(HmmAlignError::InvalidInput(format!(
            "expected `source ||| target [||| alignment]`, got `{line}`"
        ))),
    }
}

/// Writes every target token followed by `|i|`, where `i` is its source
/// position or -1 for null.
pub fn render_alignment(target: &str, alignment: &[AlignmentPoint]) -> Result<String> {
    let tokens: Vec<&str> = target.split_whitespace().collect();
    if tokens.len() != alignment.len() {
        return Err(HmmAlignError::InvalidInput(format!(
            "{} target tokens but {} alignment points",
            tokens.len(),
            alignment.len()
        )));
    }
    let mut buf = String::new();
    for (token, &(j, source)) in tokens.iter().zip(alignment) {
        if j != 0 {
            buf.push(' ');
        }
        buf.push_str(token);
        match source {
            Some(i) => buf.push_str(&format!(" |{i}|")),
            None => buf.push_str(" |-1|"),
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let pair = parse_line("das Haus ||| the house").unwrap();
        assert_eq!("das Haus", pair.source);
        assert_eq!("the house", pair.target);
        assert_eq!(None, pair.phrase_alignment);

        let pair = parse_line("das Haus ist ||| the house is ||| 0,1-0,1 2-2").unwrap();
        assert_eq!(
            Some(vec![
                PhrasePair::new(vec![0, 1], vec![0, 1]),
                PhrasePair::new(vec![2], vec![2]),
            ]),
            pair.phrase_alignment
        );
    }

    #[test]
    fn test_parse_line_invalid() {
        assert!(parse_line("das Haus").is_err());
        assert!(parse_line("a ||| b ||| 0-0 ||| c").is_err());
        assert!(parse_line("a ||| b ||| 0:0").is_err());
    }

    #[test]
    fn test_render_alignment() {
        let alignment = [(0, Some(1)), (1, None), (2, Some(0))];
        assert_eq!(
            "house |1| , |-1| the |0|",
            render_alignment("house , the", &alignment).unwrap()
        );
        assert!(render_alignment("house", &alignment).is_err());
    }
}
