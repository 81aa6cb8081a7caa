//! Viterbi decoding of the HMM alignment model.
//!
//! A sentence pair with `I` source words has `2I` states per target position.
//! States `0..I` align the target word to a source word. States `I..2I` align
//! it to the null word while remembering an anchor in the source sentence, so
//! that the jump following a run of null alignments is measured from the last
//! real position.

use crate::array_2d::Array2d;
use crate::constraint::PhrasePair;
use crate::errors::Result;
use crate::lexicon::LexicalModel;
use crate::transition::TransitionModel;
use crate::WordId;

/// Source id whose lexical entries are the emissions of the null word.
pub const NULL_WORD: WordId = 0;

/// Hidden state of a target position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Aligned to the source position.
    Aligned(usize),
    /// Aligned to null, anchored at the source position.
    Null(usize),
}

impl State {
    #[inline(always)]
    pub fn from_index(index: usize, source_len: usize) -> Self {
        if index < source_len {
            Self::Aligned(index)
        } else {
            Self::Null(index - source_len)
        }
    }

    /// Source position used to measure jumps.
    #[inline(always)]
    pub fn anchor(self) -> usize {
        match self {
            Self::Aligned(i) | Self::Null(i) => i,
        }
    }

    #[inline(always)]
    pub fn source(self) -> Option<usize> {
        match self {
            Self::Aligned(i) => Some(i),
            Self::Null(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Cell {
    score: f64,
    prev: Option<usize>,
}

/// Dynamic-programming grid with one row of `2I` cells per target position.
pub struct Trellis {
    source_len: usize,
    cells: Array2d<Cell>,
    // Cells set by a phrase alignment; the recurrence leaves them untouched.
    fixed: Array2d<bool>,
}

impl Trellis {
    fn new(source_len: usize, target_len: usize) -> Self {
        Self {
            source_len,
            cells: Array2d::new(2 * source_len, target_len, Cell::default()),
            fixed: Array2d::new(2 * source_len, target_len, false),
        }
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn target_len(&self) -> usize {
        self.cells.height()
    }

    pub fn n_states(&self) -> usize {
        self.cells.width()
    }

    /// Number of cells, `J * 2I`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn score(&self, state: usize, j: usize) -> Option<f64> {
        self.cells.get(state, j).map(|c| c.score)
    }

    pub fn predecessor(&self, state: usize, j: usize) -> Option<usize> {
        self.cells.get(state, j).and_then(|c| c.prev)
    }

    fn set(&mut self, state: usize, j: usize, cell: Cell) {
        if let Some(c) = self.cells.get_mut(state, j) {
            *c = cell;
        }
    }

    fn force(&mut self, state: usize, j: usize, score: f64) {
        self.set(state, j, Cell { score, prev: None });
        if let Some(f) = self.fixed.get_mut(state, j) {
            *f = true;
        }
    }

    fn release(&mut self, state: usize, j: usize) {
        if let Some(f) = self.fixed.get_mut(state, j) {
            *f = false;
        }
    }

    fn is_fixed(&self, state: usize, j: usize) -> bool {
        self.fixed.get(state, j).copied().unwrap_or(false)
    }

    /// Pre-fills the cells restricted by a phrase alignment.
    fn apply_constraints(&mut self, pairs: &[PhrasePair]) -> Result<()> {
        let source_len = self.source_len;
        for pair in pairs {
            pair.validate(source_len, self.target_len())?;
            for &j in &pair.target {
                for i in 0..source_len {
                    self.force(i, j, 0.0);
                }
                if pair.source.is_empty() {
                    for i in source_len..2 * source_len {
                        self.force(i, j, 1.0);
                    }
                } else {
                    for &i in &pair.source {
                        self.release(i, j);
                    }
                }
            }
        }
        Ok(())
    }

    /// Maximum score of row `j`, or `None` if the row has no cells.
    fn row_max(&self, j: usize) -> Option<f64> {
        self.cells
            .row(j)
            .iter()
            .map(|c| c.score)
            .reduce(f64::max)
    }

    /// First state with the strictly greatest score in row `j`.
    fn best_state(&self, j: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, c) in self.cells.row(j).iter().enumerate() {
            if best.map_or(true, |(_, score)| score < c.score) {
                best = Some((i, c.score));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Follows the predecessor links from the best final state.
    ///
    /// Entries are produced from the last target position to the first. A
    /// pre-filled cell has no predecessor; the walk then resumes from the best
    /// state of the previous row.
    pub fn backtrace(&self) -> Vec<(usize, Option<usize>)> {
        let target_len = self.target_len();
        let mut alignment = Vec::with_capacity(target_len);
        if target_len == 0 {
            return alignment;
        }
        let mut j = target_len - 1;
        let mut state = self.best_state(j);
        loop {
            let source = state.and_then(|s| State::from_index(s, self.source_len()).source());
            alignment.push((j, source));
            if j == 0 {
                break;
            }
            state = match state.and_then(|s| self.predecessor(s, j)) {
                Some(k) => Some(k),
                None => self.best_state(j - 1),
            };
            j -= 1;
        }
        alignment
    }
}

/// Runs the Viterbi recurrence over a sentence pair.
///
/// # Errors
///
/// Fails if a source word, or the null word, whose emission is needed has no
/// lexical entries, or if `phrase_alignment` refers to positions outside the
/// sentence pair.
pub fn viterbi(
    lexicon: &LexicalModel,
    transitions: &TransitionModel,
    source: &[WordId],
    target: &[WordId],
    pnull: f64,
    phrase_alignment: Option<&[PhrasePair]>,
) -> Result<Trellis> {
    let source_len = source.len();
    let n_states = 2 * source_len;
    let mut trellis = Trellis::new(source_len, target.len());
    if let Some(pairs) = phrase_alignment {
        trellis.apply_constraints(pairs)?;
    }

    for (j, &tgt_word) in target.iter().enumerate() {
        let q_max = if j == 0 {
            1.0
        } else {
            trellis.row_max(j - 1).unwrap_or_else(|| {
                tracing::trace!(j, "empty trellis row, no rescaling");
                1.0
            })
        };
        for i in 0..n_states {
            if trellis.is_fixed(i, j) {
                continue;
            }
            let state = State::from_index(i, source_len);
            let src_word = state.source().map_or(NULL_WORD, |s| source[s]);
            let emission = lexicon.probability(src_word, tgt_word)?;
            if j == 0 {
                trellis.set(
                    i,
                    j,
                    Cell {
                        score: emission,
                        prev: None,
                    },
                );
                continue;
            }

            let mut best: Option<(usize, f64)> = None;
            for k in 0..n_states {
                let prev_anchor = State::from_index(k, source_len).anchor();
                let transition = match state {
                    State::Aligned(s) => {
                        transitions.jump_probability(source_len, s as i64 - prev_anchor as i64)
                    }
                    State::Null(anchor) if anchor == prev_anchor => pnull,
                    State::Null(_) => 0.0,
                };
                let mut prev_score = trellis.cells.row(j - 1)[k].score;
                if q_max > 0.0 {
                    prev_score /= q_max;
                }
                let prob = transition * prev_score;
                if best.map_or(true, |(_, p)| p < prob) {
                    best = Some((k, prob));
                }
            }
            if let Some((k, prob)) = best {
                trellis.set(
                    i,
                    j,
                    Cell {
                        score: prob * emission,
                        prev: Some(k),
                    },
                );
            }
        }
    }

    Ok(trellis)
}
