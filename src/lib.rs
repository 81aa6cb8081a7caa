//! Word alignment with a first-order HMM.
//!
//! Given pre-computed lexical translation probabilities and jump
//! distributions (e.g. trained by GIZA++), the best alignment of every
//! target word to a source word or to null is found with the Viterbi
//! algorithm. A phrase alignment reported by a phrase-based decoder can be
//! used to restrict the search.

mod array_2d;
mod map;

pub mod constraint;
pub mod decoder;
pub mod errors;
pub mod input;
pub mod lexicon;
pub mod transition;
pub mod utils;
pub mod vocab;

pub use constraint::{parse_phrase_alignment, PhrasePair};
pub use errors::{HmmAlignError, Result};
pub use lexicon::LexicalModel;
pub use transition::TransitionModel;
pub use vocab::Vocabulary;

/// Id of a word in a [`Vocabulary`].
pub type WordId = u32;

/// Default probability of moving to, or staying at, the null word.
pub const DEFAULT_PNULL: f64 = 0.4;

/// Default threshold below which lexical entries are discarded.
pub const DEFAULT_MIN_PROB: f64 = 0.0;

/// Alignment of one target position: the source position, or `None` if the
/// target word is aligned to null.
pub type AlignmentPoint = (usize, Option<usize>);

/// The probability tables of an HMM alignment model.
///
/// The model is immutable once built and can be shared between threads.
pub struct HmmModel {
    lexicon: LexicalModel,
    transitions: TransitionModel,
}

impl HmmModel {
    pub fn new(lexicon: LexicalModel, transitions: TransitionModel) -> Self {
        Self {
            lexicon,
            transitions,
        }
    }

    pub fn lexicon(&self) -> &LexicalModel {
        &self.lexicon
    }

    pub fn transitions(&self) -> &TransitionModel {
        &self.transitions
    }

    /// Aligns every target word to a source word or to null.
    ///
    /// The result has one entry per target position, in ascending order.
    ///
    /// # Errors
    ///
    /// [`HmmAlignError::MissingLexicalEntry`] is returned if a needed source
    /// word has no lexical entries; no partial alignment is produced.
    /// [`HmmAlignError::InvalidConstraint`] is returned if `phrase_alignment`
    /// does not fit the sentence pair.
    pub fn align(
        &self,
        source: &[WordId],
        target: &[WordId],
        pnull: f64,
        phrase_alignment: Option<&[PhrasePair]>,
    ) -> Result<Vec<AlignmentPoint>> {
        let trellis = decoder::viterbi(
            &self.lexicon,
            &self.transitions,
            source,
            target,
            pnull,
            phrase_alignment,
        )?;
        let mut alignment = trellis.backtrace();
        alignment.reverse();
        tracing::trace!(?alignment, "aligned sentence pair");
        Ok(alignment)
    }
}
