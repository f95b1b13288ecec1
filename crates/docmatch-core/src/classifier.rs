//! Decide which name-ordering convention an author list follows.
//!
//! Each convention's pattern is run over the whole list and scored by how
//! many leading words of the list its matches reproduce verbatim. The best
//! score wins outright; ties go through [`resolve_tie`].

use std::fmt;

use serde::Serialize;

use crate::patterns::{NameOrderingConvention, WORD_RE};

/// Outcome of classifying an author list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierVerdict {
    Convention(NameOrderingConvention),
    /// No convention explains even the first word of the list.
    Ambiguous,
    /// Several conventions tie in a way the tie table cannot settle.
    Conflicting,
}

/// Per-convention prefix scores, indexed like [`NameOrderingConvention::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CandidateScores(pub [usize; 4]);

impl CandidateScores {
    pub fn get(&self, convention: NameOrderingConvention) -> usize {
        self.0[convention.index()]
    }

    pub fn max(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Conventions reaching the maximum score.
    pub fn winners(&self) -> WinnerMask {
        let max = self.max();
        WinnerMask(self.0.map(|score| score == max))
    }

    fn positives(&self) -> impl Iterator<Item = NameOrderingConvention> + '_ {
        NameOrderingConvention::ALL
            .into_iter()
            .filter(|c| self.get(*c) > 0)
    }
}

impl fmt::Display for CandidateScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [ti, li, tf, lf] = self.0;
        write!(f, "TI={ti} LI={li} TF={tf} LF={lf}")
    }
}

/// Which conventions share the top score, in [`NameOrderingConvention::ALL`]
/// order. As an integer the first convention is the most significant bit, so
/// `0b1010` means trailing initials and trailing full given name tied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinnerMask(pub [bool; 4]);

impl WinnerMask {
    /// Build a mask from its 4-bit integer form. Higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        WinnerMask([
            bits & 0b1000 != 0,
            bits & 0b0100 != 0,
            bits & 0b0010 != 0,
            bits & 0b0001 != 0,
        ])
    }

    pub fn bits(&self) -> u8 {
        self.0
            .iter()
            .fold(0u8, |acc, &on| (acc << 1) | u8::from(on))
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&on| on).count()
    }

    pub fn contains(&self, convention: NameOrderingConvention) -> bool {
        self.0[convention.index()]
    }
}

/// How a winner mask resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    Pick(NameOrderingConvention),
    Undecidable,
}

/// Resolve a set of tied winners.
///
/// Empty, full and contradictory masks (trailing on one side tied with
/// leading on the other) are undecidable. Single-winner masks pick their
/// winner. The remaining combinations prefer the more specific pattern: an
/// initials pattern over the full-name pattern it overlaps with, and the
/// surname-first reading when only the two full-name patterns tie.
pub fn resolve_tie(mask: WinnerMask) -> TieBreak {
    use NameOrderingConvention::{
        LeadingFullGiven, LeadingInitials, TrailingFullGiven, TrailingInitials,
    };
    use TieBreak::{Pick, Undecidable};

    //                                   TI     LI     TF     LF
    match mask.0 {
        /* 0b0000 */ [false, false, false, false] => Undecidable,
        /* 0b0001 */ [false, false, false, true] => Pick(LeadingFullGiven),
        /* 0b0010 */ [false, false, true, false] => Pick(TrailingFullGiven),
        /* 0b0011 */ [false, false, true, true] => Pick(TrailingFullGiven),
        /* 0b0100 */ [false, true, false, false] => Pick(LeadingInitials),
        /* 0b0101 */ [false, true, false, true] => Pick(LeadingInitials),
        /* 0b0110 */ [false, true, true, false] => Undecidable,
        /* 0b0111 */ [false, true, true, true] => Pick(LeadingInitials),
        /* 0b1000 */ [true, false, false, false] => Pick(TrailingInitials),
        /* 0b1001 */ [true, false, false, true] => Undecidable,
        /* 0b1010 */ [true, false, true, false] => Pick(TrailingInitials),
        /* 0b1011 */ [true, false, true, true] => Pick(TrailingInitials),
        /* 0b1100 */ [true, true, false, false] => Undecidable,
        /* 0b1101 */ [true, true, false, true] => Pick(LeadingFullGiven),
        /* 0b1110 */ [true, true, true, false] => Pick(TrailingFullGiven),
        /* 0b1111 */ [true, true, true, true] => Undecidable,
    }
}

/// Number of leading words of `text` reproduced, word for word, by the
/// concatenated capture groups of every match of `convention`.
///
/// A convention that only matches fragments further into the list scores
/// zero, however many fragments it finds.
pub fn candidate_score(text: &str, convention: NameOrderingConvention) -> usize {
    let mut rebuilt: Vec<&str> = Vec::new();
    for caps in convention.pattern().captures_iter(text) {
        for group in caps.iter().skip(1).flatten() {
            rebuilt.extend(WORD_RE.find_iter(group.as_str()).map(|m| m.as_str()));
        }
    }

    rebuilt
        .iter()
        .zip(WORD_RE.find_iter(text))
        .take_while(|(rebuilt, source)| **rebuilt == source.as_str())
        .count()
}

/// Score every convention against `text`.
pub fn score(text: &str) -> CandidateScores {
    CandidateScores(NameOrderingConvention::ALL.map(|c| candidate_score(text, c)))
}

/// Classify a collaboration-free author list.
pub fn classify(text: &str) -> ClassifierVerdict {
    classify_with_scores(text).1
}

/// [`classify`], also returning the scores the verdict was drawn from.
pub fn classify_with_scores(text: &str) -> (CandidateScores, ClassifierVerdict) {
    let scores = score(text);
    let verdict = decide(&scores);
    tracing::debug!(%scores, ?verdict, "classified author list");
    (scores, verdict)
}

/// Turn a set of scores into a verdict.
///
/// 1. All zero: [`ClassifierVerdict::Ambiguous`].
/// 2. A unique maximum wins.
/// 3. When exactly one convention scored above zero without reaching the
///    maximum, that weaker convention wins.
/// 4. Otherwise the tied winners go through [`resolve_tie`].
pub fn decide(scores: &CandidateScores) -> ClassifierVerdict {
    if scores.max() == 0 {
        return ClassifierVerdict::Ambiguous;
    }

    let winners = scores.winners();
    if winners.count() == 1 {
        if let Some(winner) = NameOrderingConvention::ALL
            .into_iter()
            .find(|c| winners.contains(*c))
        {
            return ClassifierVerdict::Convention(winner);
        }
    }

    let positives = scores.positives().count();
    if positives - winners.count() == 1 {
        if let Some(weakest) = scores.positives().min_by_key(|c| scores.get(*c)) {
            return ClassifierVerdict::Convention(weakest);
        }
    }

    match resolve_tie(winners) {
        TieBreak::Pick(convention) => ClassifierVerdict::Convention(convention),
        TieBreak::Undecidable => ClassifierVerdict::Conflicting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NameOrderingConvention::{
        LeadingFullGiven, LeadingInitials, TrailingFullGiven, TrailingInitials,
    };

    #[test]
    fn test_mask_bits_roundtrip() {
        for bits in 0u8..16 {
            assert_eq!(WinnerMask::from_bits(bits).bits(), bits);
        }
        assert_eq!(WinnerMask([true, false, true, false]).bits(), 10);
    }

    #[test]
    fn test_resolve_tie_all_sixteen_masks() {
        let expected = [
            TieBreak::Undecidable,             // 0
            TieBreak::Pick(LeadingFullGiven),  // 1
            TieBreak::Pick(TrailingFullGiven), // 2
            TieBreak::Pick(TrailingFullGiven), // 3
            TieBreak::Pick(LeadingInitials),   // 4
            TieBreak::Pick(LeadingInitials),   // 5
            TieBreak::Undecidable,             // 6
            TieBreak::Pick(LeadingInitials),   // 7
            TieBreak::Pick(TrailingInitials),  // 8
            TieBreak::Undecidable,             // 9
            TieBreak::Pick(TrailingInitials),  // 10
            TieBreak::Pick(TrailingInitials),  // 11
            TieBreak::Undecidable,             // 12
            TieBreak::Pick(LeadingFullGiven),  // 13
            TieBreak::Pick(TrailingFullGiven), // 14
            TieBreak::Undecidable,             // 15
        ];
        for (bits, want) in expected.iter().enumerate() {
            assert_eq!(
                resolve_tie(WinnerMask::from_bits(bits as u8)),
                *want,
                "mask {bits:04b}"
            );
        }
    }

    #[test]
    fn test_score_trailing_initials() {
        let text = "Frey, K., Accomazzi, A.";
        assert_eq!(candidate_score(text, TrailingInitials), 4);
        assert_eq!(candidate_score(text, LeadingInitials), 0);
        assert_eq!(candidate_score(text, TrailingFullGiven), 4);
        assert_eq!(candidate_score(text, LeadingFullGiven), 0);
    }

    #[test]
    fn test_score_requires_match_at_start() {
        // Trailing patterns only pick up "Frey, A." which is not where the list starts.
        let text = "K. Frey, A. Accomazzi";
        assert_eq!(candidate_score(text, TrailingInitials), 0);
        assert_eq!(candidate_score(text, LeadingInitials), 4);
    }

    #[test]
    fn test_unique_winner() {
        let scores = CandidateScores([0, 0, 3, 4]);
        assert_eq!(decide(&scores), ClassifierVerdict::Convention(LeadingFullGiven));
    }

    #[test]
    fn test_all_zero_is_ambiguous() {
        assert_eq!(decide(&CandidateScores([0, 0, 0, 0])), ClassifierVerdict::Ambiguous);
        assert_eq!(classify(""), ClassifierVerdict::Ambiguous);
    }

    #[test]
    fn test_lone_weaker_signal_wins() {
        let scores = CandidateScores([2, 0, 3, 3]);
        assert_eq!(decide(&scores), ClassifierVerdict::Convention(TrailingInitials));
        let scores = CandidateScores([3, 0, 3, 2]);
        assert_eq!(decide(&scores), ClassifierVerdict::Convention(LeadingFullGiven));
    }

    #[test]
    fn test_tie_table_is_applied() {
        // TI and TF tie: 0b1010
        assert_eq!(
            decide(&CandidateScores([4, 0, 4, 0])),
            ClassifierVerdict::Convention(TrailingInitials)
        );
        // LI and LF tie: 0b0101
        assert_eq!(
            decide(&CandidateScores([0, 4, 0, 4])),
            ClassifierVerdict::Convention(LeadingInitials)
        );
        // TF and LF tie: 0b0011
        assert_eq!(
            decide(&CandidateScores([0, 0, 2, 2])),
            ClassifierVerdict::Convention(TrailingFullGiven)
        );
    }

    #[test]
    fn test_contradictory_tie_conflicts() {
        // LI and TF tie: 0b0110
        assert_eq!(decide(&CandidateScores([0, 2, 2, 0])), ClassifierVerdict::Conflicting);
        // TI and LF tie: 0b1001
        assert_eq!(decide(&CandidateScores([2, 0, 0, 2])), ClassifierVerdict::Conflicting);
    }

    #[test]
    fn test_classify_fixtures() {
        assert_eq!(
            classify("Frey, K., Accomazzi, A."),
            ClassifierVerdict::Convention(TrailingInitials)
        );
        assert_eq!(
            classify("K. Frey, A. Accomazzi"),
            ClassifierVerdict::Convention(LeadingInitials)
        );
        assert_eq!(
            classify("Frey, Katie, Accomazzi, Alberto"),
            ClassifierVerdict::Convention(TrailingFullGiven)
        );
        assert_eq!(
            classify("Katie Frey, Alberto Accomazzi"),
            ClassifierVerdict::Convention(LeadingFullGiven)
        );
        assert_eq!(classify("Frey, K, Accomazzi, A"), ClassifierVerdict::Ambiguous);
    }
}
