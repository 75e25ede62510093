//! Thompson selection: highest sampled score wins.

use trader_core::{TraderError, TraderResult};

/// One arm's score for a single round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledCandidate<K> {
    pub key: K,
    pub score: f64,
}

impl<K> SampledCandidate<K> {
    pub fn new(key: K, score: f64) -> Self {
        Self { key, score }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionPolicy;

impl SelectionPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Pick the candidate with the maximum score. On ties the first one in
    /// input order wins.
    ///
    /// `round` is only used to label the error when `candidates` is empty.
    pub fn select<K>(
        &self,
        candidates: Vec<SampledCandidate<K>>,
        round: u64,
    ) -> TraderResult<SampledCandidate<K>> {
        let mut best: Option<SampledCandidate<K>> = None;
        for candidate in candidates {
            let better = match &best {
                Some(current) => candidate.score > current.score,
                None => true,
            };
            if better {
                best = Some(candidate);
            }
        }
        best.ok_or(TraderError::NoApplicableRule { round })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_maximum_wins_ties() {
        let candidates = vec![
            SampledCandidate::new("R1", 0.3),
            SampledCandidate::new("R2", 0.9),
            SampledCandidate::new("R3", 0.9),
        ];
        let winner = SelectionPolicy::new().select(candidates, 0).unwrap();
        assert_eq!(winner.key, "R2");
        assert_eq!(winner.score, 0.9);
    }

    #[test]
    fn test_single_candidate_is_chosen() {
        let candidates = vec![SampledCandidate::new(7usize, 0.01)];
        let winner = SelectionPolicy::new().select(candidates, 0).unwrap();
        assert_eq!(winner.key, 7);
    }

    #[test]
    fn test_empty_signals_no_applicable_rule() {
        let empty: Vec<SampledCandidate<&str>> = Vec::new();
        let result = SelectionPolicy::new().select(empty, 12);
        assert!(matches!(result, Err(TraderError::NoApplicableRule { round: 12 })));
    }

    #[test]
    fn test_last_position_can_win() {
        let candidates = vec![
            SampledCandidate::new(0usize, 0.1),
            SampledCandidate::new(1, 0.2),
            SampledCandidate::new(2, 0.95),
        ];
        let winner = SelectionPolicy::new().select(candidates, 0).unwrap();
        assert_eq!(winner.key, 2);
    }
}
