use crate::error::Result;
use crate::registry::{Registry, Rule};
use crate::sequencer::Trial;
use serde::{Deserialize, Serialize};

/// Binary response given by the participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum Answer {
    Yes,
    No,
}

impl From<bool> for Answer {
    fn from(v: bool) -> Self {
        if v {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

/// Outcome of a single answered trial; created once and never mutated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial_index: usize,
    pub word: String,
    pub rule: Rule,
    pub correct_answer: Answer,
    pub user_answer: Answer,
    pub correct: bool,
    pub response_time_ms: u64,
    pub is_switch: bool,
}

/// Judge `user_answer` against the registry's verdict for the trial.
///
/// There is no time limit: any `response_time_ms` is accepted as measured.
pub fn score(
    registry: &Registry,
    trial: &Trial,
    user_answer: Answer,
    response_time_ms: u64,
) -> Result<TrialResult> {
    let correct_answer = Answer::from(registry.evaluate(trial.rule, &trial.word)?);

    Ok(TrialResult {
        trial_index: trial.index,
        word: trial.word.clone(),
        rule: trial.rule,
        correct_answer,
        user_answer,
        correct: user_answer == correct_answer,
        response_time_ms,
        is_switch: trial.is_switch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sequencer::practice_sequence;
    use assert_matches::assert_matches;

    #[test]
    fn test_answer_from_bool() {
        assert_eq!(Answer::from(true), Answer::Yes);
        assert_eq!(Answer::from(false), Answer::No);
    }

    #[test]
    fn test_score_correct_response() {
        let registry = Registry::builtin().unwrap();
        let trials = practice_sequence();

        // CAT under the living rule
        let result = score(&registry, &trials[0], Answer::Yes, 812).unwrap();

        assert_eq!(result.trial_index, 0);
        assert_eq!(result.word, "CAT");
        assert_eq!(result.rule, Rule::Living);
        assert_eq!(result.correct_answer, Answer::Yes);
        assert!(result.correct);
        assert_eq!(result.response_time_ms, 812);
        assert!(!result.is_switch);
    }

    #[test]
    fn test_score_incorrect_response_on_switch() {
        let registry = Registry::builtin().unwrap();
        let trials = practice_sequence();

        // LAMP under the length rule: four letters, so No
        let result = score(&registry, &trials[2], Answer::Yes, 1300).unwrap();

        assert_eq!(result.correct_answer, Answer::No);
        assert_eq!(result.user_answer, Answer::Yes);
        assert!(!result.correct);
        assert!(result.is_switch);
    }

    #[test]
    fn test_score_is_independent_of_history() {
        let registry = Registry::builtin().unwrap();
        let trial = practice_sequence().remove(1);

        let first = score(&registry, &trial, Answer::No, 10).unwrap();
        let second = score(&registry, &trial, Answer::No, 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_score_rejects_unknown_word() {
        let registry = Registry::builtin().unwrap();
        let trial = Trial {
            index: 0,
            word: "GHOST".into(),
            rule: Rule::Living,
            is_switch: false,
        };

        assert_matches!(
            score(&registry, &trial, Answer::No, 100),
            Err(Error::UnknownWord(_))
        );
    }

    #[test]
    fn test_very_slow_response_is_kept() {
        let registry = Registry::builtin().unwrap();
        let trials = practice_sequence();

        let result = score(&registry, &trials[0], Answer::Yes, 3_600_000).unwrap();
        assert_eq!(result.response_time_ms, 3_600_000);
        assert!(result.correct);
    }
}
