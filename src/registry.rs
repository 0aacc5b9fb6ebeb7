use crate::error::{Error, Result};
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

static STIMULI_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/stimuli");

const BUILTIN_STIMULI: &str = "words.json";

/// Words strictly longer than this satisfy the length rule
pub const LENGTH_THRESHOLD: usize = 5;

/// A classification rule applied to a word to get the expected Yes/No answer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    /// word names a living thing
    Living,
    /// word has more than [`LENGTH_THRESHOLD`] letters
    Length,
}

impl Rule {
    pub const ALL: [Rule; 2] = [Rule::Living, Rule::Length];

    pub fn id(&self) -> &'static str {
        match self {
            Rule::Living => "living",
            Rule::Length => "length",
        }
    }

    /// Question shown to the participant while the rule is active
    pub fn question(&self) -> &'static str {
        match self {
            Rule::Living => "Is it LIVING?",
            Rule::Length => "More than 5 letters?",
        }
    }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rule::ALL
            .into_iter()
            .find(|rule| rule.id() == s)
            .ok_or_else(|| Error::UnknownRule(s.to_string()))
    }
}

#[derive(Deserialize, Debug)]
struct StimulusSet {
    name: String,
    words: Vec<String>,
    living: Vec<String>,
}

/// Fixed vocabulary plus the data the rules need to judge it.
///
/// Immutable once built; sessions share one instance behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Registry {
    pub name: String,
    words: Vec<String>,
    living: HashSet<String>,
}

impl Registry {
    /// Registry backed by the stimulus set compiled into the binary
    pub fn builtin() -> Result<Self> {
        let file = STIMULI_DIR
            .get_file(BUILTIN_STIMULI)
            .ok_or_else(|| Error::Config(format!("stimulus file {BUILTIN_STIMULI} not embedded")))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::Config(format!("stimulus file {BUILTIN_STIMULI} is not utf-8")))?;

        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let set: StimulusSet = serde_json::from_str(json)?;

        if set.words.is_empty() {
            return Err(Error::Config(format!("stimulus set {} has no words", set.name)));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = set.words.iter().find(|w| !seen.insert(w.as_str())) {
            return Err(Error::Config(format!("duplicate word in vocabulary: {dup}")));
        }

        if let Some(stray) = set.living.iter().find(|w| !seen.contains(w.as_str())) {
            return Err(Error::Config(format!(
                "living word {stray} is missing from the vocabulary"
            )));
        }

        Ok(Self {
            name: set.name,
            living: set.living.into_iter().collect(),
            words: set.words,
        })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Expected answer for `word` under `rule`. Words outside the vocabulary are rejected.
    pub fn evaluate(&self, rule: Rule, word: &str) -> Result<bool> {
        if !self.contains(word) {
            return Err(Error::UnknownWord(word.to_string()));
        }

        Ok(match rule {
            Rule::Living => self.living.contains(word),
            Rule::Length => word.chars().count() > LENGTH_THRESHOLD,
        })
    }

    pub fn evaluate_id(&self, rule_id: &str, word: &str) -> Result<bool> {
        let rule = rule_id.parse::<Rule>()?;
        self.evaluate(rule, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_builtin_vocabulary() {
        let registry = Registry::builtin().unwrap();

        assert_eq!(registry.name, "category_switch");
        assert_eq!(registry.words().len(), 24);
        assert!(registry.contains("KEYBOARD"));
        assert!(!registry.contains("keyboard"));
    }

    #[test]
    fn test_living_rule() {
        let registry = Registry::builtin().unwrap();

        assert!(registry.evaluate(Rule::Living, "CAT").unwrap());
        assert!(registry.evaluate(Rule::Living, "FERN").unwrap());
        assert!(!registry.evaluate(Rule::Living, "LAMP").unwrap());
        // not in the living set even though it would be in real life
        assert!(!registry.evaluate(Rule::Living, "RABBIT").unwrap());
    }

    #[test]
    fn test_length_rule() {
        let registry = Registry::builtin().unwrap();

        assert!(registry.evaluate(Rule::Length, "WINDOW").unwrap());
        assert!(registry.evaluate(Rule::Length, "KEYBOARD").unwrap());
        assert!(!registry.evaluate(Rule::Length, "CHAIR").unwrap());
        assert!(!registry.evaluate(Rule::Length, "DESK").unwrap());
    }

    #[test]
    fn test_evaluate_is_total_over_domain() {
        let registry = Registry::builtin().unwrap();

        for word in registry.words() {
            for rule in Rule::ALL {
                assert!(registry.evaluate(rule, word).is_ok());
            }
        }
    }

    #[test]
    fn test_unknown_word_fails_fast() {
        let registry = Registry::builtin().unwrap();

        assert_matches!(
            registry.evaluate(Rule::Living, "UNICORN"),
            Err(Error::UnknownWord(w)) if w == "UNICORN"
        );
    }

    #[test]
    fn test_evaluate_by_id() {
        let registry = Registry::builtin().unwrap();

        assert!(registry.evaluate_id("living", "DOG").unwrap());
        assert!(!registry.evaluate_id("length", "DOG").unwrap());
        assert_matches!(
            registry.evaluate_id("colour", "DOG"),
            Err(Error::UnknownRule(id)) if id == "colour"
        );
    }

    #[test]
    fn test_rule_ids_roundtrip_through_display() {
        for rule in Rule::ALL {
            assert_eq!(rule.to_string(), rule.id());
            assert_eq!(rule.id().parse::<Rule>().unwrap(), rule);
        }
    }

    #[test]
    fn test_rule_questions() {
        assert_eq!(Rule::Living.question(), "Is it LIVING?");
        assert_eq!(Rule::Length.question(), "More than 5 letters?");
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let json = r#"{ "name": "dup", "words": ["CAT", "CAT"], "living": [] }"#;

        assert_matches!(Registry::from_json(json), Err(Error::Config(_)));
    }

    #[test]
    fn test_from_json_rejects_stray_living_word() {
        let json = r#"{ "name": "stray", "words": ["CAT"], "living": ["DOG"] }"#;

        assert_matches!(Registry::from_json(json), Err(Error::Config(_)));
    }

    #[test]
    fn test_from_json_rejects_empty_vocabulary() {
        let json = r#"{ "name": "empty", "words": [], "living": [] }"#;

        assert_matches!(Registry::from_json(json), Err(Error::Config(_)));
    }

    #[test]
    fn test_from_json_malformed() {
        assert_matches!(Registry::from_json("not json"), Err(Error::Json(_)));
    }
}
