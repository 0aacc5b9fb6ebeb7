use crate::error::{Error, Result};
use crate::registry::{Registry, Rule};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

pub const PRACTICE_WORDS: [&str; 3] = ["CAT", "TREE", "LAMP"];
pub const PRACTICE_RULES: [Rule; 3] = [Rule::Living, Rule::Living, Rule::Length];

pub const DEFAULT_TRIAL_COUNT: usize = 30;
pub const DEFAULT_SWITCH_PROBABILITY: f64 = 0.35;
pub const MAX_TRIAL_COUNT: usize = 1_000;

/// One word/rule pair shown to the participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    pub index: usize,
    pub word: String,
    pub rule: Rule,
    /// true iff the rule differs from the previous trial's rule
    pub is_switch: bool,
}

/// Parameters for a randomized trial block
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceConfig {
    pub trial_count: usize,
    pub switch_probability: f64,
    pub rules: (Rule, Rule),
    /// draw further reshuffled passes once the vocabulary runs out
    pub allow_word_repeats: bool,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            trial_count: DEFAULT_TRIAL_COUNT,
            switch_probability: DEFAULT_SWITCH_PROBABILITY,
            rules: (Rule::Living, Rule::Length),
            allow_word_repeats: true,
        }
    }
}

impl SequenceConfig {
    pub fn validate(&self, vocabulary_size: usize) -> Result<()> {
        if self.trial_count == 0 {
            return Err(Error::Config("trial count must be at least 1".into()));
        }
        if self.trial_count > MAX_TRIAL_COUNT {
            return Err(Error::Config(format!(
                "trial count {} exceeds the maximum of {MAX_TRIAL_COUNT}",
                self.trial_count
            )));
        }
        if !(0.0..=1.0).contains(&self.switch_probability) {
            return Err(Error::Config(format!(
                "switch probability {} is outside [0, 1]",
                self.switch_probability
            )));
        }
        if self.rules.0 == self.rules.1 {
            return Err(Error::Config("the two candidate rules must differ".into()));
        }
        if !self.allow_word_repeats && self.trial_count > vocabulary_size {
            return Err(Error::Config(format!(
                "{} trials requested but only {} distinct words are available",
                self.trial_count, vocabulary_size
            )));
        }
        Ok(())
    }
}

/// Zip words and rules positionally and derive the switch flags
pub fn build_trials(words: Vec<String>, rules: &[Rule]) -> Vec<Trial> {
    let switches = std::iter::once(false).chain(rules.iter().tuple_windows().map(|(a, b)| a != b));

    words
        .into_iter()
        .zip(rules.iter().copied())
        .zip(switches)
        .enumerate()
        .map(|(index, ((word, rule), is_switch))| Trial {
            index,
            word,
            rule,
            is_switch,
        })
        .collect()
}

/// Scripted three trial onboarding block with a single switch on the last trial
pub fn practice_sequence() -> Vec<Trial> {
    build_trials(
        PRACTICE_WORDS.iter().map(|w| w.to_string()).collect(),
        &PRACTICE_RULES,
    )
}

/// Randomized main block: shuffled words, rules from a two-state Markov chain
pub fn main_sequence<R: Rng + ?Sized>(
    rng: &mut R,
    registry: &Registry,
    config: &SequenceConfig,
) -> Result<Vec<Trial>> {
    config.validate(registry.words().len())?;

    let words = draw_words(rng, registry.words(), config.trial_count);
    let rules = rule_chain(rng, config.rules, config.trial_count, config.switch_probability);

    Ok(build_trials(words, &rules))
}

/// Draw `count` words by shuffling the whole vocabulary, taking passes in order.
///
/// A pass never repeats a word; a fresh pass never opens with the word that
/// closed the previous one.
pub fn draw_words<R: Rng + ?Sized>(rng: &mut R, vocabulary: &[String], count: usize) -> Vec<String> {
    let mut drawn: Vec<String> = Vec::with_capacity(count);

    while drawn.len() < count && !vocabulary.is_empty() {
        let mut pass = vocabulary.to_vec();
        pass.shuffle(rng);

        if pass.len() > 1 && drawn.last() == pass.first() {
            let swap_with = rng.gen_range(1..pass.len());
            pass.swap(0, swap_with);
        }

        let needed = count - drawn.len();
        drawn.extend(pass.into_iter().take(needed));
    }

    drawn
}

/// First rule uniform over the pair, then flip with probability `switch_probability`
pub fn rule_chain<R: Rng + ?Sized>(
    rng: &mut R,
    rules: (Rule, Rule),
    count: usize,
    switch_probability: f64,
) -> Vec<Rule> {
    let mut chain = Vec::with_capacity(count);
    if count == 0 {
        return chain;
    }

    let mut current = if rng.gen_bool(0.5) { rules.0 } else { rules.1 };
    chain.push(current);

    for _ in 1..count {
        if rng.gen_bool(switch_probability) {
            current = if current == rules.0 { rules.1 } else { rules.0 };
        }
        chain.push(current);
    }

    chain
}
