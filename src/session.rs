use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::scoring::{score, Answer, TrialResult};
use crate::sequencer::{self, SequenceConfig, Trial};
use crate::summary::{aggregate, Summary};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionKind {
    Practice,
    Main,
}

/// Verdict shown between answering and the next trial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

/// One block of trials being worked through.
///
/// Answers are taken one at a time. After each answer the session waits for
/// `feedback_delay` before presenting the next trial; `poll` performs that
/// advance once it is due. Dropping the session drops any pending advance.
#[derive(Debug)]
pub struct Session {
    pub kind: SessionKind,
    registry: Arc<Registry>,
    trials: Vec<Trial>,
    results: Vec<TrialResult>,
    current: usize,
    presented_at: Instant,
    pending_advance: Option<Instant>,
    feedback_delay: Duration,
}

impl Session {
    pub fn new(
        kind: SessionKind,
        registry: Arc<Registry>,
        trials: Vec<Trial>,
        feedback_delay: Duration,
        now: Instant,
    ) -> Self {
        info!(
            kind = %kind,
            trials = trials.len(),
            switches = trials.iter().filter(|t| t.is_switch).count(),
            "session started"
        );

        Self {
            kind,
            registry,
            results: Vec::with_capacity(trials.len()),
            trials,
            current: 0,
            presented_at: now,
            pending_advance: None,
            feedback_delay,
        }
    }

    pub fn practice(registry: Arc<Registry>, feedback_delay: Duration, now: Instant) -> Self {
        Self::new(
            SessionKind::Practice,
            registry,
            sequencer::practice_sequence(),
            feedback_delay,
            now,
        )
    }

    pub fn main<R: Rng + ?Sized>(
        rng: &mut R,
        registry: Arc<Registry>,
        config: &SequenceConfig,
        feedback_delay: Duration,
        now: Instant,
    ) -> Result<Self> {
        let trials = sequencer::main_sequence(rng, &registry, config)?;
        Ok(Self::new(
            SessionKind::Main,
            registry,
            trials,
            feedback_delay,
            now,
        ))
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn results(&self) -> &[TrialResult] {
        &self.results
    }

    /// Index of the trial on screen; equals the trial count once finished
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_trial(&self) -> Option<&Trial> {
        self.trials.get(self.current)
    }

    pub fn is_advance_pending(&self) -> bool {
        self.pending_advance.is_some()
    }

    /// The trial pointer has moved past the last trial
    pub fn is_finished(&self) -> bool {
        self.current >= self.trials.len()
    }

    /// Correctness of the answer just given, while its feedback is on screen
    pub fn feedback(&self) -> Option<Feedback> {
        self.pending_advance?;
        self.results.last().map(|r| {
            if r.correct {
                Feedback::Correct
            } else {
                Feedback::Incorrect
            }
        })
    }

    pub fn submit_response(&mut self, answer: Answer) -> Result<TrialResult> {
        self.submit_response_at(answer, Instant::now())
    }

    /// Score the current trial with the time elapsed since it was presented
    pub fn submit_response_at(&mut self, answer: Answer, now: Instant) -> Result<TrialResult> {
        if self.pending_advance.is_some() {
            return Err(Error::AdvancePending);
        }
        let trial = self.current_trial().ok_or(Error::SessionFinished)?;

        let rt_ms = now.saturating_duration_since(self.presented_at).as_millis() as u64;
        let result = score(&self.registry, trial, answer, rt_ms)?;

        debug!(
            kind = %self.kind,
            trial = result.trial_index,
            word = %result.word,
            rule = %result.rule,
            answer = %answer,
            correct = result.correct,
            rt_ms,
            is_switch = result.is_switch,
            "response recorded"
        );

        self.results.push(result.clone());
        self.pending_advance = Some(now + self.feedback_delay);

        Ok(result)
    }

    /// Perform the pending advance if it is due. Returns true when it happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending_advance {
            Some(due) if now >= due => {
                self.pending_advance = None;
                self.current += 1;
                self.presented_at = now;
                true
            }
            _ => false,
        }
    }

    /// Statistics over the recorded results, available once the last advance has happened
    pub fn compute_summary(&self) -> Result<Summary> {
        if !self.is_finished() {
            return Err(Error::SessionInProgress {
                remaining: self.trials.len() - self.current,
            });
        }
        Ok(aggregate(&self.results))
    }
}
