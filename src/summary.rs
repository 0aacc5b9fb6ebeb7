use crate::scoring::TrialResult;
use crate::util::{mean, percentage, round_half_up};
use serde::Serialize;

/// Accuracy and speed over one class of trials (switch or stay)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PartitionStats {
    pub trials: usize,
    pub correct: usize,
    /// percent correct, 0 for an empty partition
    pub accuracy: f64,
    /// mean response time of the correct trials only, 0 when there are none
    pub mean_rt_ms: f64,
}

impl PartitionStats {
    fn from_results<'a>(results: impl Iterator<Item = &'a TrialResult>) -> Self {
        let results: Vec<&TrialResult> = results.collect();
        let correct_rts: Vec<f64> = results
            .iter()
            .filter(|r| r.correct)
            .map(|r| r.response_time_ms as f64)
            .collect();

        Self {
            trials: results.len(),
            correct: correct_rts.len(),
            accuracy: percentage(correct_rts.len(), results.len()).unwrap_or(0.0),
            mean_rt_ms: mean(&correct_rts).unwrap_or(0.0),
        }
    }
}

/// Unrounded session statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub total_trials: usize,
    pub overall_accuracy: f64,
    pub switch: PartitionStats,
    pub stay: PartitionStats,
    /// switch minus stay mean RT; negative when switching was faster
    pub switch_cost_rt_ms: f64,
    /// stay minus switch accuracy in percentage points
    pub switch_cost_accuracy: f64,
}

/// Session statistics rounded half up for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SummaryReport {
    pub total_trials: usize,
    pub switch_trials: usize,
    pub stay_trials: usize,
    pub overall_accuracy: i64,
    pub switch_accuracy: i64,
    pub stay_accuracy: i64,
    pub switch_rt_ms: i64,
    pub stay_rt_ms: i64,
    pub switch_cost_rt_ms: i64,
    pub switch_cost_accuracy: i64,
}

/// Aggregate an ordered result list.
///
/// The first trial belongs to neither partition. An empty list yields all zeros.
pub fn aggregate(results: &[TrialResult]) -> Summary {
    let switch = PartitionStats::from_results(results.iter().filter(|r| r.is_switch));
    let stay = PartitionStats::from_results(
        results
            .iter()
            .filter(|r| !r.is_switch && r.trial_index > 0),
    );

    let all_correct = results.iter().filter(|r| r.correct).count();

    Summary {
        total_trials: results.len(),
        overall_accuracy: percentage(all_correct, results.len()).unwrap_or(0.0),
        switch,
        stay,
        switch_cost_rt_ms: switch.mean_rt_ms - stay.mean_rt_ms,
        switch_cost_accuracy: stay.accuracy - switch.accuracy,
    }
}

impl Summary {
    pub fn report(&self) -> SummaryReport {
        SummaryReport {
            total_trials: self.total_trials,
            switch_trials: self.switch.trials,
            stay_trials: self.stay.trials,
            overall_accuracy: round_half_up(self.overall_accuracy),
            switch_accuracy: round_half_up(self.switch.accuracy),
            stay_accuracy: round_half_up(self.stay.accuracy),
            switch_rt_ms: round_half_up(self.switch.mean_rt_ms),
            stay_rt_ms: round_half_up(self.stay.mean_rt_ms),
            switch_cost_rt_ms: round_half_up(self.switch_cost_rt_ms),
            switch_cost_accuracy: round_half_up(self.switch_cost_accuracy),
        }
    }
}
