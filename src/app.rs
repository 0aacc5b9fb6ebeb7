use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::registry::Registry;
use crate::scoring::{Answer, TrialResult};
use crate::session::{Session, SessionKind};
use crate::summary::Summary;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Screen the participant is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Welcome,
    WhatItMeasures,
    HowItWorks,
    PracticeIntro,
    Testing(SessionKind),
    PracticeComplete,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Owns the single active session and walks the participant through the phases
#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub phase: Phase,
    registry: Arc<Registry>,
    rng: StdRng,
    session: Option<Session>,
    summary: Option<Summary>,
    export_path: Option<PathBuf>,
    main_started_at: Option<DateTime<Local>>,
}

impl App {
    pub fn new(config: Config, registry: Arc<Registry>, rng: StdRng) -> Self {
        Self {
            config,
            phase: Phase::Welcome,
            registry,
            rng,
            session: None,
            summary: None,
            export_path: None,
            main_started_at: None,
        }
    }

    pub fn with_export(mut self, path: Option<PathBuf>) -> Self {
        self.export_path = path;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Statistics of the finished main block, present only on the results screen
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Leave the current non-testing screen the way its "next" button would
    pub fn next_screen(&mut self, now: Instant) -> Result<()> {
        match self.phase {
            Phase::Welcome => self.phase = Phase::WhatItMeasures,
            Phase::WhatItMeasures => self.phase = Phase::HowItWorks,
            Phase::HowItWorks if self.config.skip_practice => self.phase = Phase::PracticeComplete,
            Phase::HowItWorks => self.phase = Phase::PracticeIntro,
            Phase::PracticeIntro => self.start_practice(now),
            Phase::PracticeComplete => self.start_main(now)?,
            Phase::Results => self.reset(),
            Phase::Testing(_) => {}
        }
        Ok(())
    }

    pub fn start_practice(&mut self, now: Instant) {
        self.session = Some(Session::practice(
            Arc::clone(&self.registry),
            self.config.feedback_delay(),
            now,
        ));
        self.summary = None;
        self.phase = Phase::Testing(SessionKind::Practice);
    }

    pub fn start_main(&mut self, now: Instant) -> Result<()> {
        let session = Session::main(
            &mut self.rng,
            Arc::clone(&self.registry),
            &self.config.sequence_config(),
            self.config.feedback_delay(),
            now,
        )?;
        self.session = Some(session);
        self.summary = None;
        self.main_started_at = Some(Local::now());
        self.phase = Phase::Testing(SessionKind::Main);
        Ok(())
    }

    /// Record an answer for the trial on screen.
    ///
    /// Answers outside a testing phase or during the feedback delay are ignored.
    pub fn answer(&mut self, answer: Answer, now: Instant) -> Result<Option<TrialResult>> {
        if !matches!(self.phase, Phase::Testing(_)) {
            return Ok(None);
        }
        match self.session.as_mut() {
            Some(session) if !session.is_advance_pending() && !session.is_finished() => {
                session.submit_response_at(answer, now).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Expire a due feedback delay. Returns true when the screen changed.
    pub fn on_tick(&mut self, now: Instant) -> Result<bool> {
        let Some(session) = self.session.as_mut() else {
            return Ok(false);
        };
        if !session.poll(now) {
            return Ok(false);
        }
        if session.is_finished() {
            self.finish_block()?;
        }
        Ok(true)
    }

    fn finish_block(&mut self) -> Result<()> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };

        match session.kind {
            SessionKind::Practice => {
                info!(
                    correct = session.results().iter().filter(|r| r.correct).count(),
                    "practice complete"
                );
                self.session = None;
                self.phase = Phase::PracticeComplete;
            }
            SessionKind::Main => {
                let summary = session.compute_summary()?;
                let report = summary.report();
                info!(
                    overall_accuracy = report.overall_accuracy,
                    switch_rt_ms = report.switch_rt_ms,
                    stay_rt_ms = report.stay_rt_ms,
                    switch_cost_rt_ms = report.switch_cost_rt_ms,
                    switch_cost_accuracy = report.switch_cost_accuracy,
                    "test complete"
                );

                if let Some(path) = &self.export_path {
                    let started_at = self.main_started_at.unwrap_or_else(Local::now);
                    match export::write_results(path, started_at, session.results()) {
                        Ok(()) => info!(path = %path.display(), "results exported"),
                        Err(e) => warn!(path = %path.display(), error = %e, "export failed"),
                    }
                }

                self.summary = Some(summary);
                self.phase = Phase::Results;
            }
        }
        Ok(())
    }

    /// Back to the welcome screen with no trace of the previous run
    pub fn reset(&mut self) {
        self.session = None;
        self.summary = None;
        self.main_started_at = None;
        self.phase = Phase::Welcome;
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Result<Control> {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Ok(Control::Quit);
        }

        match self.phase {
            Phase::Testing(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Left => {
                    self.answer(Answer::Yes, now)?;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Right => {
                    self.answer(Answer::No, now)?;
                }
                _ => {}
            },
            Phase::Results if key.code == KeyCode::Char('q') => return Ok(Control::Quit),
            _ => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.next_screen(now)?,
                _ => {}
            },
        }
        Ok(Control::Continue)
    }
}
