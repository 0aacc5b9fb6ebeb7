pub mod results;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Phase},
    session::{Feedback, Session},
};

const CARD_WIDTH: u16 = 64;
const VERTICAL_MARGIN: u16 = 1;

pub(crate) const ACCENT: Color = Color::Rgb(57, 255, 106);

pub(crate) fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn accent_bold() -> Style {
    bold().fg(ACCENT)
}

pub(crate) fn label_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn dim() -> Style {
    Style::default().fg(Color::Gray)
}

fn legend_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Centered rectangle of at most `width` x `height` inside `area`
pub(crate) fn card_area(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

/// Bordered card with a body and an italic key legend on the last line
pub(crate) fn render_card(area: Rect, buf: &mut Buffer, body: Text, legend: &str) {
    // borders, margins, legend and one spare row take 6 rows; wrapped lines need the rest
    let text_width = (CARD_WIDTH - 6) as usize;
    let rows: usize = body
        .lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(text_width))
        .sum();
    let card = card_area(area, CARD_WIDTH, (rows as u16).saturating_add(6));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(card);
    block.render(card, buf);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(legend.to_string(), legend_style()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}

/// Spread the letters of a stimulus word when there is room for it
pub(crate) fn display_word(word: &str, max_width: u16) -> String {
    let spaced = word.chars().join(" ");
    if spaced.width() <= max_width as usize {
        spaced
    } else {
        word.to_string()
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.phase {
            Phase::Welcome => render_welcome(area, buf),
            Phase::WhatItMeasures => render_what(area, buf),
            Phase::HowItWorks => render_how(area, buf),
            Phase::PracticeIntro => render_practice_intro(area, buf),
            Phase::Testing(_) => {
                if let Some(session) = self.session() {
                    render_trial(session, self.config.show_switch_cue, area, buf);
                }
            }
            Phase::PracticeComplete => render_practice_complete(
                self.config.trial_count,
                self.config.skip_practice,
                area,
                buf,
            ),
            Phase::Results => results::render_results(self.summary(), area, buf),
        }
    }
}

fn render_welcome(area: Rect, buf: &mut Buffer) {
    let body = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled("◀  ○  ▶", accent_bold())).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("Category Switch", bold())).alignment(Alignment::Center),
        Line::from(""),
        Line::from("Test your cognitive flexibility").alignment(Alignment::Center),
        Line::from(Span::styled("~3 minutes", dim())).alignment(Alignment::Center),
    ]);
    render_card(area, buf, body, "(enter) next / (esc)ape");
}

fn render_what(area: Rect, buf: &mut Buffer) {
    let blurb = |title: &'static str, text: &'static str| {
        vec![
            Line::from(Span::styled(title, accent_bold())),
            Line::from(Span::styled(text, dim())),
            Line::from(""),
        ]
    };

    let mut lines = vec![
        Line::from(Span::styled("WHAT THIS MEASURES", label_style())),
        Line::from(Span::styled(
            "Cognitive flexibility, executive function, and processing speed",
            bold(),
        )),
        Line::from(""),
        Line::from("How well you adapt when priorities shift unexpectedly."),
        Line::from(""),
    ];
    lines.extend(blurb(
        "Managing interruptions",
        "Switching between tasks, juggling conversations, adjusting plans.",
    ));
    lines.extend(blurb(
        "Learning & problem-solving",
        "Trying new approaches when the first one doesn't work.",
    ));
    lines.extend(blurb(
        "Mental health",
        "Flexibility is linked to resilience when facing life changes.",
    ));

    render_card(area, buf, Text::from(lines), "(enter) next / (esc)ape");
}

fn render_how(area: Rect, buf: &mut Buffer) {
    let example = |question: &'static str, word: &'static str, answer: &'static str| {
        vec![
            Line::from(Span::styled(question, accent_bold())).alignment(Alignment::Center),
            Line::from(Span::styled(word, bold())).alignment(Alignment::Center),
            Line::from(Span::styled(answer, dim())).alignment(Alignment::Center),
            Line::from(""),
        ]
    };

    let mut lines = vec![
        Line::from(Span::styled("HOW IT WORKS", label_style())),
        Line::from(Span::styled("Answer based on the rule", bold())),
        Line::from(""),
        Line::from("You will see a word and a rule. Press YES or NO depending on whether the word matches the rule."),
        Line::from(""),
    ];
    lines.extend(example("Is it LIVING?", "CAT", "Answer: YES"));
    lines.extend(example("More than 5 letters?", "DESK", "Answer: NO"));
    lines.push(
        Line::from(Span::styled(
            "The rule changes during the test",
            bold().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center),
    );
    lines.push(
        Line::from("Answer as quickly and accurately as possible.").alignment(Alignment::Center),
    );

    render_card(area, buf, Text::from(lines), "(enter) next / (esc)ape");
}

fn render_practice_intro(area: Rect, buf: &mut Buffer) {
    let body = Text::from(vec![
        Line::from(Span::styled("BEFORE WE BEGIN", label_style())),
        Line::from(Span::styled("Try 3 practice rounds", bold())),
        Line::from(""),
        Line::from("Get familiar with the format. The rule will change once during practice."),
    ]);
    render_card(area, buf, body, "(enter) start practice / (esc)ape");
}

fn render_practice_complete(
    trial_count: usize,
    skipped_practice: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let (label, heading) = if skipped_practice {
        ("NO PRACTICE", "Ready for the test?")
    } else {
        ("PRACTICE COMPLETE", "Ready for the real test?")
    };
    let body = Text::from(vec![
        Line::from(Span::styled(label, label_style())),
        Line::from(Span::styled(heading, bold())),
        Line::from(""),
        Line::from(format!(
            "The test has {trial_count} trials. Remember: speed and accuracy both matter."
        )),
    ]);
    render_card(area, buf, body, "(enter) start test / (esc)ape");
}

fn render_trial(session: &Session, show_switch_cue: bool, area: Rect, buf: &mut Buffer) {
    let Some(trial) = session.current_trial() else {
        return;
    };

    let card = card_area(area, CARD_WIDTH, 16);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(card);
    block.render(card, buf);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // progress
            Constraint::Length(1),
            Constraint::Length(1), // switch cue
            Constraint::Length(1), // label
            Constraint::Length(1), // question
            Constraint::Length(1),
            Constraint::Length(3), // word
            Constraint::Length(1),
            Constraint::Length(1), // feedback or legend
        ])
        .split(inner);

    let total = session.trials().len();
    let position = (trial.index + 1).min(total);
    Gauge::default()
        .gauge_style(Style::default().fg(ACCENT).bg(Color::Black))
        .ratio(position as f64 / total.max(1) as f64)
        .label(format!("{position}/{total}"))
        .render(chunks[0], buf);

    if show_switch_cue && trial.is_switch {
        Paragraph::new(Span::styled("RULE CHANGE!", bold().fg(Color::Yellow)))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    Paragraph::new(Span::styled("CURRENT RULE", label_style()))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(trial.rule.question(), accent_bold()))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    let word = display_word(&trial.word, chunks[6].width);
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(word, bold().fg(Color::White))),
    ])
    .alignment(Alignment::Center)
    .render(chunks[6], buf);

    let footer = match session.feedback() {
        Some(Feedback::Correct) => Span::styled("✓ Correct!", accent_bold()),
        Some(Feedback::Incorrect) => Span::styled("✗ Incorrect", bold().fg(Color::Red)),
        None => Span::styled("(y)es ◀   ▶ (n)o", legend_style()),
    };
    Paragraph::new(footer)
        .alignment(Alignment::Center)
        .render(chunks[8], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, registry::Registry, scoring::Answer};
    use rand::{rngs::StdRng, SeedableRng};
    use ratatui::{backend::TestBackend, Terminal};
    use std::{sync::Arc, time::Instant};

    fn app() -> App {
        App::new(
            Config::default(),
            Arc::new(Registry::builtin().unwrap()),
            StdRng::seed_from_u64(1),
        )
    }

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_card_area_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(card_area(area, 60, 10), Rect::new(20, 15, 60, 10));

        let small = Rect::new(0, 0, 30, 5);
        assert_eq!(card_area(small, 60, 10), small);
    }

    #[test]
    fn test_display_word_spreads_letters_when_room() {
        assert_eq!(display_word("CAT", 20), "C A T");
        assert_eq!(display_word("KEYBOARD", 10), "KEYBOARD");
    }

    #[test]
    fn test_welcome_screen_renders() {
        let content = render_to_string(&app());
        assert!(content.contains("Category Switch"));
        assert!(content.contains("(enter) next"));
    }

    #[test]
    fn test_every_info_phase_renders() {
        let mut app = app();
        for phase in [
            Phase::WhatItMeasures,
            Phase::HowItWorks,
            Phase::PracticeIntro,
            Phase::PracticeComplete,
        ] {
            app.phase = phase;
            let content = render_to_string(&app);
            assert!(content.contains("(esc)ape"), "{phase:?} missing legend");
        }
    }

    #[test]
    fn test_ready_screen_without_practice() {
        let mut app = app();
        app.phase = Phase::PracticeComplete;
        assert!(render_to_string(&app).contains("PRACTICE COMPLETE"));

        app.config.skip_practice = true;
        let content = render_to_string(&app);
        assert!(content.contains("Ready for the test?"));
        assert!(!content.contains("PRACTICE COMPLETE"));
    }

    #[test]
    fn test_trial_screen_shows_rule_word_and_progress() {
        let mut app = app();
        app.start_practice(Instant::now());

        let content = render_to_string(&app);
        assert!(content.contains("Is it LIVING?"));
        assert!(content.contains("C A T"));
        assert!(content.contains("1/3"));
        assert!(!content.contains("RULE CHANGE!"));
    }

    #[test]
    fn test_trial_screen_shows_feedback_after_answer() {
        let mut app = app();
        let now = Instant::now();
        app.start_practice(now);
        app.answer(Answer::No, now).unwrap();

        let content = render_to_string(&app);
        assert!(content.contains("Incorrect"));
    }

    #[test]
    fn test_switch_cue_on_switch_trial() {
        let mut app = app();
        let mut now = Instant::now();
        app.start_practice(now);
        for _ in 0..2 {
            app.answer(Answer::Yes, now).unwrap();
            now += app.config.feedback_delay();
            app.on_tick(now).unwrap();
        }

        let content = render_to_string(&app);
        assert!(content.contains("RULE CHANGE!"));
        assert!(content.contains("More than 5 letters?"));

        app.config.show_switch_cue = false;
        assert!(!render_to_string(&app).contains("RULE CHANGE!"));
    }
}
