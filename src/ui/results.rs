use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Color,
    text::{Line, Span, Text},
};

use crate::summary::{Summary, SummaryReport};
use crate::ui::{accent_bold, bold, dim, label_style, render_card};

/// Signed value with unit, e.g. `+25ms`, `-10ms`, `0ms`
pub fn format_signed(value: i64, unit: &str) -> String {
    if value > 0 {
        format!("+{value}{unit}")
    } else {
        format!("{value}{unit}")
    }
}

pub fn switch_cost_sentence(cost_ms: i64) -> String {
    match cost_ms {
        0 => "Your speed did not change when the rule changed.".to_string(),
        c if c > 0 => format!("You were {c}ms slower when the rule changed."),
        c => format!("You were {}ms faster when the rule changed.", c.unsigned_abs()),
    }
}

fn results_text(report: &SummaryReport) -> Text<'static> {
    let partition = |name: &'static str, rt: i64, acc: i64| {
        Line::from(vec![
            Span::styled(format!("{name:<14}"), dim()),
            Span::styled(format!("{rt:>6}ms"), accent_bold()),
            Span::styled(format!("   {acc}% accurate"), dim()),
        ])
    };

    Text::from(vec![
        Line::from(Span::styled("YOUR RESULTS", label_style())),
        Line::from(Span::styled("Category Switch Performance", bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}%", report.overall_accuracy),
            accent_bold(),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled("Overall Accuracy", dim())).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("SWITCH COST ANALYSIS", label_style())),
        partition("Switch trials", report.switch_rt_ms, report.switch_accuracy),
        partition("Stay trials", report.stay_rt_ms, report.stay_accuracy),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Switch Cost: {}",
                format_signed(report.switch_cost_rt_ms, "ms")
            ),
            bold().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            switch_cost_sentence(report.switch_cost_rt_ms),
            dim(),
        )),
        Line::from(Span::styled(
            format!(
                "Accuracy cost: {} points",
                format_signed(report.switch_cost_accuracy, "")
            ),
            dim(),
        )),
        Line::from(""),
        Line::from(Span::styled("TRIAL BREAKDOWN", label_style())),
        Line::from(format!("Total trials: {}", report.total_trials)),
        Line::from(format!("Switch trials: {}", report.switch_trials)),
        Line::from(format!("Stay trials: {}", report.stay_trials)),
    ])
}

/// Results screen; a missing summary shows as all zeros
pub fn render_results(summary: Option<&Summary>, area: Rect, buf: &mut Buffer) {
    let report = summary.map(Summary::report).unwrap_or_default();
    render_card(
        area,
        buf,
        results_text(&report),
        "(enter) new test / (q)uit",
    );
}
