use chrono::Local;
use protocol::PaRequest;
use ratatui::text::{Line, Span, Text};
use std::time::Duration;

use crate::submit::{SubmissionOutcome, SubmissionRecord};

use super::app::{AppState, Focus};
use super::text::{display_width, sanitize_text_for_tui, wrap_text_lines};
use super::theme::{Theme, ValueStyle};

pub(super) fn format_request_panel(theme: &Theme, app: &AppState, width: u16) -> Text<'static> {
    let mut lines = Vec::new();

    let patient = app
        .selected_patient()
        .map(|patient| patient.label())
        .unwrap_or_else(|| "(none)".to_string());
    lines.extend(kv_lines(
        theme,
        "patient",
        patient,
        ValueStyle::Important,
        width,
    ));
    lines.extend(kv_lines(
        theme,
        "priority",
        app.priority.to_string(),
        ValueStyle::Important,
        width,
    ));

    let notes = if app.focus == Focus::Notes {
        format!("{}_", app.notes)
    } else if app.notes.is_empty() {
        "(none)".to_string()
    } else {
        app.notes.clone()
    };
    lines.extend(kv_lines(theme, "notes", notes, ValueStyle::Normal, width));

    let endpoint = if app.focus == Focus::Endpoint {
        format!("{}_", app.endpoint)
    } else {
        app.endpoint.clone()
    };
    lines.extend(kv_lines(
        theme,
        "endpoint",
        endpoint,
        ValueStyle::Normal,
        width,
    ));

    lines.push(Line::from(""));
    lines.push(Line::styled("body preview", theme.key_style()));
    for preview_line in preview_body(app).lines() {
        lines.push(Line::styled(
            preview_line.to_string(),
            theme.value_style(ValueStyle::Dim),
        ));
    }

    Text::from(lines)
}

/// The exact wire body for the current form, stamped with the current time.
pub(super) fn preview_body(app: &AppState) -> String {
    let Some(patient) = app.selected_patient() else {
        return "{}".to_string();
    };
    let request = PaRequest::new(
        patient.id.clone(),
        app.priority,
        app.notes.clone(),
        Local::now(),
    );
    serde_json::to_string_pretty(&request).unwrap_or_default()
}

pub(super) fn format_result_details(
    theme: &Theme,
    record: &SubmissionRecord,
    width: u16,
) -> Text<'static> {
    let mut lines = Vec::new();
    lines.extend(kv_lines(
        theme,
        "id",
        record.request_id(),
        ValueStyle::Dim,
        width,
    ));
    lines.extend(kv_lines(
        theme,
        "patient",
        record.request.patient_id.clone(),
        ValueStyle::Normal,
        width,
    ));
    lines.extend(kv_lines(
        theme,
        "priority",
        record.request.priority.to_string(),
        ValueStyle::Normal,
        width,
    ));

    let label = record.status_label();
    lines.push(Line::from(vec![
        Span::styled("status: ".to_string(), theme.key_style()),
        Span::styled(label.to_string(), theme.outcome_style(label)),
    ]));

    match &record.outcome {
        SubmissionOutcome::Decided(decision) => {
            lines.extend(kv_lines(
                theme,
                "confidence",
                format!("{}%", decision.confidence),
                ValueStyle::Important,
                width,
            ));
            lines.extend(kv_lines(
                theme,
                "response",
                decision.raw_response.to_string(),
                ValueStyle::Dim,
                width,
            ));
        }
        SubmissionOutcome::Failed(err) => {
            lines.extend(kv_lines(
                theme,
                "error",
                err.to_string(),
                ValueStyle::Normal,
                width,
            ));
        }
    }

    lines.extend(kv_lines(
        theme,
        "submitted",
        record
            .request
            .submitted_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        ValueStyle::Dim,
        width,
    ));
    lines.extend(kv_lines(
        theme,
        "finished",
        record.finished_at.format("%H:%M:%S").to_string(),
        ValueStyle::Dim,
        width,
    ));
    lines.extend(kv_lines(
        theme,
        "elapsed",
        elapsed_label(record),
        ValueStyle::Dim,
        width,
    ));
    Text::from(lines)
}

/// Submit-to-finish time, truncated to whole milliseconds.
fn elapsed_label(record: &SubmissionRecord) -> String {
    let millis = (record.finished_at - record.request.submitted_at)
        .num_milliseconds()
        .max(0) as u64;
    humantime::format_duration(Duration::from_millis(millis)).to_string()
}

/// Full response text for the fullscreen view.
pub(super) fn format_result_raw(record: &SubmissionRecord) -> String {
    match &record.outcome {
        SubmissionOutcome::Decided(decision) => {
            serde_json::to_string_pretty(&decision.raw_response).unwrap_or_default()
        }
        SubmissionOutcome::Failed(err) => err.to_string(),
    }
}

pub(super) fn history_time(record: &SubmissionRecord) -> String {
    record.finished_at.format("%H:%M:%S").to_string()
}

fn kv_lines(
    theme: &Theme,
    key: &str,
    value: String,
    level: ValueStyle,
    width: u16,
) -> Vec<Line<'static>> {
    let value = sanitize_text_for_tui(&value);
    let key_label = format!("{key}: ");
    let key_width = display_width(&key_label);
    let width = width.max(1) as usize;
    let value_width = width.saturating_sub(key_width).max(1);
    let wrapped = wrap_text_lines(&value, value_width);
    let mut lines = Vec::with_capacity(wrapped.len().max(1));
    let indent = " ".repeat(key_width);
    for (idx, segment) in wrapped.into_iter().enumerate() {
        if idx == 0 {
            lines.push(Line::from(vec![
                Span::styled(key_label.clone(), theme.key_style()),
                Span::styled(segment, theme.value_style(level)),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled(indent.clone(), theme.key_style()),
                Span::styled(segment, theme.value_style(level)),
            ]));
        }
    }
    lines
}
