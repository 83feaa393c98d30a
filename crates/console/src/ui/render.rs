use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Clear, List, ListItem, Paragraph, Wrap};

use super::app::{AppState, Focus, ViewMode};
use super::format::{format_request_panel, format_result_details, format_result_raw, history_time};
use super::text::{display_width, pad_right, truncate_with_ellipsis, wrap_text_lines};
use super::theme::{Theme, ValueStyle};

pub(crate) fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    if app.view_mode == ViewMode::ResultFullscreen {
        draw_result_fullscreen(frame, app);
        return;
    }

    let theme = Theme::dark();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[1]);

    let status_span = if let Some(request_id) = app.in_flight.last() {
        let message = if app.in_flight.len() > 1 {
            format!("{} submitting {} requests", app.spinner(), app.in_flight.len())
        } else {
            format!("{} submitting {}", app.spinner(), request_id)
        };
        Span::styled(message, theme.accent_style())
    } else if let Some(record) = &app.last_result {
        Span::styled(
            format!("last: {} {}", record.status_label(), record.request_id()),
            theme.value_style(ValueStyle::Dim),
        )
    } else {
        Span::styled("idle".to_string(), theme.value_style(ValueStyle::Dim))
    };
    let header_line = Line::from(vec![
        Span::styled("Endpoint: ", theme.key_style()),
        Span::styled(app.endpoint.clone(), theme.value_style(ValueStyle::Important)),
        Span::styled("  ", theme.key_style()),
        status_span,
    ]);
    let header = Paragraph::new(header_line)
        .block(theme.block("Greenlight PA Console"))
        .style(theme.value_style(ValueStyle::Normal));
    frame.render_widget(header, chunks[0]);

    let patients_title = if app.focus == Focus::Patients {
        "Patients *"
    } else {
        "Patients"
    };
    let patient_items = app
        .roster
        .iter()
        .map(|patient| ListItem::new(Line::from(patient.label())))
        .collect::<Vec<_>>();
    let patient_list = List::new(patient_items)
        .block(theme.block(patients_title))
        .style(theme.value_style(ValueStyle::Normal))
        .highlight_style(if app.focus == Focus::Patients {
            theme.highlight_style()
        } else {
            theme.value_style(ValueStyle::Dim)
        })
        .highlight_symbol(if app.focus == Focus::Patients {
            ">> "
        } else {
            "   "
        });
    frame.render_stateful_widget(patient_list, left[0], &mut app.patient_list_state);

    let history_title = if app.focus == Focus::History {
        "History (last 50) *"
    } else {
        "History (last 50)"
    };
    let history_items = if app.history.is_empty() {
        vec![ListItem::new(Line::styled(
            "no submissions yet",
            theme.value_style(ValueStyle::Dim),
        ))]
    } else {
        let history_block = theme.block(history_title);
        let history_inner = history_block.inner(left[1]);
        let available_width = history_inner.width.saturating_sub(3) as usize;
        app.history
            .iter()
            .map(|record| {
                let time = history_time(record);
                let time_width = display_width(&time);
                let label = pad_right(record.status_label(), 13);
                let label_width = display_width(&label);
                if available_width <= label_width + time_width {
                    return ListItem::new(Line::styled(
                        truncate_with_ellipsis(record.status_label(), available_width),
                        theme.outcome_style(record.status_label()),
                    ));
                }
                let id_width = available_width - label_width - time_width;
                let id = truncate_with_ellipsis(&record.request_id(), id_width.saturating_sub(1));
                let line = Line::from(vec![
                    Span::styled(label, theme.outcome_style(record.status_label())),
                    Span::styled(
                        pad_right(&id, id_width),
                        theme.value_style(ValueStyle::Normal),
                    ),
                    Span::styled(time, theme.value_style(ValueStyle::Dim)),
                ]);
                ListItem::new(line)
            })
            .collect::<Vec<_>>()
    };
    let history_list = List::new(history_items)
        .block(theme.block(history_title))
        .style(theme.value_style(ValueStyle::Normal))
        .highlight_style(if app.focus == Focus::History {
            theme.highlight_style()
        } else {
            theme.value_style(ValueStyle::Dim)
        })
        .highlight_symbol(if app.focus == Focus::History {
            ">> "
        } else {
            "   "
        });
    frame.render_stateful_widget(history_list, left[1], &mut app.history_list_state);

    let request_title = match app.focus {
        Focus::Notes => "Request (editing notes) *",
        Focus::Endpoint => "Request (editing endpoint) *",
        _ => "Request",
    };
    let request_block = theme.block(request_title);
    let request_inner = request_block.inner(right[0]);
    let request_widget = Paragraph::new(format_request_panel(&theme, app, request_inner.width))
        .block(request_block)
        .style(theme.value_style(ValueStyle::Normal))
        .wrap(Wrap { trim: true });
    frame.render_widget(Clear, right[0]);
    frame.render_widget(request_widget, right[0]);

    let result_title = if app.focus == Focus::History {
        "Selected Result"
    } else {
        "Last Result"
    };
    let result_block = theme.block(result_title);
    let result_inner = result_block.inner(right[1]);
    let result_text = app
        .displayed_result()
        .map(|record| format_result_details(&theme, record, result_inner.width))
        .unwrap_or_else(|| Text::from("no submissions yet"));
    let result_widget = Paragraph::new(result_text)
        .block(result_block)
        .style(theme.value_style(ValueStyle::Normal))
        .wrap(Wrap { trim: true });
    frame.render_widget(Clear, right[1]);
    frame.render_widget(result_widget, right[1]);

    let help = if app.editing() {
        "type to edit  Enter=submit  Tab=focus  Esc=done  "
    } else {
        "Enter/S=submit  P=priority  Tab=focus  ↑/↓=select  R=raw  Q=quit  "
    };
    let mut footer_spans = vec![Span::styled(help, theme.help_style())];
    if app.confirm_quit {
        footer_spans.push(Span::styled(
            "press Q again to quit / Esc to cancel  ",
            theme.warn_style(),
        ));
    }
    let footer = Paragraph::new(Line::from(footer_spans)).block(theme.block("Controls"));
    frame.render_widget(footer, chunks[2]);
}

fn draw_result_fullscreen(frame: &mut ratatui::Frame, app: &mut AppState) {
    let theme = Theme::dark();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(frame.area());

    let raw = app
        .displayed_result()
        .map(format_result_raw)
        .unwrap_or_else(|| "no submissions yet".to_string());

    let result_block = theme.block("Response (fullscreen)");
    let inner = result_block.inner(chunks[0]);
    let wrapped = wrap_text_lines(&raw, inner.width.max(1) as usize);
    app.set_result_metrics(wrapped.len(), inner.height);
    let rendered = wrapped.join("\n");

    let result_panel = Paragraph::new(rendered)
        .block(result_block)
        .style(theme.value_style(ValueStyle::Normal))
        .scroll((app.result_scroll as u16, 0));
    frame.render_widget(result_panel, chunks[0]);

    let mut footer_spans = vec![Span::styled(
        "j/k=scroll  gg/G=top/bottom  Ctrl+f/b=page  R/Esc=back  Q=quit  ",
        theme.help_style(),
    )];
    if app.confirm_quit {
        footer_spans.push(Span::styled(
            "press Q again to quit / Esc to cancel  ",
            theme.warn_style(),
        ));
    }
    footer_spans.push(Span::styled(
        format!(
            "line {}/{}",
            app.result_scroll.saturating_add(1),
            app.result_total_lines
        ),
        theme.accent_style(),
    ));
    let footer = Paragraph::new(Line::from(footer_spans)).block(theme.block("Controls"));
    frame.render_widget(footer, chunks[1]);
}
