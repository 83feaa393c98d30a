use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy)]
pub(super) enum ValueStyle {
    Normal,
    Important,
    Dim,
}

pub(super) struct Theme {
    border: Color,
    title: Color,
    text: Color,
    dim: Color,
    accent: Color,
    highlight_fg: Color,
    highlight_bg: Color,
    warn: Color,
    ok: Color,
    error: Color,
}

impl Theme {
    pub(super) fn dark() -> Self {
        Self {
            border: Color::DarkGray,
            title: Color::Blue,
            text: Color::White,
            dim: Color::Gray,
            accent: Color::Cyan,
            highlight_fg: Color::White,
            highlight_bg: Color::DarkGray,
            warn: Color::Yellow,
            ok: Color::Green,
            error: Color::Red,
        }
    }

    pub(super) fn block<'a>(&self, title: &'a str) -> ratatui::widgets::Block<'a> {
        ratatui::widgets::Block::default()
            .title(ratatui::text::Span::styled(
                title,
                Style::default()
                    .fg(self.title)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(ratatui::widgets::Borders::ALL)
            .border_style(Style::default().fg(self.border))
    }

    pub(super) fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub(super) fn help_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub(super) fn accent_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub(super) fn warn_style(&self) -> Style {
        Style::default().fg(self.warn).add_modifier(Modifier::BOLD)
    }

    pub(super) fn key_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub(super) fn value_style(&self, level: ValueStyle) -> Style {
        match level {
            ValueStyle::Normal => Style::default().fg(self.text),
            ValueStyle::Important => Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD),
            ValueStyle::Dim => Style::default().fg(self.dim),
        }
    }

    /// Status colour for a submission outcome label.
    pub(super) fn outcome_style(&self, label: &str) -> Style {
        match label {
            "APPROVED" => Style::default().fg(self.ok).add_modifier(Modifier::BOLD),
            "NEEDS REVIEW" => Style::default().fg(self.warn).add_modifier(Modifier::BOLD),
            "DENIED" | "FAILED" => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(self.text),
        }
    }
}
