use protocol::{PaRequest, Patient, Priority, SessionClock};
use ratatui::widgets::ListState;

use crate::submit::{SubmissionRecord, SubmitCommand, UiEvent};

pub(crate) const HISTORY_LIMIT: usize = 50;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ViewMode {
    #[default]
    Normal,
    ResultFullscreen,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Focus {
    #[default]
    Patients,
    Notes,
    Endpoint,
    History,
}

pub(crate) struct AppState {
    pub(crate) roster: Vec<Patient>,
    pub(crate) patient_selected: usize,
    pub(crate) patient_list_state: ListState,
    pub(crate) priority: Priority,
    pub(crate) notes: String,
    pub(crate) endpoint: String,
    pub(crate) focus: Focus,
    pub(crate) history: Vec<SubmissionRecord>,
    pub(crate) history_selected: usize,
    pub(crate) history_list_state: ListState,
    pub(crate) last_result: Option<SubmissionRecord>,
    /// Request ids that have been handed to the worker and not finished yet.
    pub(crate) in_flight: Vec<String>,
    pub(crate) view_mode: ViewMode,
    pub(crate) result_scroll: usize,
    pub(crate) result_max_scroll: usize,
    pub(crate) result_total_lines: usize,
    pub(crate) result_view_height: u16,
    pub(crate) pending_g: bool,
    pub(crate) confirm_quit: bool,
    spinner_frame: usize,
    clock: SessionClock,
}

impl AppState {
    pub(crate) fn new(roster: Vec<Patient>, endpoint: String) -> Self {
        let mut patient_list_state = ListState::default();
        if !roster.is_empty() {
            patient_list_state.select(Some(0));
        }
        Self {
            roster,
            patient_selected: 0,
            patient_list_state,
            priority: Priority::default(),
            notes: String::new(),
            endpoint,
            focus: Focus::default(),
            history: Vec::new(),
            history_selected: 0,
            history_list_state: ListState::default(),
            last_result: None,
            in_flight: Vec::new(),
            view_mode: ViewMode::default(),
            result_scroll: 0,
            result_max_scroll: 0,
            result_total_lines: 0,
            result_view_height: 0,
            pending_g: false,
            confirm_quit: false,
            spinner_frame: 0,
            clock: SessionClock::new(),
        }
    }

    pub(crate) fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::SubmissionStarted { request_id } => {
                self.in_flight.push(request_id);
            }
            UiEvent::SubmissionFinished(record) => {
                let finished_id = record.request_id();
                self.in_flight.retain(|id| id != &finished_id);
                self.last_result = Some(record.clone());
                self.history.insert(0, record);
                if self.history.len() > HISTORY_LIMIT {
                    self.history.truncate(HISTORY_LIMIT);
                }
                if self.focus == Focus::History {
                    self.history_selected = 0;
                } else if !self.history.is_empty() {
                    self.history_selected = self.history_selected.min(self.history.len() - 1);
                }
                self.sync_history_selection();
                self.result_scroll = 0;
                self.pending_g = false;
            }
        }
    }

    pub(crate) fn tick(&mut self) {
        if !self.in_flight.is_empty() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub(crate) fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub(crate) fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Patients => Focus::Notes,
            Focus::Notes => Focus::Endpoint,
            Focus::Endpoint => Focus::History,
            Focus::History => Focus::Patients,
        };
        self.sync_selection();
    }

    pub(crate) fn editing(&self) -> bool {
        matches!(self.focus, Focus::Notes | Focus::Endpoint)
    }

    pub(crate) fn edit_push(&mut self, ch: char) {
        match self.focus {
            Focus::Notes => self.notes.push(ch),
            Focus::Endpoint => self.endpoint.push(ch),
            _ => {}
        }
    }

    pub(crate) fn edit_pop(&mut self) {
        match self.focus {
            Focus::Notes => {
                self.notes.pop();
            }
            Focus::Endpoint => {
                self.endpoint.pop();
            }
            _ => {}
        }
    }

    pub(crate) fn cycle_priority(&mut self) {
        self.priority = self.priority.cycle();
    }

    pub(crate) fn select_next(&mut self) {
        match self.focus {
            Focus::Patients => {
                if self.roster.is_empty() {
                    return;
                }
                self.patient_selected = (self.patient_selected + 1) % self.roster.len();
                self.sync_patient_selection();
            }
            Focus::History => {
                if self.history.is_empty() {
                    return;
                }
                self.history_selected = (self.history_selected + 1) % self.history.len();
                self.sync_history_selection();
            }
            _ => {}
        }
    }

    pub(crate) fn select_prev(&mut self) {
        match self.focus {
            Focus::Patients => {
                if self.roster.is_empty() {
                    return;
                }
                if self.patient_selected == 0 {
                    self.patient_selected = self.roster.len() - 1;
                } else {
                    self.patient_selected -= 1;
                }
                self.sync_patient_selection();
            }
            Focus::History => {
                if self.history.is_empty() {
                    return;
                }
                if self.history_selected == 0 {
                    self.history_selected = self.history.len() - 1;
                } else {
                    self.history_selected -= 1;
                }
                self.sync_history_selection();
            }
            _ => {}
        }
    }

    pub(crate) fn selected_patient(&self) -> Option<&Patient> {
        self.roster.get(self.patient_selected)
    }

    /// Builds the outbound request from the current form state.
    pub(crate) fn begin_submission(&mut self) -> Option<SubmitCommand> {
        let patient = self.roster.get(self.patient_selected)?;
        let request = PaRequest::new(
            patient.id.clone(),
            self.priority,
            self.notes.clone(),
            self.clock.next(),
        );
        Some(SubmitCommand {
            endpoint: self.endpoint.trim().to_string(),
            request,
        })
    }

    pub(crate) fn selected_history(&self) -> Option<&SubmissionRecord> {
        if self.focus != Focus::History {
            return None;
        }
        self.history.get(self.history_selected)
    }

    /// Record shown in the result panel and the fullscreen view.
    pub(crate) fn displayed_result(&self) -> Option<&SubmissionRecord> {
        self.selected_history().or(self.last_result.as_ref())
    }

    pub(crate) fn enter_result_fullscreen(&mut self) {
        self.view_mode = ViewMode::ResultFullscreen;
        self.result_scroll = 0;
        self.pending_g = false;
        self.confirm_quit = false;
    }

    pub(crate) fn exit_result_fullscreen(&mut self) {
        self.view_mode = ViewMode::Normal;
        self.pending_g = false;
    }

    pub(crate) fn set_result_metrics(&mut self, total_lines: usize, view_height: u16) {
        let total_lines = total_lines.max(1);
        self.result_total_lines = total_lines;
        self.result_view_height = view_height;
        self.result_max_scroll = total_lines.saturating_sub(view_height as usize);
        if self.result_scroll > self.result_max_scroll {
            self.result_scroll = self.result_max_scroll;
        }
    }

    pub(crate) fn scroll_down(&mut self, lines: usize) {
        self.result_scroll = (self.result_scroll + lines).min(self.result_max_scroll);
        self.pending_g = false;
    }

    pub(crate) fn scroll_up(&mut self, lines: usize) {
        self.result_scroll = self.result_scroll.saturating_sub(lines);
        self.pending_g = false;
    }

    pub(crate) fn scroll_to_top(&mut self) {
        self.result_scroll = 0;
        self.pending_g = false;
    }

    pub(crate) fn scroll_to_bottom(&mut self) {
        self.result_scroll = self.result_max_scroll;
        self.pending_g = false;
    }

    pub(crate) fn page_size(&self) -> usize {
        let height = self.result_view_height.max(1) as usize;
        height.saturating_sub(1).max(1)
    }

    pub(crate) fn half_page_size(&self) -> usize {
        let height = self.result_view_height.max(1) as usize;
        (height / 2).max(1)
    }

    fn sync_selection(&mut self) {
        self.sync_patient_selection();
        self.sync_history_selection();
    }

    fn sync_patient_selection(&mut self) {
        if self.roster.is_empty() {
            self.patient_list_state.select(None);
        } else {
            self.patient_list_state.select(Some(self.patient_selected));
        }
    }

    fn sync_history_selection(&mut self) {
        if self.history.is_empty() {
            self.history_list_state.select(None);
        } else {
            self.history_list_state.select(Some(self.history_selected));
        }
    }
}
