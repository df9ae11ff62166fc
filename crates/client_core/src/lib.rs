use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::{
    domain::{AnswerLabel, Answers, FormFields, Selection},
    QuestionBank,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod date_input;
pub mod error;
pub mod store;
pub mod submission;

pub use error::{SelectionError, SubmitError, ValidationError};
pub use store::{DryRunRecordStore, RecordStore, RestRecordStore, DTO_TABLE};

use submission::build_submission;

pub const SUBMIT_LABEL: &str = "Enviar Formulário";
pub const SUBMITTING_LABEL: &str = "Enviando...";
pub const SUCCESS_MESSAGE: &str = "Formulário enviado com sucesso!";

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormTimings {
    /// Wait for the on-screen keyboard to settle before scrolling the date field.
    pub date_focus_scroll_delay: Duration,
    pub mobile_breakpoint_px: u32,
    pub success_banner_ttl: Duration,
}

impl Default for FormTimings {
    fn default() -> Self {
        Self {
            date_focus_scroll_delay: Duration::from_millis(300),
            mobile_breakpoint_px: 768,
            success_banner_ttl: Duration::from_secs(5),
        }
    }
}

/// Presentation effects requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    ScrollDateIntoView,
    ScrollToTop,
    SubmittingChanged(bool),
    SubmitSucceeded,
    SuccessCleared,
    ErrorRaised(String),
    ErrorCleared,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Submitted,
    Rejected(SubmitError),
    /// Another submission was still in flight; nothing was done.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub fields: FormFields,
    pub masked_date: String,
    pub selection: Selection,
    pub answers: Answers,
    pub subarea_options: Vec<String>,
    pub questions: Vec<String>,
    pub error: Option<String>,
    pub show_success: bool,
    pub submitting: bool,
}

impl FormSnapshot {
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn subarea_enabled(&self) -> bool {
        !self.selection.area.is_empty()
    }
}

#[derive(Debug, Default)]
struct FormState {
    fields: FormFields,
    selection: Selection,
    answers: Answers,
    error: Option<String>,
    show_success: bool,
    success_generation: u64,
}

impl FormState {
    fn reset_inputs(&mut self) {
        self.fields = FormFields::default();
        self.selection = Selection::default();
        self.answers.clear();
    }
}

/// Holds the `submitting` flag for one submission and releases it on every exit path.
struct SubmittingGuard {
    flag: Arc<AtomicBool>,
    events: broadcast::Sender<FormEvent>,
}

impl SubmittingGuard {
    fn acquire(flag: &Arc<AtomicBool>, events: &broadcast::Sender<FormEvent>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        let _ = events.send(FormEvent::SubmittingChanged(true));
        Some(Self {
            flag: flag.clone(),
            events: events.clone(),
        })
    }
}

impl Drop for SubmittingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        let _ = self.events.send(FormEvent::SubmittingChanged(false));
    }
}

/// State and submit workflow of the DTO checklist form.
pub struct DtoFormController {
    bank: Arc<QuestionBank>,
    store: Arc<dyn RecordStore>,
    inner: Arc<Mutex<FormState>>,
    submitting: Arc<AtomicBool>,
    events: broadcast::Sender<FormEvent>,
    timings: FormTimings,
}

impl DtoFormController {
    pub fn new(bank: Arc<QuestionBank>, store: Arc<dyn RecordStore>) -> Self {
        Self::with_timings(bank, store, FormTimings::default())
    }

    pub fn with_timings(
        bank: Arc<QuestionBank>,
        store: Arc<dyn RecordStore>,
        timings: FormTimings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            bank,
            store,
            inner: Arc::new(Mutex::new(FormState::default())),
            submitting: Arc::new(AtomicBool::new(false)),
            events,
            timings,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Selects `area` (empty string unselects) and clears the subarea and answers.
    pub async fn set_area(&self, area: &str) -> Result<(), SelectionError> {
        if !area.is_empty() && !self.bank.contains_area(area) {
            return Err(SelectionError::UnknownArea(area.to_string()));
        }

        let mut state = self.inner.lock().await;
        state.selection.area = area.to_string();
        state.selection.subarea.clear();
        state.answers.clear();
        Ok(())
    }

    /// Selects `subarea` within the current area and clears the answers.
    pub async fn set_subarea(&self, subarea: &str) -> Result<(), SelectionError> {
        let mut state = self.inner.lock().await;
        if !subarea.is_empty() && !self.bank.contains_subarea(&state.selection.area, subarea) {
            return Err(SelectionError::UnknownSubarea {
                area: state.selection.area.clone(),
                subarea: subarea.to_string(),
            });
        }

        state.selection.subarea = subarea.to_string();
        state.answers.clear();
        Ok(())
    }

    /// Records an answer. The index range is only checked on submit.
    pub async fn set_answer(&self, index: usize, label: AnswerLabel) {
        self.inner.lock().await.answers.insert(index, label);
    }

    pub async fn set_date(&self, raw: &str) {
        self.inner.lock().await.fields.date = date_input::filter_digits(raw);
    }

    pub async fn set_supervisor(&self, value: impl Into<String>) {
        self.inner.lock().await.fields.supervisor = value.into();
    }

    pub async fn set_collaborator(&self, value: impl Into<String>) {
        self.inner.lock().await.fields.collaborator = value.into();
    }

    pub async fn set_role(&self, value: impl Into<String>) {
        self.inner.lock().await.fields.role = value.into();
    }

    pub async fn dismiss_success(&self) {
        let mut state = self.inner.lock().await;
        if state.show_success {
            state.show_success = false;
            let _ = self.events.send(FormEvent::SuccessCleared);
        }
    }

    /// On narrow viewports, schedules centring the date field once the on-screen
    /// keyboard is up. Returns whether a scroll was scheduled.
    pub fn on_date_focus(&self, viewport_width: u32) -> bool {
        if viewport_width > self.timings.mobile_breakpoint_px {
            return false;
        }

        let events = self.events.clone();
        let delay = self.timings.date_focus_scroll_delay;
        debug!(viewport_width, ?delay, "scheduling date field scroll");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(FormEvent::ScrollDateIntoView);
        });
        true
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.inner.lock().await;
        let selection = &state.selection;
        FormSnapshot {
            masked_date: date_input::masked(&state.fields.date),
            fields: state.fields.clone(),
            selection: selection.clone(),
            answers: state.answers.clone(),
            subarea_options: self
                .bank
                .subareas(&selection.area)
                .map(|subareas| subareas.map(str::to_string).collect())
                .unwrap_or_default(),
            questions: self
                .bank
                .questions(&selection.area, &selection.subarea)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            error: state.error.clone(),
            show_success: state.show_success,
            submitting: self.is_submitting(),
        }
    }

    /// Validates, persists and then either resets the form or surfaces the error.
    ///
    /// At most one submission runs per controller; a call made while another is in
    /// flight returns [`SubmitOutcome::Ignored`] without touching any state.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_submitting) = SubmittingGuard::acquire(&self.submitting, &self.events) else {
            debug!("submit ignored: a submission is already in flight");
            return SubmitOutcome::Ignored;
        };

        let result = self.validate_and_persist().await;

        let mut state = self.inner.lock().await;
        match result {
            Ok(()) => {
                state.reset_inputs();
                state.show_success = true;
                state.success_generation += 1;
                let generation = state.success_generation;
                drop(state);

                let _ = self.events.send(FormEvent::SubmitSucceeded);
                self.schedule_success_clear(generation);
                let _ = self.events.send(FormEvent::ScrollToTop);
                SubmitOutcome::Submitted
            }
            Err(err) => {
                let message = err.user_message();
                warn!("checklist submission rejected: {err}");
                state.error = Some(message.clone());
                drop(state);

                let _ = self.events.send(FormEvent::ErrorRaised(message));
                let _ = self.events.send(FormEvent::ScrollToTop);
                SubmitOutcome::Rejected(err)
            }
        }
    }

    async fn validate_and_persist(&self) -> Result<(), SubmitError> {
        let record = {
            let mut state = self.inner.lock().await;
            if state.error.take().is_some() {
                let _ = self.events.send(FormEvent::ErrorCleared);
            }
            build_submission(&self.bank, &state.selection, &state.fields, &state.answers)?
        };

        info!(
            area = %record.area,
            subarea = %record.subarea,
            answers = record.perguntas.len(),
            "submitting checklist"
        );
        self.store.insert(DTO_TABLE, &record).await?;
        Ok(())
    }

    fn schedule_success_clear(&self, generation: u64) {
        let inner = self.inner.clone();
        let events = self.events.clone();
        let ttl = self.timings.success_banner_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut state = inner.lock().await;
            if state.show_success && state.success_generation == generation {
                state.show_success = false;
                let _ = events.send(FormEvent::SuccessCleared);
            }
        });
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
