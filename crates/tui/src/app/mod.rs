use std::collections::BTreeMap;

use crossterm::event::{self, Event, KeyEvent};
use stepper::{FieldKind, FieldSpec, FieldValue, StepWizard, SubmitError, Transition};
use tokio::sync::mpsc;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{self, keymap::AppAction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
}

impl ToastState {
    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub wizard: StepWizard,
    /// Index of the focused field within the active step.
    pub focus: usize,
    /// Raw text typed into text and number fields, keyed by field name.
    pub inputs: BTreeMap<String, String>,
    pub toast: Option<ToastState>,
    pub spinner_tick: usize,
}

impl AppState {
    pub fn new(wizard: StepWizard) -> Self {
        let inputs = wizard
            .steps()
            .iter()
            .flat_map(|step| step.fields())
            .filter(|field| !matches!(field.kind, FieldKind::Select(_)))
            .map(|field| {
                let text = wizard
                    .values()
                    .get(&field.name)
                    .map(|value| value.to_string())
                    .unwrap_or_default();
                (field.name.clone(), text)
            })
            .collect();

        Self {
            wizard,
            focus: 0,
            inputs,
            toast: None,
            spinner_tick: 0,
        }
    }

    pub fn focused_field(&self) -> Option<&FieldSpec> {
        self.wizard.active_step().fields().get(self.focus)
    }

    /// Text shown for a field: the raw input, or the value of a select.
    pub fn field_text(&self, name: &str) -> &str {
        if let Some(input) = self.inputs.get(name) {
            return input;
        }
        match self.wizard.values().get(name) {
            Some(FieldValue::Text(text)) => text.as_str(),
            _ => "",
        }
    }
}

pub struct App {
    config: AppConfig,
    pub state: AppState,
    should_quit: bool,
    completion_tx: mpsc::UnboundedSender<std::result::Result<(), SubmitError>>,
    completion_rx: mpsc::UnboundedReceiver<std::result::Result<(), SubmitError>>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let wizard = crate::form::wizard(config.submit_delay());
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            config,
            state: AppState::new(wizard),
            should_quit: false,
            completion_tx,
            completion_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::install_panic_hook();
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = self.config.tick_rate();
        tracing::info!(
            submit_delay_ms = self.config.submit_delay_ms,
            "transaction form started"
        );

        while !self.should_quit {
            self.drain_completions();
            if self.state.wizard.is_pending() {
                self.state.spinner_tick = self.state.spinner_tick.wrapping_add(1);
            }

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            } else {
                tokio::task::yield_now().await;
            }
        }

        tracing::info!(completed = self.state.wizard.is_completed(), "transaction form closed");
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match ui::keymap::map_key(key) {
            AppAction::Quit => {
                self.should_quit = true;
            }
            AppAction::Back => self.back(),
            AppAction::NextField => self.move_focus(true),
            AppAction::PrevField => self.move_focus(false),
            AppAction::Enter => self.enter(),
            AppAction::Submit => self.submit(),
            AppAction::Backspace => self.edit_text(|text| {
                text.pop();
            }),
            AppAction::PrevOption => self.cycle_option(false),
            AppAction::NextOption => self.cycle_option(true),
            AppAction::Input(ch) => self.input(ch),
            AppAction::None => {}
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.state.wizard.active_step().fields().len();
        if count == 0 {
            return;
        }
        self.blur_focused();
        self.state.focus = if forward {
            (self.state.focus + 1) % count
        } else {
            (self.state.focus + count - 1) % count
        };
        tracing::debug!(focus = self.state.focus, "focus moved");
    }

    fn blur_focused(&mut self) {
        if let Some(name) = self.state.focused_field().map(|field| field.name.clone()) {
            self.state.wizard.touch(&name);
        }
    }

    fn input(&mut self, ch: char) {
        let Some(field) = self.state.focused_field() else {
            return;
        };
        match &field.kind {
            FieldKind::Select(options) => {
                let wanted = ch.to_lowercase().to_string();
                let found = options
                    .iter()
                    .find(|option| {
                        option.value.to_lowercase().starts_with(&wanted)
                            || option.label.to_lowercase().starts_with(&wanted)
                    })
                    .map(|option| option.value.clone());
                if let Some(value) = found {
                    let name = field.name.clone();
                    self.state.wizard.set_value(&name, value.into());
                }
            }
            FieldKind::Number => {
                if ch.is_ascii_digit() || ch == '.' || ch == '-' {
                    self.edit_text(|text| {
                        if text.as_str() == "0" {
                            text.clear();
                        }
                        text.push(ch);
                    });
                }
            }
            FieldKind::Text | FieldKind::Multiline => self.edit_text(|text| text.push(ch)),
        }
    }

    /// Applies `edit` to the focused text or number field and stores the
    /// result in the form.
    fn edit_text(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(field) = self.state.focused_field() else {
            return;
        };
        if matches!(field.kind, FieldKind::Select(_)) || !self.state.wizard.submit_enabled() {
            return;
        }
        let name = field.name.clone();
        let is_number = field.kind == FieldKind::Number;

        let text = self.state.inputs.entry(name.clone()).or_default();
        edit(text);
        let value = if is_number {
            text.trim()
                .parse::<f64>()
                .map(FieldValue::Number)
                .unwrap_or_else(|_| FieldValue::Text(text.clone()))
        } else {
            FieldValue::Text(text.clone())
        };
        self.state.wizard.set_value(&name, value);
    }

    fn cycle_option(&mut self, forward: bool) {
        let Some(field) = self.state.focused_field() else {
            return;
        };
        let options = field.options();
        if options.is_empty() {
            return;
        }
        let current = options
            .iter()
            .position(|option| option.value == self.state.field_text(&field.name));
        let next = match (current, forward) {
            (Some(index), true) => (index + 1) % options.len(),
            (Some(index), false) => (index + options.len() - 1) % options.len(),
            (None, true) => 0,
            (None, false) => options.len() - 1,
        };
        let name = field.name.clone();
        let value = options[next].value.clone();
        self.state.wizard.set_value(&name, value.into());
    }

    fn enter(&mut self) {
        let multiline = self
            .state
            .focused_field()
            .is_some_and(|field| field.kind == FieldKind::Multiline);
        if multiline {
            self.edit_text(|text| text.push('\n'));
        } else {
            self.submit();
        }
    }

    fn submit(&mut self) {
        self.blur_focused();
        match self.state.wizard.submit() {
            Transition::Advanced { .. } => {
                self.state.focus = 0;
                self.state.toast = None;
            }
            Transition::Invalid(errors) => {
                if let Some(index) = self
                    .state
                    .wizard
                    .active_step()
                    .fields()
                    .iter()
                    .position(|field| errors.contains(&field.name))
                {
                    self.state.focus = index;
                }
            }
            Transition::Pending(pending) => {
                self.state.toast = None;
                self.state.spinner_tick = 0;
                let tx = self.completion_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(pending.await);
                });
            }
            Transition::Ignored if self.state.wizard.is_pending() => {
                self.state.toast = Some(ToastState::new(
                    ToastLevel::Info,
                    "Submission already in progress",
                ));
            }
            Transition::Completed
            | Transition::Failed(_)
            | Transition::Retreated { .. }
            | Transition::Ignored => {}
        }
    }

    fn back(&mut self) {
        if let Transition::Retreated { .. } = self.state.wizard.back() {
            self.state.focus = 0;
            self.state.toast = None;
        }
    }

    fn drain_completions(&mut self) {
        while let Ok(result) = self.completion_rx.try_recv() {
            match self.state.wizard.finish(result) {
                Transition::Completed => {
                    self.state.toast =
                        Some(ToastState::new(ToastLevel::Success, "Transaction saved"));
                }
                Transition::Failed(message) => {
                    self.state.toast = Some(ToastState::new(ToastLevel::Error, message));
                }
                _ => {}
            }
        }
    }
}
