//! Sign-up form controller
//!
//! Owns everything the registration form keeps in memory: field values,
//! per-field validation results, focus tracking, the last username
//! availability check, the major picker and the submission guard.
//!
//! The two network operations are split into a synchronous `begin_*` half
//! and a `record_*`/`finish_*` half so that callers can keep the form
//! interactive while a request is in flight. The `async` wrappers
//! ([`SignUpForm::check_username_availability`], [`SignUpForm::submit`])
//! simply run both halves around a [`UserDirectory`] call.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::directory::UserDirectory;
use crate::error::{Error, Result};
use crate::majors::{MajorList, MajorPicker};
use crate::models::{
    Availability, Field, FieldError, FormValues, RegisterPayload, SignUpContext, UsernameCheck,
};
use crate::validation;

pub const SIGN_UP_SUCCEEDED: &str = "Sign up succeeded!";
pub const SIGN_UP_FAILED: &str = "Sign up failed!";

/// Focus slots: 0 (nothing) plus one per field
const FOCUS_SLOTS: usize = Field::ALL.len() + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Failure,
}

/// Transient user notification (toast)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Side effects the surrounding UI has to act on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FormEvent {
    Notify(Notification),
    /// Registration went through; the enclosing dialog should close
    CloseDialog,
}

/// Why a submission did not start
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitBlocker {
    /// A registration request is already in flight
    InFlight,
    MajorNotSelected,
    InvalidFields(Vec<Field>),
    /// The current username was never checked, or was edited since
    UsernameNotChecked,
    UsernameUnavailable,
    /// A result arrived with no registration request in flight
    NotStarted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Completed,
    Failed,
    Blocked(SubmitBlocker),
}

/// In-memory state of one sign-up form
#[derive(Debug, Clone)]
pub struct SignUpForm {
    context: SignUpContext,
    majors: MajorList,
    values: FormValues,
    /// Present once a field has been validated; `None` means it passed
    errors: HashMap<Field, Option<FieldError>>,
    focus: usize,
    focused: [bool; FOCUS_SLOTS],
    username_check: Option<UsernameCheck>,
    picker: MajorPicker,
    submitting: bool,
    events: Vec<FormEvent>,
}

impl SignUpForm {
    pub fn new(context: SignUpContext, majors: MajorList) -> Self {
        Self {
            context,
            majors,
            values: FormValues::default(),
            errors: HashMap::new(),
            focus: 0,
            focused: initial_focused(),
            username_check: None,
            picker: MajorPicker::default(),
            submitting: false,
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn context(&self) -> &SignUpContext {
        &self.context
    }

    pub fn majors(&self) -> &MajorList {
        &self.majors
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(field)
    }

    /// Currently focused field, `None` when nothing has focus
    pub fn focus(&self) -> Option<Field> {
        Field::from_index(self.focus)
    }

    pub fn is_focused(&self, field: Field) -> bool {
        self.focus == field.index()
    }

    /// Whether the field has received focus at least once
    pub fn was_focused(&self, field: Field) -> bool {
        self.focused[field.index()]
    }

    /// Error from the field's most recent validation
    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied().flatten()
    }

    pub fn is_validated(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    /// All current errors, in field order
    pub fn errors(&self) -> BTreeMap<Field, FieldError> {
        self.errors
            .iter()
            .filter_map(|(field, err)| err.map(|e| (*field, e)))
            .collect()
    }

    pub fn username_check(&self) -> Option<&UsernameCheck> {
        self.username_check.as_ref()
    }

    /// True only while the checked username is still the current one and
    /// the directory reported it free
    pub fn is_username_verified(&self) -> bool {
        self.username_check
            .as_ref()
            .is_some_and(|c| c.available && c.is_fresh_for(&self.values.username))
    }

    pub fn major_picker(&self) -> &MajorPicker {
        &self.picker
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Any value differs from its (empty) default
    pub fn is_dirty(&self) -> bool {
        self.values != FormValues::default()
    }

    /// State of the submit affordance
    pub fn can_submit(&self) -> bool {
        self.is_dirty() && !self.submitting
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Input handling
    // ========================================================================

    /// Move focus to `index` (0 = nothing, 1..=7 = field in tab order).
    ///
    /// The target joins the ever-focused set. Both the field losing focus
    /// and the field gaining it are validated.
    pub fn update_focus(&mut self, index: usize) -> Result<()> {
        if index >= FOCUS_SLOTS {
            return Err(Error::validation(format!(
                "Focus index {} out of range 0..={}",
                index,
                FOCUS_SLOTS - 1
            )));
        }
        self.focus_on(index);
        Ok(())
    }

    pub fn focus_field(&mut self, field: Field) {
        self.focus_on(field.index());
    }

    fn focus_on(&mut self, index: usize) {
        let previous = self.focus;
        self.focus = index;
        self.focused[index] = true;

        if previous != index {
            if let Some(field) = Field::from_index(previous) {
                self.validate(field);
            }
        }
        if let Some(field) = Field::from_index(index) {
            self.validate(field);
        }
    }

    /// Record an edit to a field and re-run the affected validations.
    ///
    /// The major can only be set to an entry of the list (or cleared).
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        if field == Field::Major && !value.is_empty() && !self.majors.contains(&value) {
            return Err(Error::validation(format!("Unknown major: {}", value)));
        }

        self.values.set(field, value);
        self.validate(field);

        match field {
            Field::Username => {
                let stale = self
                    .username_check
                    .as_ref()
                    .is_some_and(|c| c.username != self.values.username);
                if stale {
                    log::debug!("[signup:form] Username edited, previous check discarded");
                    self.username_check = None;
                }
            }
            Field::Password if !self.values.password_again.is_empty() => {
                self.validate(Field::PasswordAgain);
            }
            _ => {}
        }
        Ok(())
    }

    /// Validate one field against the current values
    pub fn validate(&mut self, field: Field) -> Option<FieldError> {
        let result = validation::validate_field(field, &self.values);
        self.errors.insert(field, result);
        result
    }

    /// Validate every field; returns true when all pass
    pub fn validate_all(&mut self) -> bool {
        Field::ALL
            .into_iter()
            .fold(true, |ok, field| self.validate(field).is_none() && ok)
    }

    // ========================================================================
    // Major picker
    // ========================================================================

    /// Open the picker; this also focuses the major field
    pub fn open_major_picker(&mut self) {
        self.focus_field(Field::Major);
        self.picker.open();
    }

    pub fn close_major_picker(&mut self) {
        self.picker.close();
    }

    pub fn set_major_query(&mut self, query: impl Into<String>) {
        self.picker.set_query(query);
    }

    /// Majors matching the current picker query
    pub fn major_options(&self) -> Vec<&str> {
        self.picker.filtered(&self.majors)
    }

    /// Select an exact entry and close the picker
    pub fn select_major(&mut self, value: &str) -> Result<()> {
        let major = self.picker.select(&self.majors, value)?;
        self.values.major = major;
        self.validate(Field::Major);
        Ok(())
    }

    // ========================================================================
    // Username availability
    // ========================================================================

    /// Validate the username locally and return the exact value to query.
    ///
    /// Returns `None` (and puts focus back on the username) when the
    /// format is wrong; no query must be issued then.
    pub fn begin_username_check(&mut self) -> Option<String> {
        if self.validate(Field::Username).is_some() {
            self.focus_field(Field::Username);
            return None;
        }
        Some(self.values.username.clone())
    }

    /// Record the directory's answer for `username`.
    ///
    /// Whatever resolves last is recorded, even if the field has changed in
    /// the meantime; freshness is decided by comparing against the current
    /// value at use time. Failures other than client errors are dropped.
    pub fn record_username_check(
        &mut self,
        username: String,
        result: Result<Availability>,
    ) -> Option<Availability> {
        let availability = match result {
            Ok(availability) => availability,
            Err(e) if e.is_client_error() => Availability::Taken,
            Err(e) => {
                log::warn!("[signup:form] Username check for {:?} failed: {}", username, e);
                return None;
            }
        };

        if username != self.values.username {
            log::debug!(
                "[signup:form] Check for {:?} resolved after username changed to {:?}",
                username,
                self.values.username
            );
        }
        self.username_check = Some(UsernameCheck {
            username,
            available: availability == Availability::Available,
        });
        Some(availability)
    }

    /// Check the current username against the directory
    pub async fn check_username_availability<D>(&mut self, directory: &D) -> Option<Availability>
    where
        D: UserDirectory + ?Sized,
    {
        let username = self.begin_username_check()?;
        let result = directory.check_username(&username).await;
        self.record_username_check(username, result)
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// The submit button click: reveal every field's errors
    pub fn submit_click(&mut self) {
        self.focus = 0;
        self.focused = [true; FOCUS_SLOTS];
        self.validate_all();
    }

    /// First unmet submission precondition, if any
    pub fn submit_blocker(&self) -> Option<SubmitBlocker> {
        if self.submitting {
            return Some(SubmitBlocker::InFlight);
        }
        if self.values.major.is_empty() {
            return Some(SubmitBlocker::MajorNotSelected);
        }
        let invalid: Vec<Field> = validation::validate_all(&self.values).into_keys().collect();
        if !invalid.is_empty() {
            return Some(SubmitBlocker::InvalidFields(invalid));
        }
        match &self.username_check {
            Some(check) if check.is_fresh_for(&self.values.username) => {
                (!check.available).then_some(SubmitBlocker::UsernameUnavailable)
            }
            _ => Some(SubmitBlocker::UsernameNotChecked),
        }
    }

    /// Raise the in-flight guard and build the registration payload
    pub fn begin_submit(&mut self) -> std::result::Result<RegisterPayload, SubmitBlocker> {
        if let Some(blocker) = self.submit_blocker() {
            log::debug!("[signup:form] Submission blocked: {:?}", blocker);
            return Err(blocker);
        }
        self.submitting = true;
        Ok(RegisterPayload::compose(&self.values, &self.context))
    }

    /// Apply the registration result.
    ///
    /// Success closes the dialog and tears the form down; failure keeps the
    /// values and lowers the guard so the user can retry. A result with no
    /// request in flight is ignored.
    pub fn finish_submit(&mut self, result: Result<()>) -> SubmitOutcome {
        if !self.submitting {
            log::warn!("[signup:form] Ignoring registration result with no request in flight");
            return SubmitOutcome::Blocked(SubmitBlocker::NotStarted);
        }
        match result {
            Ok(()) => {
                log::info!("[signup:form] Registered {:?}", self.values.username);
                self.clear_inputs();
                self.notify(NotificationLevel::Success, SIGN_UP_SUCCEEDED);
                self.events.push(FormEvent::CloseDialog);
                SubmitOutcome::Completed
            }
            Err(e) => {
                log::warn!("[signup:form] Registration failed: {}", e);
                self.submitting = false;
                self.notify(NotificationLevel::Failure, SIGN_UP_FAILED);
                SubmitOutcome::Failed
            }
        }
    }

    /// Submit the registration if every precondition holds
    pub async fn submit<D>(&mut self, directory: &D) -> SubmitOutcome
    where
        D: UserDirectory + ?Sized,
    {
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(blocker) => return SubmitOutcome::Blocked(blocker),
        };
        let result = directory.register(&payload, &self.context.headers).await;
        self.finish_submit(result)
    }

    /// Tear the form down: every piece of state goes back to its initial value
    pub fn reset(&mut self) {
        self.clear_inputs();
        self.events.clear();
    }

    fn clear_inputs(&mut self) {
        self.values = FormValues::default();
        self.errors.clear();
        self.focus = 0;
        self.focused = initial_focused();
        self.username_check = None;
        self.picker = MajorPicker::default();
        self.submitting = false;
    }

    fn notify(&mut self, level: NotificationLevel, message: &str) {
        self.events.push(FormEvent::Notify(Notification {
            level,
            message: message.to_string(),
        }));
    }
}

fn initial_focused() -> [bool; FOCUS_SLOTS] {
    let mut focused = [false; FOCUS_SLOTS];
    focused[0] = true;
    focused
}
