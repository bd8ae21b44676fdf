//! Error-display policy
//!
//! Decides what each field shows under its input, given the focus state,
//! the ever-focused set, the validation results and the username check.
//! Nothing here mutates the form.

use serde::Serialize;

use crate::form::SignUpForm;
use crate::models::{Field, FieldError};

pub const USERNAME_RULES: &[&str] = &[
    "User ID used for log in",
    "3-10 characters of small letters, numbers",
];

pub const PASSWORD_RULES: &[&str] = &[
    "8-20 characters",
    "Include two of the followings:",
    "capital letters, small letters, numbers",
];

pub const AVAILABLE: &str = "Available";
pub const USERNAME_IN_USE: &str = "This ID is already in use";
pub const CHECK_USERNAME: &str = "Check user ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Success,
    Error,
}

/// What is rendered under a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldHint {
    Hidden,
    /// Compact warning icon followed by "Required"
    RequiredWarning,
    Message { text: &'static str, tone: Tone },
    Rules { rules: &'static [&'static str], tone: Tone },
}

/// Combined username state from validation, check record and current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsernameStatus {
    /// Nothing typed and never validated
    Empty,
    RequiredEmpty,
    InvalidFormat,
    Available,
    Unavailable,
    /// Valid format but not checked, or changed since the last check
    MustRecheck,
}

/// Input border styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Border {
    Neutral,
    Primary,
    Error,
}

pub fn username_status(form: &SignUpForm) -> UsernameStatus {
    let username = form.value(Field::Username);
    match form.error(Field::Username) {
        Some(FieldError::Required) => return UsernameStatus::RequiredEmpty,
        Some(_) => return UsernameStatus::InvalidFormat,
        None => {}
    }
    if username.is_empty() {
        return UsernameStatus::Empty;
    }
    match form.username_check() {
        Some(check) if check.is_fresh_for(username) && check.available => UsernameStatus::Available,
        Some(check) if check.is_fresh_for(username) => UsernameStatus::Unavailable,
        _ => UsernameStatus::MustRecheck,
    }
}

/// Hint for a single field
pub fn field_hint(form: &SignUpForm, field: Field) -> FieldHint {
    let focused = form.is_focused(field);
    if !focused && !form.was_focused(field) {
        return FieldHint::Hidden;
    }

    match field {
        Field::Username => username_hint(form, focused),
        Field::Password => password_hint(form, focused),
        Field::Major => {
            if form.value(Field::Major).is_empty() && !form.major_picker().is_open() {
                FieldHint::RequiredWarning
            } else {
                FieldHint::Hidden
            }
        }
        _ => match form.error(field) {
            Some(err) if !form.value(field).is_empty() || !focused => error_hint(err),
            _ => FieldHint::Hidden,
        },
    }
}

fn error_hint(err: FieldError) -> FieldHint {
    if err.is_required() {
        FieldHint::RequiredWarning
    } else {
        FieldHint::Message {
            text: err.message(),
            tone: Tone::Error,
        }
    }
}

fn username_hint(form: &SignUpForm, focused: bool) -> FieldHint {
    let status = username_status(form);

    if focused {
        if status == UsernameStatus::Unavailable {
            return FieldHint::Message {
                text: USERNAME_IN_USE,
                tone: Tone::Error,
            };
        }
        let invalid = form.error(Field::Username).is_some() && !form.value(Field::Username).is_empty();
        return FieldHint::Rules {
            rules: USERNAME_RULES,
            tone: if invalid { Tone::Error } else { Tone::Neutral },
        };
    }

    match status {
        UsernameStatus::Empty => FieldHint::Hidden,
        UsernameStatus::RequiredEmpty => FieldHint::RequiredWarning,
        UsernameStatus::InvalidFormat => FieldHint::Rules {
            rules: USERNAME_RULES,
            tone: Tone::Error,
        },
        UsernameStatus::Available => FieldHint::Message {
            text: AVAILABLE,
            tone: Tone::Success,
        },
        UsernameStatus::Unavailable => FieldHint::Message {
            text: USERNAME_IN_USE,
            tone: Tone::Error,
        },
        UsernameStatus::MustRecheck => FieldHint::Message {
            text: CHECK_USERNAME,
            tone: Tone::Error,
        },
    }
}

fn password_hint(form: &SignUpForm, focused: bool) -> FieldHint {
    let empty = form.value(Field::Password).is_empty();
    let error = form.error(Field::Password);

    if focused {
        return if error.is_some() || empty {
            FieldHint::Rules {
                rules: PASSWORD_RULES,
                tone: if empty { Tone::Neutral } else { Tone::Error },
            }
        } else {
            FieldHint::Message {
                text: AVAILABLE,
                tone: Tone::Success,
            }
        };
    }

    match error {
        Some(FieldError::Required) => FieldHint::RequiredWarning,
        Some(_) => FieldHint::Rules {
            rules: PASSWORD_RULES,
            tone: Tone::Error,
        },
        None => FieldHint::Hidden,
    }
}

/// Border tone of a field's input
pub fn border(form: &SignUpForm, field: Field) -> Border {
    let value = form.value(field);
    let focused = form.is_focused(field);

    if field == Field::Major {
        return if !value.is_empty() {
            Border::Primary
        } else if form.was_focused(field) && !form.major_picker().is_open() {
            Border::Error
        } else {
            Border::Neutral
        };
    }

    if field == Field::Username && !value.is_empty() && !form.is_username_verified() {
        let checked_unavailable = username_status(form) == UsernameStatus::Unavailable;
        if checked_unavailable || !focused {
            return Border::Error;
        }
    }

    if !form.was_focused(field) {
        return Border::Neutral;
    }
    match form.error(field) {
        Some(_) if !value.is_empty() || !focused => Border::Error,
        _ => Border::Primary,
    }
}
