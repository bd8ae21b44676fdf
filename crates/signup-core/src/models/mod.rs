//! Data models for the sign-up form

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sign-up form field, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Username,
    Password,
    PasswordAgain,
    FirstName,
    LastName,
    StudentId,
    Major,
}

impl Field {
    /// All fields in tab order
    pub const ALL: [Field; 7] = [
        Field::Username,
        Field::Password,
        Field::PasswordAgain,
        Field::FirstName,
        Field::LastName,
        Field::StudentId,
        Field::Major,
    ];

    /// Focus index of the field (1-based, 0 means "nothing focused")
    pub fn index(self) -> usize {
        match self {
            Field::Username => 1,
            Field::Password => 2,
            Field::PasswordAgain => 3,
            Field::FirstName => 4,
            Field::LastName => 5,
            Field::StudentId => 6,
            Field::Major => 7,
        }
    }

    /// Field for a focus index, `None` for 0 and out-of-range indices
    pub fn from_index(index: usize) -> Option<Field> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Wire/field name, as used in the registration payload
    pub fn name(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
            Field::PasswordAgain => "passwordAgain",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::StudentId => "studentId",
            Field::Major => "major",
        }
    }

    /// Placeholder shown for the input
    pub fn label(self) -> &'static str {
        match self {
            Field::Username => "User ID",
            Field::Password => "Password",
            Field::PasswordAgain => "Re-enter password",
            Field::FirstName => "First name (이름)",
            Field::LastName => "Last name (성)",
            Field::StudentId => "Student ID (2024123456)",
            Field::Major => "First Major",
        }
    }

    /// Whether the input should be masked
    pub fn is_secret(self) -> bool {
        matches!(self, Field::Password | Field::PasswordAgain)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// Validation failure attached to a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FieldError {
    /// Value is empty
    Required,
    /// Value violates the field's format rule
    InvalidFormat(&'static str),
    /// passwordAgain does not match password
    Mismatch,
}

impl FieldError {
    pub fn message(&self) -> &'static str {
        match self {
            FieldError::Required => "Required",
            FieldError::InvalidFormat(msg) => msg,
            FieldError::Mismatch => "Incorrect",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, FieldError::Required)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Current input values of the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub username: String,
    pub password: String,
    pub password_again: String,
    pub first_name: String,
    pub last_name: String,
    pub student_id: String,
    pub major: String,
}

impl FormValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::PasswordAgain => &self.password_again,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::StudentId => &self.student_id,
            Field::Major => &self.major,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Username => self.username = value,
            Field::Password => self.password = value,
            Field::PasswordAgain => self.password_again = value,
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::StudentId => self.student_id = value,
            Field::Major => self.major = value,
        }
    }

    /// Full name sent as `realName`: first and last joined by a space
    pub fn real_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data carried over from the email verification step
///
/// Created when the multi-step sign-up flow begins and handed to the form
/// read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpContext {
    pub email: String,
    pub verification_code: String,
    /// Extra request headers issued by the verification step
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl SignUpContext {
    pub fn new(email: impl Into<String>, verification_code: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            verification_code: verification_code.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// JSON body posted to the registration endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub password: String,
    pub password_again: String,
    pub real_name: String,
    pub student_id: String,
    pub major: String,
    pub username: String,
    pub email: String,
    pub verification_code: String,
}

impl RegisterPayload {
    pub fn compose(values: &FormValues, context: &SignUpContext) -> Self {
        Self {
            password: values.password.clone(),
            password_again: values.password_again.clone(),
            real_name: values.real_name(),
            student_id: values.student_id.clone(),
            major: values.major.clone(),
            username: values.username.clone(),
            email: context.email.clone(),
            verification_code: context.verification_code.clone(),
        }
    }
}

/// Outcome of a username availability query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Taken,
}

/// Last username sent for checking and what the directory said about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsernameCheck {
    pub username: String,
    pub available: bool,
}

impl UsernameCheck {
    /// A check can only be trusted while the username is unchanged
    pub fn is_fresh_for(&self, username: &str) -> bool {
        !username.is_empty() && self.username == username
    }
}
