use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    Username,
    StudentNumber,
    PhoneNumber,
}

impl FieldId {
    /// Form order; validation walks the fields in this order.
    pub const ALL: [FieldId; 3] = [
        FieldId::Username,
        FieldId::StudentNumber,
        FieldId::PhoneNumber,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::Username => "username",
            FieldId::StudentNumber => "studentNumber",
            FieldId::PhoneNumber => "phoneNumber",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Username => "사용자명",
            FieldId::StudentNumber => "학번",
            FieldId::PhoneNumber => "전화번호",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Resolves a display label for a raw field id, falling back to the id itself.
pub fn field_label(id: &str) -> &str {
    id.parse::<FieldId>().map(FieldId::label).unwrap_or(id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub username: String,
    pub student_number: String,
    pub phone_number: String,
}

impl Credential {
    pub fn new(
        username: impl Into<String>,
        student_number: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            student_number: student_number.into(),
            phone_number: phone_number.into(),
        }
    }
}

/// The trimmed form values of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttempt {
    pub username: String,
    pub student_number: String,
    pub phone_number: String,
}

impl LoginAttempt {
    pub fn new(username: &str, student_number: &str, phone_number: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            student_number: student_number.trim().to_string(),
            phone_number: phone_number.trim().to_string(),
        }
    }

    /// Exact, case-sensitive match on all three fields.
    pub fn matches(&self, credential: &Credential) -> bool {
        self.username == credential.username
            && self.student_number == credential.student_number
            && self.phone_number == credential.phone_number
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }

    pub fn icon_class(self) -> &'static str {
        match self {
            NotificationKind::Success => "fas fa-check-circle",
            NotificationKind::Error => "fas fa-exclamation-circle",
            NotificationKind::Warning => "fas fa-exclamation-triangle",
            NotificationKind::Info => "fas fa-info-circle",
        }
    }

    /// Unknown labels present as `Info`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "success" => NotificationKind::Success,
            "error" => NotificationKind::Error,
            "warning" => NotificationKind::Warning,
            _ => NotificationKind::Info,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Info)
    }
}

/// Presentation flags of one input wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldState {
    pub has_value: bool,
    pub focused: bool,
    pub error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
            shift: false,
            alt: false,
        }
    }

    pub fn has_modifier(&self) -> bool {
        self.ctrl || self.shift || self.alt
    }
}
