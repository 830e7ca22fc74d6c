//! Conversation entries.
//!
//! An [`Entry`] is one turn of conversation: a [`Role`] plus its text. The
//! conversation history is a plain `Vec<Entry>` owned by the caller; entries
//! are never mutated after construction.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

/// Speaker of a conversation entry.
///
/// Serializes to the lowercase wire string the Generative Language API
/// expects in `role` fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation.
    User,
    /// The model's answers.
    Model,
    /// System directive (only ever sent as `systemInstruction`).
    System,
}

impl Role {
    /// Wire string used in request payloads.
    pub fn wire(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
            Self::System => "system",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Model => "MODEL",
            Self::System => "SYSTEM",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry
// ─────────────────────────────────────────────────────────────────────────────

/// One role-tagged turn of conversation text.
///
/// Equality and hashing are structural over role and text. The text may be
/// empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    role: Role,
    text: String,
}

impl Entry {
    /// Create an entry with an explicit role.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// Create a [`Role::User`] entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a [`Role::Model`] entry.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    /// Speaker of this entry.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Entry text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role.label(), self.text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
