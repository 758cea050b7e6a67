//! Raw rich-text payloads.
//!
//! Claim names, greetings, and farewells are rich text authored on the host
//! platform. The core stores the raw markup verbatim and never renders or
//! interprets it; presentation belongs to the host.

use serde::{Deserialize, Serialize};

/// A rich-text payload attached to a claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Text(String);

impl Text {
    /// Wrap raw markup as a text payload.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw markup, unrendered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the payload and return the raw markup.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for Text {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for Text {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl core::fmt::Display for Text {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
