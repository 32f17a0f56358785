//! crates/selections_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// A user-recorded excerpt of text from one page of one PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub id: i64,
    pub owner: Uuid,
    pub pdf_name: String,
    pub page_number: i32,
    pub selected_text: String,
    /// Position of the selection on the page. The shape is up to the client.
    pub coordinates: Value,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - Page {}",
            self.owner, self.pdf_name, self.page_number
        )
    }
}

/// The client-editable fields of a selection, all present.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSelection {
    pub pdf_name: String,
    pub page_number: i32,
    pub selected_text: String,
    pub coordinates: Value,
}

/// A set of field replacements. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionChanges {
    pub pdf_name: Option<String>,
    pub page_number: Option<i32>,
    pub selected_text: Option<String>,
    pub coordinates: Option<Value>,
}

impl SelectionChanges {
    /// Writes every present field onto `selection`.
    pub fn apply_to(self, selection: &mut Selection) {
        if let Some(pdf_name) = self.pdf_name {
            selection.pdf_name = pdf_name;
        }
        if let Some(page_number) = self.page_number {
            selection.page_number = page_number;
        }
        if let Some(selected_text) = self.selected_text {
            selection.selected_text = selected_text;
        }
        if let Some(coordinates) = self.coordinates {
            selection.coordinates = coordinates;
        }
    }
}

impl From<NewSelection> for SelectionChanges {
    fn from(new: NewSelection) -> Self {
        Self {
            pdf_name: Some(new.pdf_name),
            page_number: Some(new.page_number),
            selected_text: Some(new.selected_text),
            coordinates: Some(new.coordinates),
        }
    }
}

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
