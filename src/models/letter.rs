//! Letters, listed newest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::remote::Direction;
use crate::store::Entity;

/// A letter. `is_opened` flips false to true on first view and never resets;
/// setting it true again is idempotent. The list order is fixed by
/// `created_at`, newest first, and never re-sorted after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Letter {
    pub id: String,
    pub title: String,
    pub content: String,
    pub is_opened: bool,
    pub created_at: DateTime<Utc>,
}

/// Backend row for `letters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_opened: bool,
    pub created_at: DateTime<Utc>,
}

impl LetterRow {
    pub fn into_letter(self) -> Letter {
        Letter {
            id: self.id,
            title: self.title,
            content: self.content,
            is_opened: self.is_opened,
            created_at: self.created_at,
        }
    }
}

impl Entity for Letter {
    type Row = LetterRow;

    const TABLE: &'static str = "letters";
    const CACHE_KEY: &'static str = "letters";
    const ACTION: &'static str = "letters";
    const LIST_COLUMNS: &'static str = "*";

    fn list_order() -> (&'static str, Direction) {
        ("created_at", Direction::Descending)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: Self::Row) -> Self {
        row.into_letter()
    }

    fn insert_row(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "content": self.content,
            "is_opened": self.is_opened,
            "created_at": self.created_at,
        })
    }

    fn update_patch(&self) -> Value {
        // created_at is fixed at creation and never patched
        json!({
            "title": self.title,
            "content": self.content,
            "is_opened": self.is_opened,
        })
    }

    fn place(list: &mut Vec<Self>, item: Self) {
        // A new letter is the newest; prepending keeps created_at descending
        list.insert(0, item);
    }
}
