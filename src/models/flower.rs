//! Garden flowers, kept in insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::remote::Direction;
use crate::store::Entity;

/// The fixed set of flower kinds the garden can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowerKind {
    Rose,
    Tulip,
    Daisy,
    Lily,
    Sunflower,
}

impl std::fmt::Display for FlowerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowerKind::Rose => "rose",
            FlowerKind::Tulip => "tulip",
            FlowerKind::Daisy => "daisy",
            FlowerKind::Lily => "lily",
            FlowerKind::Sunflower => "sunflower",
        };
        write!(f, "{}", name)
    }
}

/// A flower message. `is_bloomed` flips false to true on first reveal and
/// never resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    pub id: String,
    pub message: String,
    pub is_bloomed: bool,
    pub kind: FlowerKind,
}

/// Backend row for `flowers`. The kind column is named `type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowerRow {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_bloomed: bool,
    #[serde(rename = "type")]
    pub kind: FlowerKind,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl FlowerRow {
    pub fn into_flower(self) -> Flower {
        Flower {
            id: self.id,
            message: self.message,
            is_bloomed: self.is_bloomed,
            kind: self.kind,
        }
    }
}

impl Entity for Flower {
    type Row = FlowerRow;

    const TABLE: &'static str = "flowers";
    const CACHE_KEY: &'static str = "flowers";
    const ACTION: &'static str = "flowers";
    const LIST_COLUMNS: &'static str = "*";

    fn list_order() -> (&'static str, Direction) {
        // Insertion order: creation time ascending
        ("created_at", Direction::Ascending)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: Self::Row) -> Self {
        row.into_flower()
    }

    fn insert_row(&self) -> Value {
        json!({
            "id": self.id,
            "message": self.message,
            "is_bloomed": self.is_bloomed,
            "type": self.kind,
        })
    }

    fn update_patch(&self) -> Value {
        json!({
            "message": self.message,
            "is_bloomed": self.is_bloomed,
            "type": self.kind,
        })
    }

    fn place(list: &mut Vec<Self>, item: Self) {
        // New flowers are appended; the garden never re-sorts
        list.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_mapping_renames_type() {
        let row: FlowerRow = serde_json::from_value(json!({
            "id": "f1",
            "message": "x",
            "is_bloomed": false,
            "type": "rose",
        }))
        .unwrap();
        let flower = row.into_flower();
        assert_eq!(flower.kind, FlowerKind::Rose);

        let wire = flower.insert_row();
        assert_eq!(wire["type"], json!("rose"));
        assert!(wire.get("kind").is_none());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<FlowerRow, _> = serde_json::from_value(json!({
            "id": "f1",
            "message": "x",
            "type": "orchid",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_place_appends() {
        let first = Flower {
            id: "f1".to_string(),
            message: "a".to_string(),
            is_bloomed: false,
            kind: FlowerKind::Tulip,
        };
        let second = Flower {
            id: "f2".to_string(),
            message: "b".to_string(),
            is_bloomed: false,
            kind: FlowerKind::Lily,
        };
        let mut list = vec![first];
        Flower::place(&mut list, second);
        assert_eq!(list[1].id, "f2");
    }
}
