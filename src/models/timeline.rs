//! Timeline milestones, sorted ascending by date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::remote::Direction;
use crate::store::Entity;

/// A dated milestone shown on the timeline.
///
/// `photo` holds the inline payload once it has been lazily loaded;
/// `has_photo` says whether a payload exists remotely, independent of whether
/// it is loaded locally. `photo` being set implies `has_photo`, and entries
/// with `has_photo == false` are never fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub photo: Option<String>,
    pub has_photo: bool,
}

/// Backend row for `timeline_entries`.
///
/// `has_photo` is a computed column the backend attaches to list selects so
/// clients can avoid pulling payloads; it is never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineRow {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub has_photo: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TimelineRow {
    pub fn into_entry(self) -> TimelineEntry {
        let has_photo = self.photo.is_some() || self.has_photo.unwrap_or(false);
        TimelineEntry {
            id: self.id,
            date: self.date,
            title: self.title,
            description: self.description,
            photo: self.photo,
            has_photo,
        }
    }
}

impl Entity for TimelineEntry {
    type Row = TimelineRow;

    const TABLE: &'static str = "timeline_entries";
    const CACHE_KEY: &'static str = "timeline";
    const ACTION: &'static str = "timeline";
    // Payloads stay out of list responses; has_photo flags their existence.
    const LIST_COLUMNS: &'static str = "id,date,title,description,has_photo";

    fn list_order() -> (&'static str, Direction) {
        ("date", Direction::Ascending)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: Self::Row) -> Self {
        row.into_entry()
    }

    fn insert_row(&self) -> Value {
        let mut row = json!({
            "id": self.id,
            "date": self.date,
            "title": self.title,
            "description": self.description,
        });
        // Inline payloads (entry created with a photo) are written directly
        if let Some(ref photo) = self.photo {
            row["photo"] = json!(photo);
        }
        row
    }

    fn update_patch(&self) -> Value {
        let mut patch = json!({
            "date": self.date,
            "title": self.title,
            "description": self.description,
        });
        // Omit photo unless loaded locally, so a metadata edit cannot null
        // out the remote payload
        if let Some(ref photo) = self.photo {
            patch["photo"] = json!(photo);
        }
        patch
    }

    fn place(list: &mut Vec<Self>, item: Self) {
        list.push(item);
        // Stable sort keeps insertion order for equal dates
        list.sort_by(|a, b| a.date.cmp(&b.date));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: &str) -> TimelineEntry {
        TimelineEntry {
            id: id.to_string(),
            date: date.parse().unwrap(),
            title: "title".to_string(),
            description: String::new(),
            photo: None,
            has_photo: false,
        }
    }

    #[test]
    fn test_row_mapping_flags_remote_photo() {
        let row: TimelineRow = serde_json::from_value(json!({
            "id": "t1",
            "date": "2023-05-01",
            "title": "Picnic",
            "description": "A day out",
            "has_photo": true,
        }))
        .unwrap();
        let entry = row.into_entry();
        assert_eq!(entry.id, "t1");
        assert!(entry.has_photo);
        assert!(entry.photo.is_none());
    }

    #[test]
    fn test_inline_photo_implies_has_photo() {
        let row: TimelineRow = serde_json::from_value(json!({
            "id": "t1",
            "date": "2023-05-01",
            "title": "Picnic",
            "photo": "data:image/png;base64,AAAA",
        }))
        .unwrap();
        let entry = row.into_entry();
        assert!(entry.has_photo);
        assert_eq!(entry.photo.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_insert_row_never_writes_computed_column() {
        let row = entry("t1", "2023-05-01").insert_row();
        assert!(row.get("has_photo").is_none());
        assert!(row.get("photo").is_none());
        assert_eq!(row["date"], json!("2023-05-01"));
    }

    #[test]
    fn test_update_patch_omits_unloaded_photo() {
        let mut e = entry("t1", "2023-05-01");
        e.has_photo = true;
        let patch = e.update_patch();
        assert!(patch.get("photo").is_none());
        assert!(patch.get("id").is_none());

        e.photo = Some("payload".to_string());
        let patch = e.update_patch();
        assert_eq!(patch["photo"], json!("payload"));
    }

    #[test]
    fn test_place_sorts_ascending_by_date() {
        let mut list = vec![entry("a", "2021-01-10"), entry("b", "2023-05-01")];
        TimelineEntry::place(&mut list, entry("c", "2022-07-04"));
        let dates: Vec<String> = list.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2021-01-10", "2022-07-04", "2023-05-01"]);
    }
}
