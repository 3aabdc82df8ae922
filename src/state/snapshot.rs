/// Persisted form of the gallery
///
/// The gallery is stored as a single JSON string in the preferences slot.
/// Only storage names are written; display references are rebuilt on load.
///
/// Written form: `{"version":1,"photos":[{"filepath":"1718035200123.jpeg"}]}`
///
/// Older builds wrote a bare array of `{filepath, webviewPath}` objects,
/// which is still accepted. Unknown fields are ignored everywhere.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::data::PhotoRecord;
use crate::error::{GalleryError, Result};

/// Schema version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    photos: Vec<EntryOut<'a>>,
}

#[derive(Serialize)]
struct EntryOut<'a> {
    filepath: &'a str,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotIn {
    Versioned {
        #[serde(default)]
        version: u32,
        photos: Vec<EntryIn>,
    },
    Legacy(Vec<EntryIn>),
}

#[derive(Deserialize)]
struct EntryIn {
    #[serde(default)]
    filepath: Option<String>,
    #[serde(default, rename = "storageName")]
    storage_name: Option<String>,
}

/// Convert the gallery to its JSON snapshot
pub fn encode(photos: &[PhotoRecord]) -> Result<String> {
    let snapshot = SnapshotOut {
        version: SNAPSHOT_VERSION,
        photos: photos
            .iter()
            .map(|photo| EntryOut {
                filepath: &photo.storage_name,
            })
            .collect(),
    };

    serde_json::to_string(&snapshot).map_err(|e| GalleryError::SnapshotCorrupt(e.to_string()))
}

/// Parse a JSON snapshot into the ordered list of storage names.
///
/// Entries without a name are dropped and repeated names keep their first
/// position, so the result never holds duplicates.
pub fn decode(json: &str) -> Result<Vec<String>> {
    let parsed: SnapshotIn =
        serde_json::from_str(json).map_err(|e| GalleryError::SnapshotCorrupt(e.to_string()))?;

    let entries = match parsed {
        SnapshotIn::Versioned { version, photos } => {
            if version > SNAPSHOT_VERSION {
                tracing::warn!(
                    version,
                    supported = SNAPSHOT_VERSION,
                    "snapshot written by a newer build, reading known fields only"
                );
            }
            photos
        }
        SnapshotIn::Legacy(photos) => photos,
    };

    let mut seen = HashSet::new();
    let names = entries
        .into_iter()
        .filter_map(|entry| entry.filepath.or(entry.storage_name))
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect();

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, reference: Option<&str>) -> PhotoRecord {
        PhotoRecord::new(name, reference.map(str::to_string))
    }

    #[test]
    fn test_encode_omits_display_reference() {
        let photos = vec![
            record("2.jpeg", Some("data:image/jpeg;base64,AAAA")),
            record("1.jpeg", None),
        ];

        let json = encode(&photos).unwrap();

        assert_eq!(
            json,
            r#"{"version":1,"photos":[{"filepath":"2.jpeg"},{"filepath":"1.jpeg"}]}"#
        );
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let photos = vec![
            record("30.jpeg", Some("x")),
            record("20.jpeg", None),
            record("10.jpeg", Some("y")),
        ];

        let names = decode(&encode(&photos).unwrap()).unwrap();

        assert_eq!(names, vec!["30.jpeg", "20.jpeg", "10.jpeg"]);
    }

    #[test]
    fn test_legacy_array_accepted() {
        let json = r#"[
            {"filepath":"1700000000002.jpeg","webviewPath":"blob:http://localhost/abc"},
            {"filepath":"1700000000001.jpeg"}
        ]"#;

        assert_eq!(
            decode(json).unwrap(),
            vec!["1700000000002.jpeg", "1700000000001.jpeg"]
        );
    }

    #[test]
    fn test_unknown_and_missing_fields() {
        let json = r#"{"version":1,"extra":true,"photos":[
            {"filepath":"a.jpeg","caption":"hi"},
            {"webviewPath":"orphan"},
            {"filepath":""},
            {"filepath":null},
            {"storageName":"b.jpeg"}
        ]}"#;

        assert_eq!(decode(json).unwrap(), vec!["a.jpeg", "b.jpeg"]);
    }

    #[test]
    fn test_both_name_fields_present() {
        let json = r#"[
            {"filepath":"a.jpeg","storageName":"a.jpeg"},
            {"filepath":null,"storageName":"b.jpeg"}
        ]"#;

        assert_eq!(decode(json).unwrap(), vec!["a.jpeg", "b.jpeg"]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let json = r#"[{"filepath":"a.jpeg"},{"filepath":"b.jpeg"},{"filepath":"a.jpeg"}]"#;
        assert_eq!(decode(json).unwrap(), vec!["a.jpeg", "b.jpeg"]);
    }

    #[test]
    fn test_newer_version_read_best_effort() {
        let json = r#"{"version":7,"photos":[{"filepath":"a.jpeg","tags":["x"]}]}"#;
        assert_eq!(decode(json).unwrap(), vec!["a.jpeg"]);
    }

    #[test]
    fn test_corrupt_snapshots() {
        for json in ["", "not json", "{\"version\":1}", "42", "[1,2]", "{\"photos\":\"a\"}"] {
            assert!(
                matches!(decode(json), Err(GalleryError::SnapshotCorrupt(_))),
                "expected corrupt for {json:?}"
            );
        }
    }

    #[test]
    fn test_empty_gallery() {
        let json = encode(&[]).unwrap();
        assert_eq!(json, r#"{"version":1,"photos":[]}"#);
        assert!(decode(&json).unwrap().is_empty());
        assert!(decode("[]").unwrap().is_empty());
    }
}
