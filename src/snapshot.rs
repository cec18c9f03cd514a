//! Single-level undo for corrections.
//!
//! Before a correction is applied, every field value except the snapshot
//! field itself is serialized as a flat JSON object into
//! [`SNAPSHOT_FIELD`]. Restoring writes those values back and clears the
//! snapshot. Only the most recent pre-correction state is kept.

use crate::error::{CorrectionError, Result};
use crate::note::{Note, SNAPSHOT_FIELD};
use log::{debug, warn};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Fields were restored and the snapshot cleared.
    Restored { fields: usize },
    /// The note has no snapshot field, or it is empty.
    NothingToUndo,
}

/// Captures the note's current values into the snapshot field, replacing any
/// earlier snapshot. Returns `false` without touching the note if it has no
/// snapshot field.
pub fn snapshot(note: &mut Note) -> Result<bool> {
    if !note.supports_undo() {
        return Ok(false);
    }

    let values: BTreeMap<&str, &str> = note.editable_fields().collect();
    let serialized = serde_json::to_string(&values)?;
    debug!("Captured snapshot of {} fields", values.len());

    note.set(SNAPSHOT_FIELD, serialized);
    Ok(true)
}

/// Restores the values captured by [`snapshot`] and clears the snapshot.
///
/// A snapshot that is not valid JSON leaves the note unchanged.
pub fn restore(note: &mut Note) -> Result<RestoreOutcome> {
    let stored = match note.get(SNAPSHOT_FIELD) {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Ok(RestoreOutcome::NothingToUndo),
    };

    let values: BTreeMap<String, String> =
        serde_json::from_str(stored).map_err(CorrectionError::Decode)?;

    let mut restored = 0;
    for (name, value) in values {
        if name == SNAPSHOT_FIELD {
            continue;
        }
        if note.set(&name, value) {
            restored += 1;
        } else {
            warn!("Snapshot names field '{}' which this note does not have", name);
        }
    }

    note.set(SNAPSHOT_FIELD, "");
    Ok(RestoreOutcome::Restored { fields: restored })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::CorrectionResult;

    fn card() -> Note {
        Note::from_pairs([
            ("Front", "this is a sentance"),
            ("Back", "ansewr"),
            (SNAPSHOT_FIELD, ""),
        ])
    }

    #[test]
    fn test_snapshot_then_restore_round_trip() {
        let original = card();
        let mut note = original.clone();

        assert!(snapshot(&mut note).unwrap());
        note.set("Front", "changed");
        note.set("Back", "changed too");

        let outcome = restore(&mut note).unwrap();
        assert_eq!(outcome, RestoreOutcome::Restored { fields: 2 });
        assert_eq!(note, original);
        assert_eq!(note.get(SNAPSHOT_FIELD), Some(""));
    }

    #[test]
    fn test_snapshot_excludes_itself() {
        let mut note = card();
        note.set(SNAPSHOT_FIELD, "{\"Front\":\"stale\"}");
        snapshot(&mut note).unwrap();

        let stored: BTreeMap<String, String> =
            serde_json::from_str(note.get(SNAPSHOT_FIELD).unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored["Front"], "this is a sentance");
        assert!(!stored.contains_key(SNAPSHOT_FIELD));
    }

    #[test]
    fn test_second_restore_is_nothing_to_undo() {
        let mut note = card();
        snapshot(&mut note).unwrap();
        note.apply_corrections(&CorrectionResult::from([(
            "Back".to_string(),
            "answer".to_string(),
        )]));

        restore(&mut note).unwrap();
        let after_first = note.clone();

        assert_eq!(restore(&mut note).unwrap(), RestoreOutcome::NothingToUndo);
        assert_eq!(note, after_first);
    }

    #[test]
    fn test_no_snapshot_field_means_no_undo() {
        let mut note = Note::from_pairs([("Front", "a"), ("Back", "b")]);
        let before = note.clone();

        assert!(!snapshot(&mut note).unwrap());
        assert_eq!(note, before);
        assert_eq!(restore(&mut note).unwrap(), RestoreOutcome::NothingToUndo);
    }

    #[test]
    fn test_snapshot_overwrites_previous() {
        let mut note = card();
        snapshot(&mut note).unwrap();
        note.set("Front", "this is a sentence");
        snapshot(&mut note).unwrap();
        note.set("Front", "This is a sentence");

        restore(&mut note).unwrap();
        assert_eq!(note.get("Front"), Some("this is a sentence"));
    }

    #[test]
    fn test_corrupt_snapshot_leaves_note_untouched() {
        let mut note = card();
        note.set(SNAPSHOT_FIELD, "{\"Front\": ");
        let before = note.clone();

        let err = restore(&mut note).unwrap_err();
        assert!(matches!(err, CorrectionError::Decode(_)));
        assert_eq!(note, before);
    }

    #[test]
    fn test_restore_skips_reserved_and_unknown_names() {
        let mut note = card();
        note.set(
            SNAPSHOT_FIELD,
            r#"{"Front": "old front", "OriginalContent": "nested", "Gone": "x"}"#,
        );

        let outcome = restore(&mut note).unwrap();
        assert_eq!(outcome, RestoreOutcome::Restored { fields: 1 });
        assert_eq!(note.get("Front"), Some("old front"));
        assert_eq!(note.get("Back"), Some("ansewr"));
        assert_eq!(note.get(SNAPSHOT_FIELD), Some(""));
        assert!(!note.contains("Gone"));
    }
}
