use chrono::{TimeZone, Utc};
use journal_core::{Entry, EntryValidationError, NewEntry};

#[test]
fn new_entry_validates_and_trims() {
    let entry = NewEntry::new("\tRead Bible  ", 20).unwrap();
    assert_eq!(entry.task(), "Read Bible");
    assert_eq!(entry.minutes(), 20);

    assert_eq!(NewEntry::new("", 5), Err(EntryValidationError::EmptyTask));
    assert_eq!(
        NewEntry::new("Walk", -15),
        Err(EntryValidationError::NegativeMinutes(-15))
    );
}

#[test]
fn into_entry_attaches_identity() {
    let at = Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap();
    let entry = NewEntry::new("Walk", 15).unwrap().into_entry(7, at);

    assert_eq!(
        entry,
        Entry {
            id: 7,
            task: "Walk".to_string(),
            minutes: 15,
            created_at: at,
        }
    );
}

#[test]
fn entry_serialization_uses_expected_wire_fields() {
    let at = Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap();
    let entry = NewEntry::new("Walk", 15).unwrap().into_entry(3, at);

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["task"], "Walk");
    assert_eq!(json["minutes"], 15);
    assert_eq!(json["created_at"], "2026-02-13T10:00:00Z");

    let decoded: Entry = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, entry);
}

#[test]
fn validation_errors_have_readable_messages() {
    assert_eq!(
        EntryValidationError::EmptyTask.to_string(),
        "task must not be empty"
    );
    assert_eq!(
        EntryValidationError::NegativeMinutes(-2).to_string(),
        "minutes must be zero or greater, got -2"
    );
}
