//! Backup file export and validated import

use chrono::NaiveDate;
use serde_json::Value;

use crate::board::{PersistedState, clamp_progress};
use crate::error::{Error, Result};

/// Pretty-printed JSON, as written to backup files and snapshot payloads
pub fn export_string(state: &PersistedState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

pub fn export_state(state: &PersistedState) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(state)?)
}

/// Parse and validate a backup. Nothing is returned unless the whole
/// payload is a valid state; missing focus fields default to empty.
pub fn import_state(bytes: &[u8]) -> Result<PersistedState> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::Validation(format!("backup is not valid JSON: {}", e)))?;
    validate(value)
}

pub fn import_str(json: &str) -> Result<PersistedState> {
    import_state(json.as_bytes())
}

fn validate(value: Value) -> Result<PersistedState> {
    match value.get("missions") {
        Some(Value::Array(_)) => {}
        _ => {
            return Err(Error::Validation(
                "backup has no missions list".to_string(),
            ));
        }
    }
    let mut state: PersistedState = serde_json::from_value(value)
        .map_err(|e| Error::Validation(format!("backup missions are malformed: {}", e)))?;
    for mission in &mut state.missions {
        mission.progress = clamp_progress(mission.progress as i64);
    }
    Ok(state)
}

/// `mission-control-backup-YYYYMMDD.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("mission-control-backup-{}.json", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_is_pretty() {
        let text = export_string(&PersistedState::default()).unwrap();
        assert_eq!(
            text,
            "{\n  \"missions\": [],\n  \"todayFocus\": \"\",\n  \"focusLog\": \"\"\n}"
        );
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut state = PersistedState::seeded();
        state.set_today_focus("Finish the comparison sheet");
        state.save_focus_log();

        let bytes = export_state(&state).unwrap();
        assert_eq!(import_state(&bytes).unwrap(), state);
    }

    #[test]
    fn test_import_defaults_missing_focus() {
        let state = import_str(r#"{"missions": []}"#).unwrap();
        assert!(state.missions.is_empty());
        assert_eq!(state.today_focus, "");
        assert_eq!(state.focus_log, "");
    }

    #[test]
    fn test_import_rejects_non_json() {
        assert!(matches!(import_str("not json"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_import_rejects_missing_or_wrong_missions() {
        for json in [
            r#"{"todayFocus": "x"}"#,
            r#"{"missions": {"id": "m-1"}}"#,
            r#"{"missions": "none"}"#,
            r#"[1, 2, 3]"#,
        ] {
            assert!(
                matches!(import_str(json), Err(Error::Validation(_))),
                "accepted {}",
                json
            );
        }
    }

    #[test]
    fn test_import_rejects_malformed_mission() {
        let json = r#"{"missions": [{"id": "m-1", "title": "no other fields"}]}"#;
        assert!(matches!(import_str(json), Err(Error::Validation(_))));
    }

    #[test]
    fn test_import_accepts_legacy_statuses() {
        let json = r#"{
            "missions": [{
                "id": "m-1", "title": "t", "detail": "d", "due": "2026-02-28",
                "owner": "o", "status": "대기", "priority": "M",
                "tasks": [{"id": "t-1", "title": "x", "done": true}],
                "progress": 100
            }],
            "todayFocus": "focus"
        }"#;
        let state = import_str(json).unwrap();
        assert_eq!(state.missions[0].status, crate::MissionStatus::Pending);
        assert_eq!(state.today_focus, "focus");
    }

    #[test]
    fn test_import_clamps_progress() {
        let json = r#"{
            "missions": [{
                "id": "m-1", "title": "t", "detail": "d", "due": "2026-02-28",
                "owner": "o", "status": "done", "priority": "H",
                "tasks": [], "progress": 137
            }]
        }"#;
        let state = import_str(json).unwrap();
        assert_eq!(state.missions[0].progress, 100);

        let exported = export_string(&state).unwrap();
        assert!(exported.contains("\"progress\": 100"));
    }

    #[test]
    fn test_backup_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(backup_file_name(date), "mission-control-backup-20260305.json");
    }
}
