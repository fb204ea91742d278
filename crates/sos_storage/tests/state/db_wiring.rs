#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sos_kernel_contracts::achievement::AchievementId;
use sos_kernel_contracts::contact::EmergencyContact;
use sos_kernel_contracts::emergency::{EmergencyRecord, EmergencyType, RecordId};
use sos_kernel_contracts::progress::{CrossAppChallengeId, TrainingModuleId};
use sos_kernel_contracts::reward::RewardPair;
use sos_storage::repo::{
    AchievementRepo, CrossAppChallengeRepo, EmergencyContactRepo, EmergencyRecordRepo, RewardTotalsRepo,
    TrainingProgressRepo,
};
use sos_storage::state::{SosStore, StorageError};

fn temp_state_path(name: &str) -> (PathBuf, PathBuf) {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(1);
    let base = std::env::temp_dir().join(format!("sos-state-test-{name}-{suffix}"));
    let path = base.join("nested").join("state.json");
    (base, path)
}

fn record(ts: u64) -> EmergencyRecord {
    EmergencyRecord::v1(
        EmergencyType::Seizure,
        ts,
        "park".to_string(),
        vec![
            "emergency_activation".to_string(),
            "voice_recognition".to_string(),
        ],
        "dispatched".to_string(),
        Some("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".to_string()),
    )
    .unwrap()
}

#[test]
fn at_state_db_01_missing_file_opens_with_defaults() {
    let (base, path) = temp_state_path("missing");
    let s = SosStore::open(&path).unwrap();
    assert_eq!(s.reward_totals_row().bonk, 0);
    assert!(s.contact_rows().is_empty());
    assert!(!path.exists());
    let _ = fs::remove_dir_all(base);
}

#[test]
fn at_state_db_02_save_then_open_preserves_every_namespace() {
    let (base, path) = temp_state_path("roundtrip");
    let mut s = SosStore::open(&path).unwrap();
    assert!(s.mark_training_completed_row(TrainingModuleId::FirstAid));
    assert!(s.mark_challenge_completed_row(CrossAppChallengeId::CprDefi));
    s.credit_reward_row(RewardPair::new(30, 15));
    s.append_contact_row(EmergencyContact::v1("Mom", "(555)-123-4567").unwrap())
        .unwrap();
    s.append_emergency_record_row(RecordId::new("sos_0001").unwrap(), record(5))
        .unwrap();
    s.bump_engagement_row(true);
    s.unlock_achievement_row(AchievementId::FirstAidTrained);
    s.save().unwrap();

    let reopened = SosStore::open(&path).unwrap();
    assert_eq!(reopened.state(), s.state());
    assert!(reopened.training_completed_row(TrainingModuleId::FirstAid));
    assert!(!reopened.training_completed_row(TrainingModuleId::Cpr));
    assert!(reopened.challenge_completed_row(CrossAppChallengeId::CprDefi));
    assert_eq!(reopened.reward_totals_row().skr, 15);
    assert_eq!(reopened.contact_rows()[0].name, "Mom");
    assert_eq!(reopened.emergency_record_rows().len(), 1);
    assert_eq!(reopened.engagement_row().voice_activations, 1);
    assert!(reopened.achievement_unlocked_row(AchievementId::FirstAidTrained));

    let tmp = path.with_extension("tmp");
    assert!(!tmp.exists());
    fs::remove_dir_all(base).unwrap();
}

#[test]
fn at_state_db_03_blank_file_is_treated_as_fresh_state() {
    let (base, path) = temp_state_path("blank");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "  \n").unwrap();
    let s = SosStore::open(&path).unwrap();
    assert!(s.emergency_record_rows().is_empty());
    fs::remove_dir_all(base).unwrap();
}

#[test]
fn at_state_db_04_schema_mismatch_and_garbage_are_rejected() {
    let (base, path) = temp_state_path("schema");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, r#"{"schema_version": 99}"#).unwrap();
    assert!(matches!(
        SosStore::open(&path),
        Err(StorageError::SchemaMismatch {
            found: 99,
            expected: 1
        })
    ));

    fs::write(&path, "{not json").unwrap();
    assert!(matches!(SosStore::open(&path), Err(StorageError::Json(_))));
    fs::remove_dir_all(base).unwrap();
}

#[test]
fn at_state_db_05_invalid_contact_is_refused_by_storage() {
    let mut s = SosStore::new_in_memory();
    let bad = EmergencyContact {
        name: String::new(),
        phone: "911".to_string(),
    };
    assert!(matches!(
        s.append_contact_row(bad),
        Err(StorageError::ContractViolation(_))
    ));
    assert!(s.contact_rows().is_empty());
}

#[test]
fn at_state_db_06_invalid_rows_on_disk_are_rejected_at_open() {
    let (base, path) = temp_state_path("invalid-rows");
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    fs::write(
        &path,
        r#"{"schema_version":1,"contacts":[{"name":"","phone":"x"}]}"#,
    )
    .unwrap();
    assert!(matches!(
        SosStore::open(&path),
        Err(StorageError::ContractViolation(_))
    ));

    let long_location = "x".repeat(300);
    let doc = format!(
        r#"{{"schema_version":1,"emergency_records":[{{"record_id":"sos_1","record":{{"schema_version":1,"emergency_type":"burn","timestamp_unix_ms":1,"location":"{long_location}","actions":[],"outcome":"done","wallet_address":null}}}}]}}"#
    );
    fs::write(&path, doc).unwrap();
    assert!(matches!(
        SosStore::open(&path),
        Err(StorageError::ContractViolation(_))
    ));

    fs::write(
        &path,
        r#"{"schema_version":1,"emergency_records":[{"record_id":"","record":{"schema_version":1,"emergency_type":"burn","timestamp_unix_ms":1,"location":"here","actions":[],"outcome":"done","wallet_address":null}}]}"#,
    )
    .unwrap();
    assert!(matches!(SosStore::open(&path), Err(StorageError::Json(_))));
    fs::remove_dir_all(base).unwrap();
}

#[test]
fn at_state_db_07_duplicate_record_ids_on_disk_are_rejected() {
    let (base, path) = temp_state_path("dup-ids");
    let mut s = SosStore::open(&path).unwrap();
    s.append_emergency_record_row(RecordId::new("sos_a").unwrap(), record(1))
        .unwrap();
    s.append_emergency_record_row(RecordId::new("sos_b").unwrap(), record(2))
        .unwrap();
    s.save().unwrap();

    let raw = fs::read_to_string(&path).unwrap().replace("sos_b", "sos_a");
    fs::write(&path, raw).unwrap();
    assert!(matches!(
        SosStore::open(&path),
        Err(StorageError::DuplicateKey { .. })
    ));
    fs::remove_dir_all(base).unwrap();
}
