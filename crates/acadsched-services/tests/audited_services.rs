//! Audit behaviour of the decorated services as a whole.
//!
//! Run with: cargo test --package acadsched-services --test audited_services

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use acadsched_audit::{
    ActionType, AuditEntry, AuditError, AuditRecorder, AuditStorage, NewAuditEntry,
    SecurityContext,
};
use acadsched_core::{
    AuditConfig, Constraint, DispatchMode, Faculty, LeaveRequest, LeaveStatus, Room, Section,
    Subject,
};
use acadsched_services::{
    ConstraintService, FacultyService, LeaveService, RoomService, SectionService,
    ServiceRegistry, SubjectService,
};
use async_trait::async_trait;
use chrono::NaiveDate;

#[derive(Default)]
struct BrokenStorage {
    attempts: AtomicUsize,
}

#[async_trait]
impl AuditStorage for BrokenStorage {
    async fn append(&self, _entry: NewAuditEntry) -> Result<AuditEntry, AuditError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AuditError::StorageError("database is locked".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(vec![])
    }
}

fn inline_config() -> AuditConfig {
    AuditConfig {
        dispatch: DispatchMode::Inline,
        ..Default::default()
    }
}

fn registry() -> ServiceRegistry {
    ServiceRegistry::with_recorder(Arc::new(AuditRecorder::in_memory()), &inline_config())
}

fn ada() -> Faculty {
    Faculty {
        name: "Ada Lovelace".to_string(),
        email: "ada@uni.edu".to_string(),
        department: "CSE".to_string(),
        ..Default::default()
    }
}

fn leave_for(faculty_id: i64) -> LeaveRequest {
    LeaveRequest {
        faculty_id,
        leave_type: "Medical".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 11, 3).unwrap(),
        ..Default::default()
    }
}

/// Test that creating a faculty member without a caller records one CREATE entry.
#[tokio::test]
async fn test_create_faculty_records_entry() {
    let services = registry();
    services
        .faculty
        .create_faculty(&SecurityContext::anonymous(), ada())
        .await
        .unwrap();

    let entries = services.recorder().list_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entity_type, "FACULTY");
    assert_eq!(entries[0].action_type, ActionType::Create);
    assert!(entries[0].description.starts_with("CREATE FACULTY - Args: {"));
    assert!(entries[0].description.ends_with("; "));
    assert_eq!(entries[0].user_email, "System/Admin");
}

/// Test that approving leave as an authenticated user records an UPDATE on LEAVE.
#[tokio::test]
async fn test_approve_leave_attributed_to_caller() {
    let services = registry();
    let hod = SecurityContext::authenticated("hod@uni.edu");

    let id = services
        .leave
        .create_request(&hod, leave_for(1))
        .await
        .unwrap()
        .id
        .unwrap();
    services.leave.approve_leave(&hod, id).await.unwrap();

    let entries = services.recorder().list_all().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action_type, ActionType::Update);
    assert_eq!(entries[0].entity_type, "LEAVE");
    assert_eq!(entries[0].description, format!("UPDATE LEAVE - Args: {}; ", id));
    assert_eq!(entries[0].user_email, "hod@uni.edu");
    assert_eq!(entries[1].action_type, ActionType::Create);
}

/// Test that read operations across every service leave the trail untouched.
#[tokio::test]
async fn test_reads_are_not_recorded() {
    let services = registry();
    let ctx = SecurityContext::authenticated("viewer@uni.edu");

    services.faculty.get_all_faculty(&ctx).await.unwrap();
    services.sections.get_all_sections(&ctx).await.unwrap();
    services.sections.get_section_by_id(&ctx, 1).await.unwrap();
    services.rooms.find_all(&ctx).await.unwrap();
    services.leave.get_all_requests(&ctx).await.unwrap();
    services.leave.get_requests_by_faculty(&ctx, 1).await.unwrap();
    services.subjects.get_all_subjects(&ctx).await.unwrap();
    services.constraints.get_all_constraints(&ctx).await.unwrap();

    assert!(services.recorder().list_all().await.unwrap().is_empty());
}

/// Test that toggling a constraint is a successful call that is never audited.
#[tokio::test]
async fn test_toggle_constraint_not_recorded() {
    let services = registry();
    let ctx = SecurityContext::anonymous();

    let constraint = services
        .constraints
        .create_constraint(
            &ctx,
            Constraint {
                name: "Max 2 labs a day".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let toggled = services
        .constraints
        .toggle_constraint_status(&ctx, constraint.id.unwrap())
        .await
        .unwrap();
    assert!(!toggled.active);

    let entries = services.recorder().list_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entity_type, "CONSTRAINT");
    assert_eq!(entries[0].action_type, ActionType::Create);
}

/// Test that a call that fails is not recorded.
#[tokio::test]
async fn test_failed_mutation_not_recorded() {
    let services = registry();
    let ctx = SecurityContext::anonymous();

    assert!(services.faculty.update_faculty(&ctx, 40, ada()).await.is_err());
    assert!(services.subjects.delete_subject(&ctx, 40).await.is_err());

    let mut inverted = leave_for(1);
    std::mem::swap(&mut inverted.start_date, &mut inverted.end_date);
    assert!(services.leave.create_request(&ctx, inverted).await.is_err());

    assert!(services.recorder().list_all().await.unwrap().is_empty());
}

/// Test that a broken audit store never changes what the caller gets back.
#[tokio::test]
async fn test_broken_store_does_not_affect_caller() {
    let storage = Arc::new(BrokenStorage::default());
    let recorder = Arc::new(AuditRecorder::new(storage.clone()));
    let services = ServiceRegistry::with_recorder(recorder, &inline_config());
    let ctx = SecurityContext::authenticated("ops@uni.edu");

    let room = services
        .rooms
        .save(
            &ctx,
            Room {
                name: "Hall B".to_string(),
                code: "HB".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    services.rooms.delete_by_id(&ctx, room.id.unwrap()).await.unwrap();

    assert_eq!(storage.attempts.load(Ordering::SeqCst), 2);
}

/// Test one full pass over every service's mutations, newest entry first.
#[tokio::test]
async fn test_mutations_across_services() {
    let services = registry();
    let ctx = SecurityContext::authenticated("admin@uni.edu");

    let faculty_id = services.faculty.create_faculty(&ctx, ada()).await.unwrap().id.unwrap();
    services.faculty.delete_faculty(&ctx, faculty_id).await.unwrap();

    let section = services
        .sections
        .create_section(
            &ctx,
            Section {
                name: "ECE-B".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    services
        .sections
        .update_section(&ctx, section.id.unwrap(), section.clone())
        .await
        .unwrap();
    services.sections.delete_section(&ctx, 999).await.unwrap();

    let subject = services
        .subjects
        .create_subject(
            &ctx,
            Subject {
                code: "MA101".to_string(),
                name: "Calculus".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    services
        .subjects
        .update_subject(&ctx, subject.id.unwrap(), subject.clone())
        .await
        .unwrap();

    let leave_id = services.leave.create_request(&ctx, leave_for(3)).await.unwrap().id.unwrap();
    services
        .leave
        .update_status(&ctx, leave_id, LeaveStatus::Rejected)
        .await
        .unwrap();
    services.leave.delete_request(&ctx, leave_id).await.unwrap();

    let entries = services.recorder().list_all().await.unwrap();
    let trail: Vec<(String, ActionType)> = entries
        .iter()
        .map(|e| (e.entity_type.clone(), e.action_type))
        .collect();

    assert_eq!(
        trail,
        vec![
            ("LEAVE".to_string(), ActionType::Delete),
            ("LEAVE".to_string(), ActionType::Update),
            ("LEAVE".to_string(), ActionType::Create),
            ("SUBJECT".to_string(), ActionType::Update),
            ("SUBJECT".to_string(), ActionType::Create),
            ("SECTION".to_string(), ActionType::Delete),
            ("SECTION".to_string(), ActionType::Update),
            ("SECTION".to_string(), ActionType::Create),
            ("FACULTY".to_string(), ActionType::Delete),
            ("FACULTY".to_string(), ActionType::Create),
        ]
    );
    assert!(entries.iter().all(|e| e.user_email == "admin@uni.edu"));
    assert!(entries.windows(2).all(|w| w[0].id > w[1].id));
}

/// Test that detached dispatch still lands every entry.
#[tokio::test]
async fn test_detached_dispatch_records_eventually() {
    let recorder = Arc::new(AuditRecorder::in_memory());
    let services = ServiceRegistry::with_recorder(recorder.clone(), &AuditConfig::default());
    let ctx = SecurityContext::anonymous();

    for _ in 0..3 {
        services.faculty.create_faculty(&ctx, ada()).await.unwrap();
    }

    let mut entries = Vec::new();
    for _ in 0..100 {
        entries = recorder.list_all().await.unwrap();
        if entries.len() == 3 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(entries.len(), 3);
}

/// Test that default (detached) dispatch under a non-tokio executor still
/// returns the business result and records the entry.
#[test]
fn test_detached_dispatch_outside_tokio_runtime() {
    let recorder = Arc::new(AuditRecorder::in_memory());
    let services = ServiceRegistry::with_recorder(recorder.clone(), &AuditConfig::default());
    let ctx = SecurityContext::authenticated("dean@uni.edu");

    let created = futures::executor::block_on(services.faculty.create_faculty(&ctx, ada())).unwrap();
    assert_eq!(created.id, Some(1));

    let entries = futures::executor::block_on(recorder.list_all()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action_type, ActionType::Create);
    assert_eq!(entries[0].user_email, "dean@uni.edu");
}
