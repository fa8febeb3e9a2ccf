//! Database-level tests for the attendance/ledger contract: roster mark,
//! class balance, and attendance record move together or not at all.

use arcilla_server::db::{Database, StudentRow};
use arcilla_server::error::AppError;
use shared::AttendanceMark;
use tempfile::TempDir;
use uuid::Uuid;

async fn test_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arcilla-test.db");
    let db = Database::connect(path.to_str().unwrap()).await.unwrap();
    db.run_migrations().await.unwrap();
    (dir, db)
}

async fn add_student(db: &Database, name: &str, classes_remaining: i64) -> String {
    let row = StudentRow {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        phone: "600000000".to_string(),
        classes_remaining,
        status: "regular".to_string(),
        payment_method: None,
        notes: None,
        price: None,
        class_type: None,
        expiry_date: None,
        created_at: None,
    };
    db.insert_student(&row, &[]).await.unwrap();
    row.id
}

async fn balance(db: &Database, id: &str) -> (i64, String) {
    let student = db.get_student(id).await.unwrap().unwrap();
    (student.classes_remaining, student.status)
}

#[tokio::test]
async fn present_decrements_and_records() {
    let (_dir, db) = test_db().await;
    let ana = add_student(&db, "Ana", 4).await;
    let session = db
        .create_session("2025-03-10", "10:00", "12:00", &["Ana".to_string()])
        .await
        .unwrap();

    let view = db
        .update_attendance(&session.id, "Ana", AttendanceMark::Present)
        .await
        .unwrap();
    assert_eq!(view.attendance_confirmed, vec!["Ana"]);
    assert!(view.attendance_absent.is_empty());

    assert_eq!(balance(&db, &ana).await, (3, "regular".to_string()));
    let history = db.attendance_history_for(&ana).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, "present");
    assert_eq!(history[0].date, "2025-03-10");
}

#[tokio::test]
async fn undo_restores_balance_and_deletes_record() {
    let (_dir, db) = test_db().await;
    let ana = add_student(&db, "Ana", 4).await;
    let session = db
        .create_session("2025-03-10", "10:00", "12:00", &["Ana".to_string()])
        .await
        .unwrap();

    db.update_attendance(&session.id, "Ana", AttendanceMark::Present)
        .await
        .unwrap();
    let view = db
        .update_attendance(&session.id, "Ana", AttendanceMark::None)
        .await
        .unwrap();

    assert!(view.attendance_confirmed.is_empty());
    assert_eq!(balance(&db, &ana).await.0, 4);
    assert!(db.attendance_history_for(&ana).await.unwrap().is_empty());
}

#[tokio::test]
async fn present_to_absent_refunds_and_keeps_record() {
    let (_dir, db) = test_db().await;
    let ana = add_student(&db, "Ana", 4).await;
    let session = db
        .create_session("2025-03-10", "10:00", "12:00", &["Ana".to_string()])
        .await
        .unwrap();

    db.update_attendance(&session.id, "Ana", AttendanceMark::Present)
        .await
        .unwrap();
    let view = db
        .update_attendance(&session.id, "Ana", AttendanceMark::Absent)
        .await
        .unwrap();

    assert_eq!(view.attendance_absent, vec!["Ana"]);
    assert_eq!(balance(&db, &ana).await.0, 4);
    let history = db.attendance_history_for(&ana).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, "absent");
}

// The floor asymmetry from the transition table, observed end to end: a
// decrement absorbed at zero is still credited back on undo.
#[tokio::test]
async fn floored_decrement_is_not_reversible() {
    let (_dir, db) = test_db().await;
    let ana = add_student(&db, "Ana", 0).await;
    let session = db
        .create_session("2025-03-10", "10:00", "12:00", &["Ana".to_string()])
        .await
        .unwrap();

    db.update_attendance(&session.id, "Ana", AttendanceMark::Present)
        .await
        .unwrap();
    assert_eq!(balance(&db, &ana).await, (0, "needs_renewal".to_string()));

    db.update_attendance(&session.id, "Ana", AttendanceMark::None)
        .await
        .unwrap();
    // Status stays needs_renewal: only the renewal action clears it.
    assert_eq!(balance(&db, &ana).await, (1, "needs_renewal".to_string()));
}

#[tokio::test]
async fn same_mark_twice_is_idempotent() {
    let (_dir, db) = test_db().await;
    let ana = add_student(&db, "Ana", 4).await;
    let session = db
        .create_session("2025-03-10", "10:00", "12:00", &["Ana".to_string()])
        .await
        .unwrap();

    db.update_attendance(&session.id, "Ana", AttendanceMark::Present)
        .await
        .unwrap();
    db.update_attendance(&session.id, "Ana", AttendanceMark::Present)
        .await
        .unwrap();

    assert_eq!(balance(&db, &ana).await.0, 3);
    assert_eq!(db.attendance_history_for(&ana).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unenrolled_student_is_rejected() {
    let (_dir, db) = test_db().await;
    add_student(&db, "Ana", 4).await;
    let luis = add_student(&db, "Luis", 4).await;
    let session = db
        .create_session("2025-03-10", "10:00", "12:00", &["Ana".to_string()])
        .await
        .unwrap();

    let err = db
        .update_attendance(&session.id, "Luis", AttendanceMark::Present)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotEnrolled { .. }));
    // No partial effect.
    assert_eq!(balance(&db, &luis).await.0, 4);
}

#[tokio::test]
async fn unknown_session_is_rejected() {
    let (_dir, db) = test_db().await;
    add_student(&db, "Ana", 4).await;

    let err = db
        .update_attendance("missing", "Ana", AttendanceMark::Present)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn roster_rejects_duplicate_enrollment() {
    let (_dir, db) = test_db().await;
    add_student(&db, "Ana", 4).await;

    // Two roster rows for the same (session, name) violate the store's
    // uniqueness constraint and roll the whole create back.
    let err = db
        .create_session(
            "2025-03-10",
            "10:00",
            "12:00",
            &["Ana".to_string(), "Ana".to_string()],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
    assert!(db.list_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_names_are_skipped_on_enroll() {
    let (_dir, db) = test_db().await;
    add_student(&db, "Ana", 4).await;

    let view = db
        .create_session(
            "2025-03-10",
            "10:00",
            "12:00",
            &["Ana".to_string(), "Nadie".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(view.students, vec!["Ana"]);
}

#[tokio::test]
async fn roster_diff_keeps_marks_and_refunds_removed() {
    let (_dir, db) = test_db().await;
    let ana = add_student(&db, "Ana", 4).await;
    let luis = add_student(&db, "Luis", 2).await;
    add_student(&db, "Marta", 3).await;
    let session = db
        .create_session(
            "2025-03-10",
            "10:00",
            "12:00",
            &["Ana".to_string(), "Luis".to_string()],
        )
        .await
        .unwrap();

    db.update_attendance(&session.id, "Ana", AttendanceMark::Present)
        .await
        .unwrap();
    db.update_attendance(&session.id, "Luis", AttendanceMark::Absent)
        .await
        .unwrap();

    // Drop Ana, keep Luis, add Marta.
    let view = db
        .update_session(
            &session.id,
            None,
            None,
            None,
            Some(&["Luis".to_string(), "Marta".to_string()]),
        )
        .await
        .unwrap();

    assert_eq!(view.students, vec!["Luis", "Marta"]);
    // Luis kept his absent mark through the edit.
    assert_eq!(view.attendance_absent, vec!["Luis"]);
    // Ana's present-mark was refunded and her record removed.
    assert_eq!(balance(&db, &ana).await.0, 4);
    assert!(db.attendance_history_for(&ana).await.unwrap().is_empty());
    // Luis's absent mark never touched his balance.
    assert_eq!(balance(&db, &luis).await.0, 2);
}

#[tokio::test]
async fn delete_session_refunds_present_marks() {
    let (_dir, db) = test_db().await;
    let ana = add_student(&db, "Ana", 4).await;
    let luis = add_student(&db, "Luis", 2).await;
    let session = db
        .create_session(
            "2025-03-10",
            "10:00",
            "12:00",
            &["Ana".to_string(), "Luis".to_string()],
        )
        .await
        .unwrap();

    db.update_attendance(&session.id, "Ana", AttendanceMark::Present)
        .await
        .unwrap();
    db.update_attendance(&session.id, "Luis", AttendanceMark::Absent)
        .await
        .unwrap();

    db.delete_session(&session.id).await.unwrap();

    assert_eq!(balance(&db, &ana).await.0, 4);
    assert_eq!(balance(&db, &luis).await.0, 2);
    assert!(db.list_sessions().await.unwrap().is_empty());
    assert!(db.attendance_history_for(&ana).await.unwrap().is_empty());
    assert!(db.attendance_history_for(&luis).await.unwrap().is_empty());
}

#[tokio::test]
async fn renewal_adds_classes_and_clears_flag() {
    let (_dir, db) = test_db().await;
    let ana = add_student(&db, "Ana", 1).await;
    let session = db
        .create_session("2025-03-10", "10:00", "12:00", &["Ana".to_string()])
        .await
        .unwrap();

    db.update_attendance(&session.id, "Ana", AttendanceMark::Present)
        .await
        .unwrap();
    assert_eq!(balance(&db, &ana).await, (0, "needs_renewal".to_string()));

    let renewed = db.renew_student(&ana, 4).await.unwrap();
    assert_eq!(renewed.classes_remaining, 4);
    assert_eq!(renewed.status, "regular");
}
