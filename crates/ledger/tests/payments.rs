use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use ledger::{
    FeeStatus, Ledger, LedgerError, PaymentKind, PaymentMethod, PaymentStatus, RecordPaymentCmd,
    SubjectKind,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder().database(db.clone()).build();
    (ledger, db)
}

fn fee_payment(intern_id: Uuid, amount_minor: i64, status: PaymentStatus) -> RecordPaymentCmd {
    RecordPaymentCmd {
        subject_kind: SubjectKind::Intern,
        subject_id: Some(intern_id),
        amount_minor,
        paid_on: None,
        method: PaymentMethod::Upi,
        reference: None,
        status,
        kind: PaymentKind::InternshipFee,
    }
}

fn milestone_payment(project_id: Uuid, amount_minor: i64) -> RecordPaymentCmd {
    RecordPaymentCmd {
        subject_kind: SubjectKind::Project,
        subject_id: Some(project_id),
        amount_minor,
        paid_on: None,
        method: PaymentMethod::BankTransfer,
        reference: Some("milestone".to_string()),
        status: PaymentStatus::Completed,
        kind: PaymentKind::ProjectMilestone,
    }
}

async fn payment_count(db: &DatabaseConnection) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS count FROM payments",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "count").unwrap()
}

#[tokio::test]
async fn partial_then_paid_then_partial_again_on_delete() {
    let (ledger, _db) = ledger_with_db().await;

    let intern_id = ledger
        .enroll_intern("Asha Nair", "Web Development", 4000)
        .await
        .unwrap();

    let first = ledger
        .record_payment(fee_payment(intern_id, 2000, PaymentStatus::Completed))
        .await
        .unwrap();

    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.paid_fee_minor, 2000);
    assert_eq!(intern.fee_status, FeeStatus::Partial);

    ledger
        .record_payment(fee_payment(intern_id, 2000, PaymentStatus::Completed))
        .await
        .unwrap();

    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.paid_fee_minor, 4000);
    assert_eq!(intern.fee_status, FeeStatus::Paid);

    ledger.delete_payment(first).await.unwrap();

    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.paid_fee_minor, 2000);
    assert_eq!(intern.fee_status, FeeStatus::Partial);
}

#[tokio::test]
async fn negative_amount_fails_and_writes_nothing() {
    let (ledger, db) = ledger_with_db().await;

    let intern_id = ledger
        .enroll_intern("Asha Nair", "Web Development", 4000)
        .await
        .unwrap();

    let err = ledger
        .record_payment(fee_payment(intern_id, -5, PaymentStatus::Completed))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InvalidAmount("amount_minor must be > 0".to_string())
    );
    assert_eq!(payment_count(&db).await, 0);

    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.paid_fee_minor, 0);
    assert_eq!(intern.fee_status, FeeStatus::Unpaid);
}

#[tokio::test]
async fn unknown_subject_fails_and_writes_nothing() {
    let (ledger, db) = ledger_with_db().await;

    let err = ledger
        .record_payment(fee_payment(Uuid::new_v4(), 1000, PaymentStatus::Completed))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(payment_count(&db).await, 0);
}

#[tokio::test]
async fn pending_and_failed_payments_do_not_count() {
    let (ledger, _db) = ledger_with_db().await;

    let intern_id = ledger
        .enroll_intern("Ravi Kumar", "Data Science", 5000)
        .await
        .unwrap();

    ledger
        .record_payment(fee_payment(intern_id, 1000, PaymentStatus::Pending))
        .await
        .unwrap();
    ledger
        .record_payment(fee_payment(intern_id, 1000, PaymentStatus::Failed))
        .await
        .unwrap();

    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.paid_fee_minor, 0);
    assert_eq!(intern.fee_status, FeeStatus::Unpaid);

    ledger
        .record_payment(fee_payment(intern_id, 1000, PaymentStatus::Completed))
        .await
        .unwrap();
    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.paid_fee_minor, 1000);
    assert_eq!(intern.fee_status, FeeStatus::Partial);
}

#[tokio::test]
async fn unlinked_payment_touches_no_entity() {
    let (ledger, db) = ledger_with_db().await;

    let intern_id = ledger
        .enroll_intern("Asha Nair", "Web Development", 4000)
        .await
        .unwrap();

    ledger
        .record_payment(RecordPaymentCmd {
            subject_kind: SubjectKind::Unlinked,
            subject_id: None,
            amount_minor: 750,
            paid_on: None,
            method: PaymentMethod::Cash,
            reference: Some("walk-in enquiry".to_string()),
            status: PaymentStatus::Completed,
            kind: PaymentKind::InternshipFee,
        })
        .await
        .unwrap();

    assert_eq!(payment_count(&db).await, 1);
    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.paid_fee_minor, 0);
}

#[tokio::test]
async fn delete_missing_payment_fails() {
    let (ledger, _db) = ledger_with_db().await;

    let err = ledger.delete_payment(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(
        err,
        LedgerError::KeyNotFound("payment not exists".to_string())
    );
}

#[tokio::test]
async fn summary_equals_completed_ledger_sum_after_mixed_sequence() {
    let (ledger, _db) = ledger_with_db().await;

    let project_id = ledger
        .create_project("CRM revamp", "Acme Infotech", 50_000)
        .await
        .unwrap();

    let first = ledger
        .record_payment(milestone_payment(project_id, 10_000))
        .await
        .unwrap();
    ledger
        .record_payment(milestone_payment(project_id, 15_000))
        .await
        .unwrap();
    ledger
        .record_payment(RecordPaymentCmd {
            status: PaymentStatus::Pending,
            ..milestone_payment(project_id, 9_999)
        })
        .await
        .unwrap();
    ledger.delete_payment(first).await.unwrap();

    let project = ledger.project(project_id).await.unwrap();
    assert_eq!(project.paid_amount_minor, 15_000);

    let completed_sum: i64 = ledger
        .payments_for_subject(SubjectKind::Project, project_id)
        .await
        .unwrap()
        .iter()
        .filter(|p| p.status == PaymentStatus::Completed)
        .map(|p| p.amount_minor)
        .sum();
    assert_eq!(project.paid_amount_minor, completed_sum);
}

#[tokio::test]
async fn synchronize_is_idempotent() {
    let (ledger, _db) = ledger_with_db().await;

    let intern_id = ledger
        .enroll_intern("Ravi Kumar", "Data Science", 5000)
        .await
        .unwrap();
    ledger
        .record_payment(fee_payment(intern_id, 2500, PaymentStatus::Completed))
        .await
        .unwrap();

    let total_first = ledger
        .synchronize(SubjectKind::Intern, intern_id)
        .await
        .unwrap();
    let after_first = ledger.intern(intern_id).await.unwrap();

    let total_second = ledger
        .synchronize(SubjectKind::Intern, intern_id)
        .await
        .unwrap();
    let after_second = ledger.intern(intern_id).await.unwrap();

    assert_eq!(total_first, total_second);
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn synchronize_restores_corrupted_summary() {
    let (ledger, db) = ledger_with_db().await;
    let backend = db.get_database_backend();

    let intern_id = ledger
        .enroll_intern("Asha Nair", "Web Development", 4000)
        .await
        .unwrap();
    ledger
        .record_payment(fee_payment(intern_id, 3000, PaymentStatus::Completed))
        .await
        .unwrap();

    // Corrupt the denormalized summary directly in the DB.
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE interns SET paid_fee_minor = ?, fee_status = ? WHERE id = ?;",
        vec![999i64.into(), "paid".into(), intern_id.to_string().into()],
    ))
    .await
    .unwrap();

    ledger
        .synchronize(SubjectKind::Intern, intern_id)
        .await
        .unwrap();

    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.paid_fee_minor, 3000);
    assert_eq!(intern.fee_status, FeeStatus::Partial);
}

#[tokio::test]
async fn raising_the_fee_downgrades_status() {
    let (ledger, _db) = ledger_with_db().await;

    let intern_id = ledger
        .enroll_intern("Asha Nair", "Web Development", 2000)
        .await
        .unwrap();
    ledger
        .record_payment(fee_payment(intern_id, 2000, PaymentStatus::Completed))
        .await
        .unwrap();

    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.fee_status, FeeStatus::Paid);

    ledger
        .update_intern(
            intern_id,
            ledger::InternPatch {
                total_fee_minor: Some(4000),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.total_fee_minor, 4000);
    assert_eq!(intern.paid_fee_minor, 2000);
    assert_eq!(intern.fee_status, FeeStatus::Partial);
}

#[tokio::test]
async fn delete_succeeds_when_subject_vanished() {
    let (ledger, db) = ledger_with_db().await;
    let backend = db.get_database_backend();

    let intern_id = ledger
        .enroll_intern("Asha Nair", "Web Development", 4000)
        .await
        .unwrap();
    let payment_id = ledger
        .record_payment(fee_payment(intern_id, 1000, PaymentStatus::Completed))
        .await
        .unwrap();

    // Simulate an entity hard-deleted outside the ledger.
    db.execute(Statement::from_sql_and_values(
        backend,
        "DELETE FROM interns WHERE id = ?;",
        vec![intern_id.to_string().into()],
    ))
    .await
    .unwrap();

    ledger.delete_payment(payment_id).await.unwrap();
    assert_eq!(payment_count(&db).await, 0);
}

#[tokio::test]
async fn resync_all_heals_every_stale_summary() {
    let (ledger, db) = ledger_with_db().await;
    let backend = db.get_database_backend();

    let intern_id = ledger
        .enroll_intern("Asha Nair", "Web Development", 4000)
        .await
        .unwrap();
    let project_id = ledger
        .create_project("CRM revamp", "Acme Infotech", 50_000)
        .await
        .unwrap();
    ledger
        .record_payment(fee_payment(intern_id, 4000, PaymentStatus::Completed))
        .await
        .unwrap();
    ledger
        .record_payment(milestone_payment(project_id, 20_000))
        .await
        .unwrap();

    db.execute(Statement::from_string(
        backend,
        "UPDATE interns SET paid_fee_minor = 1, fee_status = 'unpaid';",
    ))
    .await
    .unwrap();
    db.execute(Statement::from_string(
        backend,
        "UPDATE projects SET paid_amount_minor = 1;",
    ))
    .await
    .unwrap();

    let report = ledger.resync_all().await.unwrap();
    assert_eq!(report.interns_synced, 1);
    assert_eq!(report.projects_synced, 1);
    assert_eq!(report.failures, 0);

    let intern = ledger.intern(intern_id).await.unwrap();
    assert_eq!(intern.paid_fee_minor, 4000);
    assert_eq!(intern.fee_status, FeeStatus::Paid);
    let project = ledger.project(project_id).await.unwrap();
    assert_eq!(project.paid_amount_minor, 20_000);
}
