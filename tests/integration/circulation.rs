//! Borrow/return lifecycle through the library facade

use libdesk::{
    config::AppConfig, models::MaterialCategory, AppError, Library,
};

use crate::common::{borrower, day, material, RecordingStorage};

fn library() -> Library<RecordingStorage> {
    Library::with_storage(&AppConfig::default(), RecordingStorage::default()).unwrap()
}

#[test]
fn test_late_book_return_adds_one_violation() {
    let mut lib = library();
    let b = lib.register_borrower(borrower("Maria", "Clara")).unwrap();
    lib.add_material(material("B-1", MaterialCategory::Book, 1)).unwrap();

    let t = lib.borrow(&b.id, "B-1", day(0)).unwrap();
    assert_eq!(t.due_date, day(7));
    assert_eq!(lib.find_material("B-1").unwrap().borrowed_copies, 1);

    let outcome = lib.return_loan(&b.id, day(10)).unwrap();
    assert!(outcome.late);
    assert_eq!(outcome.violations, 1);
    assert_eq!(outcome.transaction.return_date, Some(day(10)));
    assert_eq!(lib.find_borrower(&b.id).unwrap().violations, 1);
    assert_eq!(lib.find_material("B-1").unwrap().borrowed_copies, 0);
}

#[test]
fn test_magazine_same_day_return_is_on_time() {
    let mut lib = library();
    let b = lib.register_borrower(borrower("Juan", "Luna")).unwrap();
    lib.add_material(material("M-1", MaterialCategory::Magazine, 2)).unwrap();

    let t = lib.borrow(&b.id, "M-1", day(3)).unwrap();
    assert_eq!(t.due_date, day(3));

    let outcome = lib.return_loan(&b.id, day(3)).unwrap();
    assert!(!outcome.late);
    assert_eq!(lib.find_borrower(&b.id).unwrap().violations, 0);
}

#[test]
fn test_return_on_due_date_is_on_time() {
    let mut lib = library();
    let b = lib.register_borrower(borrower("Gabriela", "Silang")).unwrap();
    lib.add_material(material("J-1", MaterialCategory::Journal, 1)).unwrap();

    let t = lib.borrow(&b.id, "J-1", day(0)).unwrap();
    assert_eq!(t.due_date, day(3));
    assert!(!lib.return_loan(&b.id, day(3)).unwrap().late);
}

#[test]
fn test_three_late_returns_suspend_borrower() {
    let mut lib = library();
    let b = lib.register_borrower(borrower("Emilio", "Aguinaldo")).unwrap();
    lib.add_material(material("T-1", MaterialCategory::Thesis, 1)).unwrap();

    for round in 0..3 {
        let start = round * 10;
        lib.borrow(&b.id, "T-1", day(start)).unwrap();
        assert!(lib.return_loan(&b.id, day(start + 5)).unwrap().late);
    }
    assert_eq!(lib.find_borrower(&b.id).unwrap().violations, 3);

    match lib.borrow(&b.id, "T-1", day(40)) {
        Err(AppError::BorrowerSuspended { violations, .. }) => assert_eq!(violations, 3),
        other => panic!("expected suspension, got {:?}", other),
    }
    assert_eq!(lib.find_material("T-1").unwrap().borrowed_copies, 0);
    assert_eq!(lib.repository().transactions.len(), 3);

    // Administrative reset lifts the suspension
    assert_eq!(lib.reset_violations(&b.id).unwrap(), 3);
    assert!(lib.borrow(&b.id, "T-1", day(40)).is_ok());
}

#[test]
fn test_last_copy_is_exhausted_then_restored() {
    let mut lib = library();
    let first = lib.register_borrower(borrower("Apolinario", "Mabini")).unwrap();
    let second = lib.register_borrower(borrower("Melchora", "Aquino")).unwrap();
    lib.add_material(material("B-2", MaterialCategory::Book, 1)).unwrap();

    lib.borrow(&first.id, "B-2", day(0)).unwrap();
    assert_eq!(lib.find_material("B-2").unwrap().available_copies(), 0);
    assert!(matches!(
        lib.borrow(&second.id, "B-2", day(1)),
        Err(AppError::NoCopiesAvailable(_))
    ));

    lib.return_loan(&first.id, day(2)).unwrap();
    assert_eq!(lib.find_material("B-2").unwrap().available_copies(), 1);
    assert!(lib.borrow(&second.id, "B-2", day(2)).is_ok());
}

#[test]
fn test_one_active_loan_per_borrower() {
    let mut lib = library();
    let b = lib.register_borrower(borrower("Diego", "Silang")).unwrap();
    lib.add_material(material("B-3", MaterialCategory::Book, 5)).unwrap();
    lib.add_material(material("B-4", MaterialCategory::Book, 5)).unwrap();

    lib.borrow(&b.id, "B-3", day(0)).unwrap();
    assert!(matches!(
        lib.borrow(&b.id, "B-4", day(0)),
        Err(AppError::AlreadyHasActiveLoan(_))
    ));
    assert_eq!(lib.find_material("B-4").unwrap().borrowed_copies, 0);
}

#[test]
fn test_multiple_loans_when_enabled() {
    let mut config = AppConfig::default();
    config.circulation.allow_multiple_loans = true;
    let mut lib = Library::with_storage(&config, RecordingStorage::default()).unwrap();
    let b = lib.register_borrower(borrower("Josefa", "Llanes")).unwrap();
    lib.add_material(material("B-5", MaterialCategory::Book, 1)).unwrap();
    lib.add_material(material("J-5", MaterialCategory::Journal, 1)).unwrap();

    lib.borrow(&b.id, "B-5", day(0)).unwrap();
    lib.borrow(&b.id, "J-5", day(1)).unwrap();

    // Returns go in insertion order
    let outcome = lib.return_loan(&b.id, day(2)).unwrap();
    assert_eq!(outcome.transaction.material_id, "B-5");
    let outcome = lib.return_loan(&b.id, day(10)).unwrap();
    assert_eq!(outcome.transaction.material_id, "J-5");
    assert!(outcome.late);
}

#[test]
fn test_delete_borrower_with_active_loan_is_refused() {
    let mut lib = library();
    let b = lib.register_borrower(borrower("Teresa", "Magbanua")).unwrap();
    lib.add_material(material("B-6", MaterialCategory::Book, 1)).unwrap();
    lib.borrow(&b.id, "B-6", day(0)).unwrap();

    assert!(matches!(
        lib.delete_borrower(&b.id),
        Err(AppError::HasActiveLoans(_))
    ));
    assert!(lib.find_borrower(&b.id).is_ok());
    assert!(matches!(
        lib.delete_material("B-6"),
        Err(AppError::HasActiveLoans(_))
    ));

    lib.return_loan(&b.id, day(1)).unwrap();
    lib.delete_borrower(&b.id).unwrap();
    assert!(matches!(
        lib.find_borrower(&b.id),
        Err(AppError::BorrowerNotFound(_))
    ));

    // History outlives the borrower and shows the raw ID
    let history = lib.borrower_history(&b.id, day(2)).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].borrower, b.id);
}

#[test]
fn test_overdue_report() {
    let mut lib = library();
    let late = lib.register_borrower(borrower("Marcelo", "Del Pilar")).unwrap();
    let fine = lib.register_borrower(borrower("Graciano", "Lopez")).unwrap();
    lib.add_material(material("B-7", MaterialCategory::Book, 2)).unwrap();

    lib.borrow(&late.id, "B-7", day(0)).unwrap();
    lib.borrow(&fine.id, "B-7", day(5)).unwrap();

    let overdue = lib.overdue_loans(day(9));
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].transaction.borrower_id, late.id);
    assert!(overdue[0].is_overdue);
    assert!(lib.overdue_loans(day(7)).is_empty());
}

#[test]
fn test_ids_are_sequential_from_base() {
    let mut lib = library();
    let first = lib.register_borrower(borrower("Ana", "Reyes")).unwrap();
    let second = lib.register_borrower(borrower("Ben", "Reyes")).unwrap();
    assert_eq!(first.id, "2025000");
    assert_eq!(second.id, "2025001");

    assert!(matches!(
        lib.register_borrower(borrower("ANA", "reyes")),
        Err(AppError::DuplicateBorrower(_))
    ));
}

#[test]
fn test_every_mutation_is_saved() {
    let mut lib = library();
    let b = lib.register_borrower(borrower("Leona", "Florentino")).unwrap();
    lib.add_material(material("B-8", MaterialCategory::Book, 1)).unwrap();
    let t = lib.borrow(&b.id, "B-8", day(0)).unwrap();

    let storage = lib.storage();
    assert!(storage.text("borrowers").starts_with("2025000|Leona||Florentino|F|1990-05-17|"));
    assert_eq!(
        storage.text("materials"),
        "BOOK|B-8|Title of B-8|Some Author|2001|1|1\n"
    );
    assert_eq!(
        storage.text("transactions"),
        format!("{}|2025000|B-8|2025-06-01|2025-06-08|false|\n", t.id)
    );
}
