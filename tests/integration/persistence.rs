//! On-disk behaviour: backing files, reopen and tolerance of bad records

use std::fs;

use libdesk::{
    models::{MaterialCategory, UpdateBorrower},
    repository::IntegrityIssue,
    Library,
};

use crate::common::{borrower, day, material, temp_config};

#[test]
fn test_open_creates_missing_files() {
    let config = temp_config();
    let lib = Library::open(&config).unwrap();

    assert!(lib.repository().borrowers.is_empty());
    for path in [
        config.storage.borrowers_path(),
        config.storage.materials_path(),
        config.storage.transactions_path(),
    ] {
        assert!(path.exists(), "{} was not created", path.display());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    fs::remove_dir_all(&config.storage.data_dir).unwrap();
}

#[test]
fn test_state_survives_reopen() {
    let config = temp_config();
    let (borrower_id, transaction_id) = {
        let mut lib = Library::open(&config).unwrap();
        let mut request = borrower("Lapu", "Lapu");
        request.address = "Sitio 3 | Mactan\nCebu, \"Old Town\"".to_string();
        request.middle_name = Some("D'Mactan".to_string());
        let b = lib.register_borrower(request).unwrap();

        let mut book = material("B-1", MaterialCategory::Book, 2);
        book.title = "Pipes | Newlines\nand \"Quotes\"".to_string();
        lib.add_material(book).unwrap();

        let t = lib.borrow(&b.id, "B-1", day(0)).unwrap();
        (b.id, t.id)
    };

    let mut lib = Library::open(&config).unwrap();
    let b = lib.find_borrower(&borrower_id).unwrap();
    assert_eq!(b.address, "Sitio 3 | Mactan\nCebu, \"Old Town\"");
    assert_eq!(b.middle_name, "D'Mactan");
    let m = lib.find_material("B-1").unwrap();
    assert_eq!(m.title, "Pipes | Newlines\nand \"Quotes\"");
    assert_eq!(m.borrowed_copies, 1);

    let active = lib.repository().active_loan_for(&borrower_id).unwrap();
    assert_eq!(active.id, transaction_id);
    assert!(lib.check_integrity().is_empty());

    // The reloaded loan can be returned and that is saved too
    let outcome = lib.return_loan(&borrower_id, day(8)).unwrap();
    assert!(outcome.late);

    let lib = Library::open(&config).unwrap();
    assert_eq!(lib.find_borrower(&borrower_id).unwrap().violations, 1);
    assert_eq!(lib.find_material("B-1").unwrap().borrowed_copies, 0);
    assert!(lib.repository().active_loan_for(&borrower_id).is_none());
    assert_eq!(lib.repository().transactions.len(), 1);

    fs::remove_dir_all(&config.storage.data_dir).unwrap();
}

#[test]
fn test_edits_are_persisted() {
    let config = temp_config();
    {
        let mut lib = Library::open(&config).unwrap();
        let b = lib.register_borrower(borrower("Sultan", "Kudarat")).unwrap();
        lib.update_borrower(
            &b.id,
            UpdateBorrower {
                contact_number: Some("0288887777".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    }

    let lib = Library::open(&config).unwrap();
    assert_eq!(
        lib.find_borrower("2025000").unwrap().contact_number,
        "0288887777"
    );

    fs::remove_dir_all(&config.storage.data_dir).unwrap();
}

#[test]
fn test_malformed_lines_are_skipped_on_load() {
    let config = temp_config();
    fs::create_dir_all(&config.storage.data_dir).unwrap();
    fs::write(
        config.storage.materials_path(),
        "BOOK|B-1|Noli Me Tangere|Jose Rizal|1887|3|0\n\
         garbage line\n\
         ATLAS|A-1|World Atlas||2001|1|0\n",
    )
    .unwrap();

    let lib = Library::open(&config).unwrap();
    assert_eq!(lib.repository().materials.len(), 2);
    let atlas = lib.find_material("A-1").unwrap();
    assert_eq!(atlas.category, MaterialCategory::Other("ATLAS".to_string()));
    assert_eq!(lib.services().loans.policy().loan_days(&atlas.category), 7);

    fs::remove_dir_all(&config.storage.data_dir).unwrap();
}

#[test]
fn test_integrity_issues_are_reported() {
    let config = temp_config();
    fs::create_dir_all(&config.storage.data_dir).unwrap();
    fs::write(
        config.storage.materials_path(),
        "BOOK|B-1|Noli Me Tangere|Jose Rizal|1887|3|2\n",
    )
    .unwrap();
    fs::write(
        config.storage.transactions_path(),
        "tx-1|2025009|B-1|2025-06-01|2025-06-08|false|\n",
    )
    .unwrap();

    let lib = Library::open(&config).unwrap();
    let issues = lib.check_integrity();
    assert_eq!(
        issues,
        vec![
            IntegrityIssue::DanglingBorrower {
                transaction_id: "tx-1".to_string(),
                borrower_id: "2025009".to_string(),
            },
            IntegrityIssue::CopyCountMismatch {
                material_id: "B-1".to_string(),
                recorded: 2,
                active: 1,
            },
        ]
    );

    fs::remove_dir_all(&config.storage.data_dir).unwrap();
}
