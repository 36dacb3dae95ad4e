//! Command dispatcher: parse, validate, run and render

use clap::Parser;
use libdesk::{
    commands::{self, Cli, Response},
    config::AppConfig,
    error::ErrorCode,
    AppError, AppResult, Library,
};

use crate::common::{day, RecordingStorage};

fn exec(lib: &mut Library<RecordingStorage>, args: &[&str]) -> AppResult<Response> {
    let mut argv = vec!["libdesk"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    commands::run(cli.command, lib, cli.date.unwrap_or(day(0)))
}

fn library() -> Library<RecordingStorage> {
    Library::with_storage(&AppConfig::default(), RecordingStorage::default()).unwrap()
}

fn add_borrower(lib: &mut Library<RecordingStorage>) -> Response {
    exec(
        lib,
        &[
            "borrower", "add", "--first-name", "Andres", "--last-name", "Bonifacio",
            "--gender", "m", "--birthday", "1863-11-30", "--contact-number", "0287654321",
            "--email", "andres@example.com", "--address", "Tondo, Manila",
        ],
    )
    .unwrap()
}

#[test]
fn test_borrow_and_return_messages() {
    let mut lib = library();
    let added = add_borrower(&mut lib);
    assert_eq!(added.render(false), "Borrower added with ID 2025000.");

    exec(
        &mut lib,
        &[
            "material", "add", "--id", "B-1", "--category", "book", "--title", "Noli",
            "--author", "Jose Rizal", "--year", "1887", "--copies", "1",
        ],
    )
    .unwrap();

    let borrowed = exec(&mut lib, &["borrow", "2025000", "B-1", "--date", "2025-06-01"]).unwrap();
    assert_eq!(borrowed.render(false), "Borrow successful. Due date: 2025-06-08");

    let returned = exec(&mut lib, &["return", "2025000", "--date", "2025-06-11"]).unwrap();
    assert_eq!(
        returned.render(false),
        "Material returned late. Borrower receives 1 strike. Total strikes: 1"
    );
    assert_eq!(returned.data["late"], true);
    assert_eq!(returned.data["violations"], 1);

    let history = exec(&mut lib, &["history", "borrower", "2025000"]).unwrap();
    assert_eq!(history.lines.len(), 1);
    assert!(history.lines[0].contains("Noli by Jose Rizal"));
    assert!(history.lines[0].contains("ReturnedDate: 2025-06-11"));
}

#[test]
fn test_invalid_fields_are_rejected_before_the_core() {
    let mut lib = library();
    let err = exec(
        &mut lib,
        &[
            "borrower", "add", "--first-name", "R2D2", "--last-name", "Droid", "--gender",
            "F", "--birthday", "2000-01-01", "--contact-number", "12ab", "--email",
            "not-an-email", "--address", "Tatooine",
        ],
    )
    .unwrap_err();

    assert_eq!(err.code(), ErrorCode::BadValue);
    let message = err.to_string();
    assert!(message.contains("first_name"));
    assert!(message.contains("contact_number"));
    assert!(message.contains("email"));
    assert!(lib.repository().borrowers.is_empty());
}

#[test]
fn test_edit_requires_a_field() {
    let mut lib = library();
    add_borrower(&mut lib);

    assert!(matches!(
        exec(&mut lib, &["borrower", "edit", "2025000"]),
        Err(AppError::Validation(_))
    ));

    let edited = exec(
        &mut lib,
        &["borrower", "edit", "2025000", "--middle-name", "", "--address", "Caloocan"],
    )
    .unwrap();
    assert_eq!(edited.data["address"], "Caloocan");
    assert_eq!(edited.data["middle_name"], "");
}

#[test]
fn test_not_found_maps_to_exit_code() {
    let mut lib = library();
    let err = exec(&mut lib, &["borrow", "2025999", "B-1"]).unwrap_err();
    assert_eq!(err.to_string(), "Borrower 2025999 not found");
    assert_eq!(err.exit_code(), ErrorCode::NotFound as i32);
}

#[test]
fn test_check_and_overdue_reports() {
    let mut lib = library();
    let check = exec(&mut lib, &["check"]).unwrap();
    assert_eq!(check.status, 0);
    assert_eq!(check.render(false), "No inconsistencies found.");

    let overdue = exec(&mut lib, &["overdue", "--json"]).unwrap();
    assert_eq!(overdue.render(true), "[]");
    assert_eq!(overdue.render(false), "No overdue loans.");
}

#[test]
fn test_category_outside_known_set_is_refused() {
    for category in ["atlas", "Other", "thesisbook-extra"] {
        let err = Cli::try_parse_from([
            "libdesk", "material", "add", "--id", "A-1", "--category", category, "--title",
            "World Atlas", "--year", "2001", "--copies", "1",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Invalid category"), "{}", err);
    }
}

#[test]
fn test_blank_name_is_refused() {
    let mut lib = library();
    let err = exec(
        &mut lib,
        &[
            "borrower", "add", "--first-name", "   ", "--last-name", "Bonifacio", "--gender",
            "M", "--birthday", "1863-11-30", "--contact-number", "0287654321", "--email",
            "andres@example.com", "--address", "Tondo, Manila",
        ],
    )
    .unwrap_err();

    assert_eq!(err.code(), ErrorCode::BadValue);
    assert!(err.to_string().contains("first_name"));
    assert!(lib.repository().borrowers.is_empty());
}
