//! CLI integration tests.
//!
//! These tests run the built binary against temporary store directories.

use mapnote_storage::DatabaseFile;
use mapnote_test_utils::fixtures::{TestDir, SAMPLE_DATABASE};
use std::path::Path;
use std::process::{Command, Output};

/// Run mapnote in `dir`, isolated from the user's configuration.
fn mapnote(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mapnote"))
        .arg("--dir")
        .arg(dir)
        .args(args)
        .env("XDG_CONFIG_HOME", dir.join(".no-global-config"))
        .env_remove("MAPNOTE_CONFIG_CONTENT")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute mapnote")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "mapnote failed with {:?}\nstdout:\n{}\nstderr:\n{}",
        output.status.code(),
        stdout(output),
        stderr(output)
    );
}

#[test]
fn test_help_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_mapnote"))
        .arg("--help")
        .output()
        .expect("Failed to execute mapnote");

    assert_success(&output);
    let stdout = stdout(&output);
    assert!(stdout.contains("Edit campus map documents"));
    assert!(stdout.contains("map-path"));
    assert!(stdout.contains("--dir"));
}

#[test]
fn test_show_empty_store() {
    let dir = TestDir::new().build();
    let output = mapnote(dir.path(), &["show"]);

    assert_success(&output);
    assert!(stdout(&output).contains("Empty document."));
    assert!(!dir.file_exists("database.json"));
}

#[test]
fn test_edit_session_persists() {
    let dir = TestDir::new().build();
    let steps: &[&[&str]] = &[
        &["account", "add", "ada", "--password-hash", "aGFzaA=="],
        &["account", "add", "root", "--developer"],
        &[
            "building", "add", "Hall", "--floor", "1:First:hall/1.svg", "--floor",
            "2:Second:hall/2.svg",
        ],
        &[
            "poi", "add", "Cafe", "--building", "Hall", "--floor", "1", "--layer", "eateries",
            "--x", "-3", "--y", "4",
        ],
        &[
            "poi", "add", "Lab", "--building", "Hall", "--floor", "2", "--layer", "classrooms",
        ],
        &["poi", "favorite", "0", "ada"],
        &["poi", "move", "1", "7", "-8"],
    ];
    for step in steps {
        assert_success(&mapnote(dir.path(), step));
    }

    let snapshot = DatabaseFile::in_dir(dir.path()).read().unwrap().unwrap();
    assert_eq!(snapshot.accounts().len(), 2);
    assert_eq!(snapshot.accounts()[0].password_hash(), b"hash");
    assert!(snapshot.accounts()[1].is_developer());
    assert_eq!(snapshot.pois()[0].location(), (-3, 4));
    assert_eq!(snapshot.pois()[1].location(), (7, -8));
    assert!(snapshot.pois()[0].is_favorite_of(&snapshot.accounts()[0]));

    let output = mapnote(dir.path(), &["show"]);
    assert_success(&output);
    let stdout = stdout(&output);
    assert!(stdout.contains("root (developer)"));
    assert!(stdout.contains("Cafe"));
    assert!(stdout.contains("Eateries"));
    assert!(stdout.contains("Hall/1"));
    assert!(stdout.contains("Hall/2"));
}

#[test]
fn test_unfavorite_and_remove() {
    let dir = TestDir::new().with_database(SAMPLE_DATABASE).build();

    assert_success(&mapnote(dir.path(), &["poi", "unfavorite", "0", "u1"]));
    let snapshot = DatabaseFile::in_dir(dir.path()).read().unwrap().unwrap();
    assert!(snapshot.pois()[0].favorite_of().is_empty());

    assert_success(&mapnote(dir.path(), &["poi", "remove", "0"]));
    let snapshot = DatabaseFile::in_dir(dir.path()).read().unwrap().unwrap();
    assert!(snapshot.pois().is_empty());
}

#[test]
fn test_show_hides_restricted_pois() {
    let dir = TestDir::new().with_database(SAMPLE_DATABASE).build();
    assert_success(&mapnote(dir.path(), &["account", "add", "guest"]));
    assert_success(&mapnote(dir.path(), &["poi", "restrict", "0", "--to", "u1"]));

    let as_guest = stdout(&mapnote(dir.path(), &["show", "--as", "guest"]));
    assert!(!as_guest.contains("Cafe"));

    let as_owner = stdout(&mapnote(dir.path(), &["show", "--as", "u1"]));
    assert!(as_owner.contains("Cafe"));
    assert!(as_owner.contains("[only u1]"));

    assert_success(&mapnote(dir.path(), &["poi", "restrict", "0"]));
    let as_guest = stdout(&mapnote(dir.path(), &["show", "--as", "guest"]));
    assert!(as_guest.contains("Cafe"));
}

#[test]
fn test_add_floor_keeps_poi_on_shared_floor() {
    let dir = TestDir::new().with_database(SAMPLE_DATABASE).build();

    assert_success(&mapnote(dir.path(), &["building", "add-floor", "Hall", "2:Second:hall/2.svg"]));

    let snapshot = DatabaseFile::in_dir(dir.path()).read().unwrap().unwrap();
    let hall = &snapshot.buildings()[0];
    assert_eq!(hall.floors().len(), 2);
    assert!(hall.contains_floor(snapshot.pois()[0].floor()));
}

#[test]
fn test_check_and_map_path() {
    let dir = TestDir::new().with_database(SAMPLE_DATABASE).build();

    let output = mapnote(dir.path(), &["check"]);
    assert_success(&output);
    assert!(stdout(&output).contains("OK: 1 accounts, 1 buildings, 1 POIs"));

    let output = mapnote(dir.path(), &["map-path", "Hall", "1"]);
    assert_success(&output);
    let printed = stdout(&output);
    assert_eq!(Path::new(printed.trim()), dir.path().join("hall").join("1.svg"));
}

#[test]
fn test_check_warns_about_maps_outside_store() {
    let database = SAMPLE_DATABASE.replace("hall/1.svg", "../shared/hall-1.svg");
    let dir = TestDir::new().with_database(database).build();

    let output = mapnote(dir.path(), &["check"]);
    assert_success(&output);
    let report = stdout(&output);
    assert!(report.contains("OK: 1 accounts"));
    assert!(report.contains("warning: map of Hall/1 is outside the store directory"));

    let output = mapnote(dir.path(), &["map-path", "Hall", "1"]);
    let printed = stdout(&output);
    assert_eq!(
        Path::new(printed.trim()),
        dir.path().parent().unwrap().join("shared").join("hall-1.svg")
    );
}

#[test]
fn test_check_is_quiet_for_maps_inside_store() {
    let dir = TestDir::new().with_database(SAMPLE_DATABASE).build();
    let output = mapnote(dir.path(), &["check"]);
    assert!(!stdout(&output).contains("warning"));
}

#[test]
fn test_non_utf8_database_exit_code() {
    let dir = TestDir::new().build();
    dir.write_file("database.json", b"{\xff}");
    let output = mapnote(dir.path(), &["show"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("invalid database"));
}

#[test]
fn test_invalid_database_exit_code() {
    let dir = TestDir::new().with_database("{\"version\": 1").build();
    let output = mapnote(dir.path(), &["check"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("invalid database"));
}

#[test]
fn test_dangling_reference_exit_code() {
    let broken = SAMPLE_DATABASE.replace("\"floor\": 2", "\"floor\": 9");
    let dir = TestDir::new().with_database(broken).build();
    let output = mapnote(dir.path(), &["show"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("reference 9"));
}

#[test]
fn test_missing_directory_exit_code() {
    let dir = TestDir::new().build();
    let output = mapnote(&dir.path().join("missing"), &["show"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_rejected_edit_leaves_database_untouched() {
    let dir = TestDir::new().with_database(SAMPLE_DATABASE).build();

    let output = mapnote(dir.path(), &["account", "add", "u1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Account already exists"));

    let output = mapnote(dir.path(), &["poi", "move", "5", "0", "0"]);
    assert_eq!(output.status.code(), Some(1));

    assert_eq!(dir.read_database(), SAMPLE_DATABASE);
}

#[test]
fn test_config_from_store_directory() {
    let dir = TestDir::new()
        .with_config("{\n  // compact output\n  \"pretty\": false\n}")
        .build();

    let output = mapnote(dir.path(), &["config"]);
    assert_success(&output);
    let stdout = stdout(&output);
    assert!(stdout.contains("mapnote.json"));
    assert!(stdout.contains("\"pretty\": false"));

    assert_success(&mapnote(dir.path(), &["account", "add", "ada"]));
    assert!(!dir.read_database().trim_end().contains('\n'));
}
