use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bookkeeper(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bookkeeper").unwrap();
    cmd.env("BOOKKEEPER_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn initialized() -> TempDir {
    let data_dir = TempDir::new().unwrap();
    bookkeeper(&data_dir).arg("init").assert().success();
    data_dir
}

#[test]
fn init_creates_default_categories() {
    let data_dir = TempDir::new().unwrap();

    bookkeeper(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"))
        .stdout(predicate::str::contains("raw meat"));

    assert!(data_dir.path().join("config.json").exists());
    assert!(data_dir.path().join("data").join("bookkeeper.db").exists());

    bookkeeper(&data_dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("food\n├── meat\n"));
}

#[test]
fn config_shows_paths() {
    let data_dir = TempDir::new().unwrap();
    bookkeeper(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookkeeper.db"))
        .stdout(predicate::str::contains("Default period:  month"));
}

#[test]
fn category_add_show_and_move() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["category", "add", "beef", "--parent", "raw meat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created category 'beef' under 'raw meat'"));

    bookkeeper(&data_dir)
        .args(["category", "show", "beef"])
        .assert()
        .success()
        .stdout(predicate::str::contains("food / meat / raw meat / beef"));

    bookkeeper(&data_dir)
        .args(["category", "move", "meat", "--to", "beef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below its own subcategory"));

    bookkeeper(&data_dir)
        .args(["category", "move", "beef"])
        .assert()
        .success()
        .stdout(predicate::str::contains("to the top level"));
}

#[test]
fn category_show_after_parent_deleted() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["category", "delete", "food"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 subcategories"))
        .stderr(predicate::str::is_empty());

    bookkeeper(&data_dir)
        .args(["category", "show", "meat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Path:   ? / meat"))
        .stdout(predicate::str::contains("Parent: (deleted, pk 1)"))
        .stdout(predicate::str::contains("- raw meat"));

    bookkeeper(&data_dir)
        .args(["category", "show", "raw meat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Path:   ? / meat / raw meat"));
}

#[test]
fn bad_date_format_is_config_error() {
    let data_dir = initialized();
    std::fs::write(
        data_dir.path().join("config.json"),
        r#"{"date_format": "%Y-%Q"}"#,
    )
    .unwrap();

    bookkeeper(&data_dir)
        .args(["expense", "add", "5", "books"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("date_format"));
}

#[test]
fn category_add_duplicate_fails() {
    let data_dir = initialized();
    bookkeeper(&data_dir)
        .args(["category", "add", "books"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn category_import_from_file() {
    let data_dir = initialized();
    let tree = data_dir.path().join("tree.txt");
    std::fs::write(&tree, "transport\n  bus\n  taxi\nhealth\n").unwrap();

    bookkeeper(&data_dir)
        .args(["category", "import"])
        .arg(&tree)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 4 categories"));

    bookkeeper(&data_dir)
        .args(["category", "show", "taxi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parent: transport"));
}

#[test]
fn category_import_bad_indentation_fails() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["category", "import", "-"])
        .write_stdin("a\n    b\n  c\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));

    bookkeeper(&data_dir)
        .args(["category", "list", "--flat"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" a ").not());
}

#[test]
fn expense_total_for_period() {
    let data_dir = initialized();

    for (amount, date) in [("5", "2024-04-01"), ("10.50", "2024-04-03 12:30"), ("99", "2024-05-01")] {
        bookkeeper(&data_dir)
            .args(["expense", "add", amount, "sweets", "--date", date])
            .assert()
            .success();
    }

    bookkeeper(&data_dir)
        .args(["expense", "total", "--period", "month", "--date", "2024-04-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$15.50"));

    bookkeeper(&data_dir)
        .args(["expense", "total", "--period", "day", "--date", "2024-04-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$0.00"));

    bookkeeper(&data_dir)
        .args(["expense", "list", "--category", "sweets", "--period", "week", "--date", "2024-04-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-04-03 12:30"))
        .stdout(predicate::str::contains("2024-05-01").not());
}

#[test]
fn expense_unknown_category_fails() {
    let data_dir = initialized();
    bookkeeper(&data_dir)
        .args(["expense", "add", "5", "spaceships"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Category not found: spaceships"));
}

#[test]
fn expense_delete_missing_fails() {
    let data_dir = initialized();
    bookkeeper(&data_dir)
        .args(["expense", "delete", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn budget_set_and_list() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["budget", "set", "day", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("day budget set to $20.00"));

    bookkeeper(&data_dir)
        .args(["expense", "add", "25", "books", "--date", "2024-04-03"])
        .assert()
        .success();

    bookkeeper(&data_dir)
        .args(["budget", "list", "--date", "2024-04-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$7000.00"))
        .stdout(predicate::str::contains("-$5.00"))
        .stdout(predicate::str::contains("OVER"));

    bookkeeper(&data_dir)
        .args(["budget", "delete", "week"])
        .assert()
        .success();

    bookkeeper(&data_dir)
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$7000.00").not());
}

#[test]
fn budget_unknown_period_rejected() {
    let data_dir = initialized();
    bookkeeper(&data_dir)
        .args(["budget", "set", "fortnight", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown period type"));
}
