use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("strz").unwrap()
}

fn write_answers(dir: &Path, name: &str, json: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, json).unwrap();
    path.display().to_string()
}

fn init_workspace(temp_dir: &TempDir) {
    let answers = write_answers(
        temp_dir.path(),
        "init.json",
        r#"{ "workspaceName": "Bank", "workspaceDescription": "Online banking", "workspaceAuthor": "Ada" }"#,
    );
    cmd()
        .args(["init", "--answers", &answers, "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(contains("Created"))
        .stdout(contains("/workspace.dsl"));
}

#[test]
fn init_creates_workspace_tree() {
    let temp_dir = TempDir::new().unwrap();
    init_workspace(&temp_dir);

    let root = temp_dir.path().join("architecture");
    let workspace = fs::read_to_string(root.join("workspace.dsl")).unwrap();
    assert!(workspace.starts_with("workspace \"Bank\" \"Online banking\" {"));
    assert!(workspace.contains("scope landscape"));
    assert!(root.join(".gitignore").exists());
    assert!(
        fs::read_to_string(root.join("README.md"))
            .unwrap()
            .contains("Maintained by Ada.")
    );
}

#[test]
fn init_twice_skips() {
    let temp_dir = TempDir::new().unwrap();
    init_workspace(&temp_dir);

    let answers = write_answers(temp_dir.path(), "again.json", r#"{ "workspaceName": "Other" }"#);
    cmd()
        .args(["init", "--answers", &answers, "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(contains("workspace already exists"));

    let workspace = fs::read_to_string(temp_dir.path().join("architecture/workspace.dsl")).unwrap();
    assert!(workspace.contains("\"Bank\""));
}

#[test]
fn person_and_system_are_included() {
    let temp_dir = TempDir::new().unwrap();
    init_workspace(&temp_dir);

    let person = write_answers(
        temp_dir.path(),
        "person.json",
        r#"{ "personName": "Customer", "personDescription": "A bank customer" }"#,
    );
    cmd()
        .args(["person", "--answers", &person, "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(contains("Created model/people/customer.dsl"));

    let system = write_answers(
        temp_dir.path(),
        "system.json",
        r#"{ "systemName": "Internet Banking", "systemDescription": "Lets customers bank online" }"#,
    );
    cmd()
        .args(["system", "--answers", &system, "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .success();

    let root = temp_dir.path().join("architecture");
    assert_eq!(
        fs::read_to_string(root.join("model/people/customer.dsl")).unwrap(),
        "Customer = person \"Customer\" \"A bank customer\"\n"
    );
    assert!(
        fs::read_to_string(root.join("model/systems/internet-banking.dsl"))
            .unwrap()
            .contains("# containers")
    );
    assert!(
        fs::read_to_string(root.join("views/internet-banking-context.dsl"))
            .unwrap()
            .starts_with("systemContext InternetBanking \"InternetBanking-Context\"")
    );

    let workspace = fs::read_to_string(root.join("workspace.dsl")).unwrap();
    assert!(workspace.contains("        # people\n        !include model/people/customer.dsl\n"));
    assert!(workspace.contains("        # systems\n        !include model/systems/internet-banking.dsl\n"));
    assert!(workspace.contains("        # views\n        !include views/internet-banking-context.dsl\n"));
}

#[test]
fn container_goes_into_system_file() {
    let temp_dir = TempDir::new().unwrap();
    init_workspace(&temp_dir);

    let system = write_answers(temp_dir.path(), "system.json", r#"{ "systemName": "Payments" }"#);
    cmd()
        .args(["system", "--answers", &system, "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .success();

    let container = write_answers(
        temp_dir.path(),
        "container.json",
        r#"{ "systemName": "payments", "containerName": "Ledger Api", "containerTechnology": "Rust" }"#,
    );
    cmd()
        .args(["container", "--answers", &container, "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .success();

    let root = temp_dir.path().join("architecture");
    assert_eq!(
        fs::read_to_string(root.join("model/systems/payments.dsl")).unwrap(),
        "Payments = softwareSystem \"Payments\" \"\" {\n    # containers\n    !include payments/ledger-api.dsl\n}\n"
    );
    assert!(
        fs::read_to_string(root.join("model/systems/payments/ledger-api.dsl"))
            .unwrap()
            .starts_with("LedgerApi = container \"Ledger Api\" \"\" \"Rust\" {")
    );
}

#[test]
fn dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    init_workspace(&temp_dir);

    let person = write_answers(temp_dir.path(), "person.json", r#"{ "personName": "Clerk" }"#);
    cmd()
        .args(["person", "--dry-run", "--answers", &person, "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(contains("Dry run"));

    assert!(!temp_dir.path().join("architecture/model/people/clerk.dsl").exists());
}

#[test]
fn end_of_input_aborts() {
    let temp_dir = TempDir::new().unwrap();
    init_workspace(&temp_dir);

    cmd()
        .arg("person")
        .arg("--cwd")
        .arg(temp_dir.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(contains("Aborted"));
}

#[test]
fn generators_require_a_workspace() {
    let temp_dir = TempDir::new().unwrap();
    let person = write_answers(temp_dir.path(), "person.json", r#"{ "personName": "Clerk" }"#);

    cmd()
        .args(["person", "--answers", &person, "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(contains("strz init"));
}

#[test]
fn list_prints_snapshot_elements() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("workspace.dsl"), "workspace {}").unwrap();
    fs::write(
        temp_dir.path().join("workspace.json"),
        r#"{
            "name": "Bank",
            "model": {
                "people": [{ "name": "Customer", "tags": "Element,Person" }],
                "softwareSystems": [{
                    "name": "Internet Banking",
                    "tags": "Element,Software System",
                    "containers": [{ "name": "Api", "tags": "Element,Container" }]
                }]
            }
        }"#,
    )
    .unwrap();

    cmd()
        .args(["list", "--containers", "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(contains("[P]  Customer"))
        .stdout(contains("[C]  Api  (Internet Banking)"))
        .stdout(contains("3 element(s)"));
}

#[test]
fn list_reports_corrupt_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("workspace.dsl"), "workspace {}").unwrap();
    fs::write(temp_dir.path().join("workspace.json"), "{ broken").unwrap();

    cmd()
        .args(["list", "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(contains("Failed to parse workspace snapshot"));
}

#[test]
fn workspace_folder_from_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".strz.json"),
        r#"{ "workspaceFolder": "docs/c4" }"#,
    )
    .unwrap();
    init_workspace(&temp_dir);

    let person = write_answers(temp_dir.path(), "person.json", r#"{ "personName": "Clerk" }"#);
    cmd()
        .args(["person", "--answers", &person, "--cwd"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(contains("Created model/people/clerk.dsl"));

    assert!(temp_dir.path().join("docs/c4/model/people/clerk.dsl").exists());
}
