//! Integration tests for the heritage CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("heritage").unwrap();
    cmd.arg("--no-color");
    cmd
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// One violating controller and one base controller
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "Web/Controllers/FooController.cs",
        "class FooController : IFoo { }\n",
    );
    write(
        temp_dir.path(),
        "Web/Controllers/_BaseController.cs",
        "class _BaseController : Controller { }\n",
    );
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("fix"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_check_reports_violation() {
    let project = create_test_project();

    cli()
        .arg("check")
        .arg(project.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "FooController does not inherit from a valid base Controller.",
        ))
        .stdout(predicate::str::contains("FooController.cs:1:7"))
        .stdout(predicate::str::contains("fix: Inherit from _BaseController"))
        .stdout(predicate::str::contains("Errors: 1"));
}

#[test]
fn test_check_clean_project() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "Web/ApiControllers/UsersController.cs",
        "public class UsersController : _BaseApiController { }\n",
    );
    write(
        temp_dir.path(),
        "Web/ApiControllers/_BaseApiController.cs",
        "public class _BaseApiController : ApiController { }\n",
    );

    cli()
        .arg("check")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_check_json_output() {
    let project = create_test_project();

    let output = cli()
        .args(["check", "--format", "json"])
        .arg(project.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let diagnostic = &json["diagnostics"][0];
    assert_eq!(diagnostic["rule_id"], "ControllerInheritance");
    assert_eq!(diagnostic["severity"], "error");
    assert_eq!(diagnostic["arguments"][1], "base");
    assert_eq!(diagnostic["fixes"][0]["title"], "Inherit from _BaseController");
    assert_eq!(json["summary"]["filesChecked"], 2);
    assert_eq!(json["summary"]["errors"], 1);
}

#[test]
fn test_check_skips_excluded_folders() {
    let project = create_test_project();
    write(
        project.path(),
        "Web/obj/Controllers/Generated.cs",
        "class GeneratedController : Controller { }\n",
    );

    cli()
        .arg("check")
        .arg(project.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Generated").not());
}

#[test]
fn test_fix_writes_file() {
    let project = create_test_project();
    let target = project.path().join("Web/Controllers/FooController.cs");

    cli()
        .arg("fix")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed 1 issues in 1 files"));

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "class FooController : _BaseController, IFoo { }\n"
    );

    cli().arg("check").arg(project.path()).assert().success();
}

#[test]
fn test_fix_dry_run_leaves_files() {
    let project = create_test_project();
    let target = project.path().join("Web/Controllers/FooController.cs");

    cli()
        .args(["fix", "--dry-run"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-class FooController : IFoo { }"))
        .stdout(predicate::str::contains(
            "+class FooController : _BaseController, IFoo { }",
        ))
        .stdout(predicate::str::contains("Would fix 1 issues"));

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "class FooController : IFoo { }\n"
    );
}

#[test]
fn test_fix_ambiguous_needs_base() {
    let project = create_test_project();
    write(
        project.path(),
        "Web/Controllers/_SecureController.cs",
        "class _SecureController : _BaseController { }\n",
    );
    let target = project.path().join("Web/Controllers/FooController.cs");

    cli()
        .arg("fix")
        .arg(project.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("choose one with --base"))
        .stdout(predicate::str::contains("fix: Inherit from _SecureController"));
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "class FooController : IFoo { }\n"
    );

    cli()
        .args(["fix", "--base", "_SecureController"])
        .arg(project.path())
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "class FooController : _SecureController, IFoo { }\n"
    );
}

#[test]
fn test_fix_adds_import() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "Controllers/HomeController.cs",
        "import System;\n\nnamespace App.Controllers;\n\nclass HomeController : Controller { }\n",
    );
    write(
        temp_dir.path(),
        "Controllers/_BaseController.cs",
        "namespace Foo.Bar;\n\nclass _BaseController : Controller { }\n",
    );

    cli().arg("fix").arg(temp_dir.path()).assert().success();

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("Controllers/HomeController.cs")).unwrap(),
        "import System;\nimport Foo.Bar;\n\nnamespace App.Controllers;\n\nclass HomeController : _BaseController, Controller { }\n"
    );
}

#[test]
fn test_config_file_changes_prefix() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        ".heritagerc.toml",
        "[rules.controllerInheritance]\nreservedPrefix = \"Base\"\n",
    );
    write(
        temp_dir.path(),
        "Controllers/HomeController.cs",
        "class HomeController : BaseController { }\n",
    );

    cli().arg("check").arg(temp_dir.path()).assert().success();

    write(
        temp_dir.path(),
        ".heritagerc.toml",
        "[rules.controllerInheritance]\nseverity = \"warn\"\n",
    );
    cli()
        .arg("check")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Warnings: 1"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("custom.toml");
    fs::write(&config, "[fix]\nimportKeyword = \"include\"\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(temp_dir.path())
        .assert()
        .code(2);
}

#[test]
fn test_rules_command() {
    cli()
        .args(["rules", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ControllerInheritance"))
        .stdout(predicate::str::contains("Invalid Parent Class"))
        .stdout(predicate::str::contains(
            "All controllers must inherit from a project base controller",
        ));
}

#[test]
fn test_config_init_and_show() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .args(["config", "init"])
        .current_dir(temp_dir.path())
        .assert()
        .success();
    let written = fs::read_to_string(temp_dir.path().join(".heritagerc.toml")).unwrap();
    assert!(written.contains("reservedPrefix = \"_\""));

    cli()
        .args(["config", "init"])
        .current_dir(temp_dir.path())
        .assert()
        .failure();

    cli()
        .args(["config", "show", "--format", "json"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"importKeyword\": \"using\""));
}
