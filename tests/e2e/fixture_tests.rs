use std::fs;
use super::helpers::{stderr, stdout, TestProject, APACHE_HEADER};

#[test]
fn test_init_then_check() {
    let test_env = TestProject::new();
    test_env.write("src/Main.java", APACHE_HEADER);

    let init_output = test_env.run_auditor(&["init", "strict"]);
    assert!(init_output.status.success(), "stderr: {}", stderr(&init_output));
    assert!(test_env.root().join("rat-audit.toml").is_file());

    // The generated config itself has no header and is not on the strict list
    let check_output = test_env.run_auditor(&["check"]);
    assert_eq!(check_output.status.code(), Some(1));
    assert!(test_env
        .report("rat-report.txt")
        .contains("rat-audit.toml — unknown license"));
}

#[test]
fn test_init_refuses_overwrite() {
    let test_env = TestProject::new();
    test_env.write("rat-audit.toml", "verbose = true\n");

    let output = test_env.run_auditor(&["init", "apache"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--force"));

    let output = test_env.run_auditor(&["init", "apache", "--force"]);
    assert!(output.status.success());
    let content = fs::read_to_string(test_env.root().join("rat-audit.toml")).unwrap();
    assert!(content.contains("add_default_matchers = true"));
}

#[test]
fn test_config_show_and_validate() {
    let test_env = TestProject::new();
    test_env.write(
        "rat-audit.toml",
        "fail_on_error = false\napproved_licenses = [\"MIT\"]\n",
    );

    let show = test_env.run_auditor(&["config", "--show"]);
    assert!(show.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&show)).unwrap();
    assert_eq!(json["fail_on_error"], false);
    assert_eq!(json["approved_licenses"][0], "MIT");

    let validate = test_env.run_auditor(&["config", "--validate"]);
    assert!(validate.status.success());
    assert!(stdout(&validate).contains("Configuration is valid"));
}

#[test]
fn test_config_validate_rejects_empty_substring() {
    let test_env = TestProject::new();
    test_env.write(
        "rat-audit.toml",
        "[[substring_matchers]]\nlicense_family_category = \"X\"\nlicense_family_name = \"X\"\nsubstrings = [\"\"]\n",
    );

    let output = test_env.run_auditor(&["config", "--validate"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("empty substring"));
}

#[test]
fn test_config_requires_a_flag() {
    let test_env = TestProject::new();
    let output = test_env.run_auditor(&["config"]);
    assert_eq!(output.status.code(), Some(2));
}
