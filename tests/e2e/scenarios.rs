use super::helpers::{stderr, stdout, TestProject, APACHE_HEADER};

const MIT_RULE_CONFIG: &str = r#"
excludes = ["**/.git/**", "rat-audit.toml"]

[[substring_matchers]]
license_family_category = "MIT"
license_family_name = "MIT"
substrings = ["Permission is hereby granted, free of charge"]
"#;

const MIT_GRANT: &str = "// Permission is hereby granted, free of charge, to the reader.\nvar x = 1;\n";

#[test]
fn test_recognized_header_passes() {
    let test_env = TestProject::new();
    test_env.write("src/Main.java", APACHE_HEADER);

    let output = test_env.run_auditor(&["check"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Rat audit passed: 1 files, 1 approved"));

    let xml = test_env.report("rat-report.xml");
    assert!(xml.contains("<license-family name=\"Apache License Version 2.0\"/>"));
    assert!(xml.contains("unapproved=\"0\""));
    assert!(test_env.report("index.html").contains("All files have approved licenses."));
}

#[test]
fn test_unrecognized_header_fails_and_names_file() {
    let test_env = TestProject::new();
    test_env.write("no-license.txt", "Just some notes.\n");

    let output = test_env.run_auditor(&["check", "--verbose"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Rat audit failure - 1 unapproved license\n"));
    assert!(err.contains("See file://"));
    assert!(err.contains("index.html"));
    assert!(err.contains("Files with unapproved licenses:\n - no-license.txt"));

    let xml = test_env.report("rat-report.xml");
    assert!(xml.contains("<header-type name=\"?????\"/>"));
    assert!(xml.contains("<license-approval name=\"false\"/>"));
}

#[test]
fn test_substring_rule_family_is_approved_by_default() {
    let test_env = TestProject::new();
    test_env.write("rat-audit.toml", MIT_RULE_CONFIG);
    test_env.write("lib/grant.js", MIT_GRANT);

    let output = test_env.run_auditor(&["check"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let xml = test_env.report("rat-report.xml");
    assert!(xml.contains("<header-type name=\"MIT\"/>"));
    assert!(xml.contains("<license-family name=\"MIT\"/>"));
}

#[test]
fn test_explicit_approval_list_excludes_matched_family() {
    let test_env = TestProject::new();
    test_env.write("rat-audit.toml", MIT_RULE_CONFIG);
    test_env.write("lib/grant.js", MIT_GRANT);

    let output = test_env.run_auditor(&["check", "--approve", "Apache-2.0"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Rat audit failure - 1 unapproved license"));

    let plain = test_env.report("rat-report.txt");
    assert!(plain.contains("lib/grant.js — license family 'MIT' is not approved"));
}

#[test]
fn test_no_fail_reports_but_succeeds() {
    let test_env = TestProject::new();
    test_env.write("a.txt", "nothing");
    test_env.write("b.txt", "nothing either");

    let output = test_env.run_auditor(&["check", "--no-fail"]);

    assert!(output.status.success());
    assert!(stderr(&output).contains("Rat audit failure - 2 unapproved licenses"));
    assert!(stdout(&output).contains("2 unapproved file(s) out of 2"));
}

#[test]
fn test_exclusion_file_drops_claims() {
    let test_env = TestProject::new();
    test_env.write("src/Main.java", APACHE_HEADER);
    test_env.write("docs/readme.txt", "no header");
    test_env.write("data/sample.csv", "a,b,c");
    test_env.write(
        "rat-excludes.txt",
        "# documentation has no headers\ndocs/\n*.csv\nrat-excludes.txt\n",
    );

    let output = test_env.run_auditor(&["check", "--exclude-file", "rat-excludes.txt"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let xml = test_env.report("rat-report.xml");
    assert!(xml.contains("name=\"src/Main.java\""));
    assert!(!xml.contains("docs/readme.txt"));
    assert!(!xml.contains("sample.csv"));
}

#[test]
fn test_malformed_exclusion_file_is_config_error() {
    let test_env = TestProject::new();
    test_env.write("src/Main.java", APACHE_HEADER);
    test_env.write("rat-excludes.txt", "*.log\n[unclosed\n");

    let output = test_env.run_auditor(&["check", "--exclude-file", "rat-excludes.txt"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("line 2"));
}

#[test]
fn test_reports_are_idempotent() {
    let test_env = TestProject::new();
    test_env.write("z/last.py", "# no header\n");
    test_env.write("a/First.java", APACHE_HEADER);
    test_env.write("logo.png", "\u{0}PNG");

    let first = test_env.run_auditor(&["check", "--no-fail"]);
    assert!(first.status.success());
    let xml = test_env.report("rat-report.xml");
    let txt = test_env.report("rat-report.txt");

    let second = test_env.run_auditor(&["check", "--no-fail"]);
    assert!(second.status.success());
    assert_eq!(xml, test_env.report("rat-report.xml"));
    assert_eq!(txt, test_env.report("rat-report.txt"));
}

#[test]
fn test_disabling_default_matchers_makes_headers_unknown() {
    let test_env = TestProject::new();
    test_env.write("src/Main.java", APACHE_HEADER);

    let output = test_env.run_auditor(&["check", "--no-default-matchers"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(test_env
        .report("rat-report.xml")
        .contains("<header-type name=\"?????\"/>"));
}

#[test]
fn test_custom_stylesheet() {
    let test_env = TestProject::new();
    test_env.write("src/Main.java", APACHE_HEADER);
    test_env.write("style.tpl", "{{title}}\n{{summary}}\n");

    test_env.write("rat-excludes.txt", "style.tpl\nrat-excludes.txt\n");

    let output = test_env.run_auditor(&[
        "check",
        "--stylesheet",
        "style.tpl",
        "--exclude-file",
        "rat-excludes.txt",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test_env
        .report("index.html")
        .starts_with("Release Audit Report\n<ul class=\"summary\">"));
}
