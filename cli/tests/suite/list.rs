use anyhow::Result;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;

use super::Workspace;

#[test]
fn lists_every_error_sorted_by_project() -> Result<()> {
    let workspace = Workspace::new()?;
    let output = workspace.styler()?.arg("list").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let rows: Vec<&str> = stdout.lines().skip(1).collect();
    assert_eq!(rows.len(), 4, "{stdout}");
    assert!(rows[0].starts_with("h2database"), "{stdout}");
    assert!(rows[1].starts_with("spoon       3"), "{stdout}");
    assert!(rows[2].starts_with("spoon       12"), "{stdout}");
    assert_eq!(rows[3], "3 of 3 errors");
    Ok(())
}

#[test]
fn filters_with_all_and_any() -> Result<()> {
    let workspace = Workspace::new()?;
    workspace
        .styler()?
        .args(["list", "--filter", "spoon", "--filter", "whitespace"])
        .assert()
        .success()
        .stdout(contains("1 of 3 errors").and(contains("WhitespaceAroundCheck")));

    workspace
        .styler()?
        .args([
            "list",
            "--filter",
            "h2database",
            "--filter",
            "IndentationCheck",
            "--match",
            "any",
        ])
        .assert()
        .success()
        .stdout(contains("2 of 3 errors"));
    Ok(())
}

#[test]
fn json_output_carries_derived_facets() -> Result<()> {
    let workspace = Workspace::new()?;
    let output = workspace
        .styler()?
        .args(["list", "--filter", "not codebuff", "--format", "json"])
        .output()?;
    assert!(output.status.success());
    let listed: JsonValue = serde_json::from_slice(&output.stdout)?;
    let listed = listed.as_array().cloned().unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["project_name"], "spoon");
    assert_eq!(listed[0]["error_id"], "12");
    let facets = listed[0]["facets"].as_array().cloned().unwrap_or_default();
    for key in ["spoon", "WhitespaceAroundCheck", "styler", "naturalize", "not codebuff", "whitespace"] {
        assert!(facets.contains(&JsonValue::from(key)), "{key} missing from {facets:?}");
    }
    Ok(())
}

#[test]
fn unknown_sort_key_is_rejected() -> Result<()> {
    let workspace = Workspace::new()?;
    workspace
        .styler()?
        .args(["list", "--sort", "colour"])
        .assert()
        .failure()
        .stderr(contains("unknown sort key"));
    Ok(())
}

#[test]
fn data_location_can_come_from_config() -> Result<()> {
    let workspace = Workspace::new()?;
    std::fs::write(
        workspace.home.path().join("config.toml"),
        format!("data = {:?}\n", workspace.data.path().display().to_string()),
    )?;
    workspace
        .bare()?
        .arg("list")
        .assert()
        .success()
        .stdout(contains("3 of 3 errors"));
    Ok(())
}

#[test]
fn missing_dataset_fails_with_context() -> Result<()> {
    let workspace = Workspace::new()?;
    let empty = tempfile::TempDir::new()?;
    workspace
        .bare()?
        .arg("list")
        .arg("--data")
        .arg(empty.path())
        .assert()
        .failure()
        .stderr(contains("failed to load dataset"));
    Ok(())
}

#[test]
fn configured_match_mode_applies_unless_overridden() -> Result<()> {
    let workspace = Workspace::new()?;
    std::fs::write(workspace.home.path().join("config.toml"), "match_mode = \"any\"\n")?;
    let filters = ["list", "--filter", "h2database", "--filter", "IndentationCheck"];
    workspace
        .styler()?
        .args(filters)
        .assert()
        .success()
        .stdout(contains("2 of 3 errors"));

    workspace
        .styler()?
        .args(filters)
        .args(["--match", "all"])
        .assert()
        .success()
        .stdout(contains("0 of 3 errors"));
    Ok(())
}

#[test]
fn top_level_match_flag_reaches_list() -> Result<()> {
    let workspace = Workspace::new()?;
    workspace
        .styler()?
        .args(["--match", "any", "list", "--filter", "h2database", "--filter", "IndentationCheck"])
        .assert()
        .success()
        .stdout(contains("2 of 3 errors"));
    Ok(())
}

#[test]
fn explorer_flags_are_refused_by_list() -> Result<()> {
    let workspace = Workspace::new()?;
    workspace
        .styler()?
        .args(["--route", "/error/spoon/12", "list"])
        .assert()
        .failure()
        .stderr(contains("explorer-only flags given to a scripted command: --route"));
    Ok(())
}
