use anyhow::Result;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;

use super::Workspace;

#[test]
fn shows_source_and_diff() -> Result<()> {
    let workspace = Workspace::new()?;
    workspace
        .styler()?
        .args(["show", "spoon", "12"])
        .assert()
        .success()
        .stdout(
            contains("Dissection of spoon 12")
                .and(contains("source  src/main/java/A.java"))
                .and(contains("   14 > if(a>b){"))
                .and(contains("+if (a > b) {")),
        );
    Ok(())
}

#[test]
fn json_output_pairs_record_and_detail() -> Result<()> {
    let workspace = Workspace::new()?;
    let output = workspace
        .styler()?
        .args(["show", "spoon", "12", "--format", "json"])
        .output()?;
    assert!(output.status.success());
    let shown: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(shown["record"]["error_type"], "com.puppycrawl.tools.checkstyle.checks.whitespace.WhitespaceAroundCheck");
    assert_eq!(shown["detail"]["information"]["errors"][0]["line"], 14);
    Ok(())
}

#[test]
fn unknown_error_fails() -> Result<()> {
    let workspace = Workspace::new()?;
    workspace
        .styler()?
        .args(["show", "spoon", "99"])
        .assert()
        .failure()
        .stderr(contains("no error spoon 99"));
    Ok(())
}

#[test]
fn missing_detail_file_fails() -> Result<()> {
    let workspace = Workspace::new()?;
    workspace
        .styler()?
        .args(["show", "h2database", "62"])
        .assert()
        .failure()
        .stderr(contains("failed to fetch detail of h2database 62"));
    Ok(())
}
