use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;

use super::Workspace;

#[test]
fn counts_static_and_derived_facets() -> Result<()> {
    let workspace = Workspace::new()?;
    let output = workspace
        .styler()?
        .args(["facets", "--format", "json"])
        .output()?;
    assert!(output.status.success());
    let facets: Vec<JsonValue> = serde_json::from_slice(&output.stdout)?;

    let count = |key: &str| {
        facets
            .iter()
            .find(|facet| facet["key"] == key)
            .and_then(|facet| facet["count"].as_u64())
    };
    assert_eq!(count("whitespace"), Some(2));
    assert_eq!(count("spoon"), Some(2));
    assert_eq!(count("WhitespaceAroundCheck"), Some(2));
    assert_eq!(count("styler"), Some(2));
    assert_eq!(count("not styler"), Some(1));

    let groups: Vec<&str> = facets
        .iter()
        .filter_map(|facet| facet["group"].as_str())
        .collect();
    assert!(groups.contains(&"Projects (2)"));
    assert!(groups.contains(&"Not fixed by (2)"));
    Ok(())
}

#[test]
fn text_output_is_grouped() -> Result<()> {
    let workspace = Workspace::new()?;
    let output = workspace.styler()?.arg("facets").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().take(3).collect();
    assert_eq!(
        lines,
        vec![
            "Errors",
            "  Checkstyle (2)",
            "        2  whitespace  Whitespace around operators",
        ]
    );
    Ok(())
}
