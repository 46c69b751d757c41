use std::path::Path;

use serde_json::Value;
use serde_json::json;

pub fn classification() -> Value {
    json!({
        "Errors": {
            "Checkstyle (2)": {
                "whitespace": {"name": "Whitespace", "fullname": "Whitespace around operators"},
                "indentation": {"name": "Indentation"}
            }
        }
    })
}

pub fn records() -> Value {
    json!([
        {
            "project_name": "spoon",
            "error_id": 12,
            "error_type": "com.puppycrawl.tools.checkstyle.checks.whitespace.WhitespaceAroundCheck",
            "repaired_by": ["styler", "naturalize"],
            "not_repaired_by": ["codebuff"],
            "whitespace": true
        },
        {
            "project_name": "spoon",
            "error_id": "3",
            "error_type": "com.puppycrawl.tools.checkstyle.checks.indentation.IndentationCheck",
            "repaired_by": [],
            "not_repaired_by": ["styler"],
            "indentation": true
        },
        {
            "project_name": "h2database",
            "error_id": 62,
            "error_type": "com.puppycrawl.tools.checkstyle.checks.whitespace.WhitespaceAroundCheck",
            "repaired_by": ["styler"],
            "not_repaired_by": [],
            "whitespace": true
        }
    ])
}

pub fn detail() -> Value {
    json!({
        "source_code": "int a;\nint b;\nif(a>b){\n}\n",
        "information": {
            "errors": [
                {"line": "14", "column": "7", "severity": "error",
                 "message": "'>' is not preceded with whitespace."}
            ]
        },
        "diff": "--- a/A.java\n+++ b/A.java\n@@ -3,1 +3,1 @@\n-if(a>b){\n+if (a > b) {\n"
    })
}

/// Lay the fixtures out the way a published dataset is served.
pub fn write_dataset(root: &Path) -> anyhow::Result<()> {
    let data = root.join("data");
    std::fs::create_dir_all(&data)?;
    std::fs::write(
        data.join("classification.json"),
        serde_json::to_vec_pretty(&classification())?,
    )?;
    std::fs::write(data.join("all.json"), serde_json::to_vec_pretty(&records())?)?;
    std::fs::write(data.join("spoon-12.json"), serde_json::to_vec_pretty(&detail())?)?;
    Ok(())
}
