mod facets;
mod list;
mod show;

use std::path::Path;

use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;

/// A data directory plus an empty `STYLER_HOME`.
pub struct Workspace {
    pub data: TempDir,
    pub home: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        let data = TempDir::new()?;
        write_dataset(data.path())?;
        Ok(Self {
            data,
            home: TempDir::new()?,
        })
    }

    /// `styler --data <dataset>` with an isolated home.
    pub fn styler(&self) -> Result<assert_cmd::Command> {
        let mut cmd = self.bare()?;
        cmd.arg("--data").arg(self.data.path());
        Ok(cmd)
    }

    pub fn bare(&self) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("styler")?;
        cmd.env("STYLER_HOME", self.home.path());
        cmd.env_remove("RUST_LOG");
        Ok(cmd)
    }
}

fn write_dataset(root: &Path) -> Result<()> {
    let data = root.join("data");
    std::fs::create_dir_all(&data)?;
    let classification = json!({
        "Errors": {
            "Checkstyle (2)": {
                "whitespace": {"name": "Whitespace", "fullname": "Whitespace around operators"},
                "indentation": {"name": "Indentation"}
            }
        }
    });
    let records = json!([
        {"project_name": "spoon", "error_id": 12,
         "error_type": "com.puppycrawl.tools.checkstyle.checks.whitespace.WhitespaceAroundCheck",
         "repaired_by": ["styler", "naturalize"], "not_repaired_by": ["codebuff"],
         "whitespace": true},
        {"project_name": "spoon", "error_id": "3",
         "error_type": "com.puppycrawl.tools.checkstyle.checks.indentation.IndentationCheck",
         "repaired_by": [], "not_repaired_by": ["styler"], "indentation": true},
        {"project_name": "h2database", "error_id": 62,
         "error_type": "com.puppycrawl.tools.checkstyle.checks.whitespace.WhitespaceAroundCheck",
         "repaired_by": ["styler"], "not_repaired_by": [], "whitespace": true}
    ]);
    let detail = json!({
        "source_code": "int a;\nint b;\nif(a>b){\n}\n",
        "relative_path": "src/main/java/A.java",
        "information": {"errors": [{"line": 14, "column": 7,
            "message": "'>' is not preceded with whitespace."}]},
        "diff": "--- a/A.java\n+++ b/A.java\n@@ -14,1 +14,1 @@\n-if(a>b){\n+if (a > b) {\n"
    });
    std::fs::write(data.join("classification.json"), classification.to_string())?;
    std::fs::write(data.join("all.json"), records.to_string())?;
    std::fs::write(data.join("spoon-12.json"), detail.to_string())?;
    Ok(())
}
