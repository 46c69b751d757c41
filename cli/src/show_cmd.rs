use std::io::Write;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use clap::Parser;
use serde::Serialize;
use styler_core::DataSource;
use styler_core::Dataset;
use styler_core::ErrorDetail;
use styler_core::ErrorRecord;
use styler_core::detail::classification_names;
use styler_core::detail::fetch_detail;
use styler_core::detail::source_lines;

use crate::output::OutputFormat;
use crate::output::Palette;
use crate::output::join_tools;

#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Project the error was mined from.
    pub project: String,

    /// Error id within the project.
    pub id: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct Shown<'a> {
    record: &'a ErrorRecord,
    detail: &'a ErrorDetail,
}

pub async fn run(
    source: &dyn DataSource,
    dataset: &Dataset,
    args: &ShowArgs,
    out: &mut impl Write,
) -> Result<()> {
    let record = dataset
        .find(&args.project, &args.id)
        .ok_or_else(|| anyhow!("no error {} {} in the dataset", args.project, args.id))?;
    let id = record.id();
    let detail = fetch_detail(source, &id)
        .await
        .with_context(|| format!("failed to fetch detail of {id}"))?;
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &Shown { record, detail: &detail })?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_detail(record, &detail, dataset, Palette::for_stdout(), out)?,
    }
    Ok(())
}

fn write_detail(
    record: &ErrorRecord,
    detail: &ErrorDetail,
    dataset: &Dataset,
    palette: Palette,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(
        out,
        "{}",
        palette.bold(format!("Dissection of {} {}", record.project_name, record.error_id))
    )?;
    writeln!(out, "error type       {}", record.error_type)?;
    writeln!(
        out,
        "repaired by      {}",
        palette.green(join_tools(&record.repaired_by))
    )?;
    writeln!(
        out,
        "not repaired by  {}",
        palette.red(join_tools(&record.not_repaired_by))
    )?;
    let mut category = None;
    for name in classification_names(record, dataset) {
        if category.as_deref() != Some(name.category.as_str()) {
            write!(
                out,
                "{}{:<17}{}",
                if category.is_some() { "\n" } else { "" },
                name.category.to_lowercase(),
                name.name
            )?;
            category = Some(name.category);
        } else {
            write!(out, ", {}", name.name)?;
        }
    }
    if category.is_some() {
        writeln!(out)?;
    }

    writeln!(out)?;
    match detail.relative_path.as_deref() {
        Some(path) => writeln!(out, "{}", palette.bold(format!("source  {path}")))?,
        None => writeln!(out, "{}", palette.bold("source"))?,
    }
    for line in source_lines(detail) {
        if line.reported {
            writeln!(out, "{}", palette.red(format!("{:>5} > {}", line.number, line.text)))?;
        } else {
            writeln!(out, "{:>5} | {}", line.number, line.text)?;
        }
    }
    for error in &detail.information.errors {
        let message = error.message.as_deref().unwrap_or_default();
        writeln!(out, "{}", palette.red(format!("line {}: {message}", error.line)))?;
    }
    for (label, patch) in detail.patches() {
        writeln!(out)?;
        writeln!(out, "{}", palette.bold(format!("diff ({label})")))?;
        for line in patch.lines() {
            if line.starts_with('+') && !line.starts_with("+++") {
                writeln!(out, "{}", palette.green(line))?;
            } else if line.starts_with('-') && !line.starts_with("---") {
                writeln!(out, "{}", palette.red(line))?;
            } else {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}
