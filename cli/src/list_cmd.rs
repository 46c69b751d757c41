use std::io::Write;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use styler_core::Dataset;
use styler_core::ErrorRecord;
use styler_core::FilterEngine;
use styler_core::FilteredView;
use styler_core::MatchMode;
use styler_core::SortKey;
use styler_core::SortSpec;
use tracing::warn;

use crate::output::OutputFormat;
use crate::output::Palette;
use crate::output::join_tools;

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Facet key a record must carry. Repeat for several facets.
    #[arg(long = "filter", short = 'f', value_name = "KEY")]
    pub filters: Vec<String>,

    /// Require all filters or any of them. Defaults to the configured mode.
    #[arg(long = "match", value_name = "all|any")]
    pub match_mode: Option<MatchMode>,

    /// Column to sort by.
    #[arg(long, value_name = "KEY", default_value_t = SortKey::Project)]
    pub sort: SortKey,

    /// Sort descending.
    #[arg(long)]
    pub reverse: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ListedRecord<'a> {
    project_name: &'a str,
    error_id: &'a str,
    error_type: &'a str,
    repaired_by: &'a [String],
    not_repaired_by: &'a [String],
    facets: Vec<&'a str>,
}

impl<'a> From<&'a ErrorRecord> for ListedRecord<'a> {
    fn from(record: &'a ErrorRecord) -> Self {
        Self {
            project_name: &record.project_name,
            error_id: &record.error_id,
            error_type: &record.error_type,
            repaired_by: &record.repaired_by,
            not_repaired_by: &record.not_repaired_by,
            facets: record.facets().iter().map(|key| key.as_str()).collect(),
        }
    }
}

/// The records passing `args`' filters, in `args`' sort order. `match_mode`
/// applies unless `--match` was given.
pub fn select<'a>(
    dataset: &'a Dataset,
    args: &ListArgs,
    match_mode: MatchMode,
) -> Vec<&'a ErrorRecord> {
    let mut filter = FilterEngine::new(args.match_mode.unwrap_or(match_mode));
    for key in &args.filters {
        if dataset.count(key) == 0 {
            warn!("no record carries facet '{key}'");
        }
        if !filter.is_active(key) {
            filter.toggle(key);
        }
    }
    let view = FilteredView::compute(
        dataset.records(),
        &filter,
        SortSpec::new(args.sort, args.reverse),
    );
    view.records(dataset.records()).collect()
}

pub fn run(
    dataset: &Dataset,
    args: &ListArgs,
    match_mode: MatchMode,
    out: &mut impl Write,
) -> Result<()> {
    let records = select(dataset, args, match_mode);
    match args.format {
        OutputFormat::Json => {
            let listed: Vec<ListedRecord<'_>> = records.into_iter().map(Into::into).collect();
            serde_json::to_writer_pretty(&mut *out, &listed)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_table(&records, dataset.len(), Palette::for_stdout(), out)?,
    }
    Ok(())
}

fn write_table(
    records: &[&ErrorRecord],
    total: usize,
    palette: Palette,
    out: &mut impl Write,
) -> Result<()> {
    let project_width = column_width(records, "PROJECT", |record| &record.project_name);
    let id_width = column_width(records, "ID", |record| &record.error_id);
    let type_width = column_width(records, "ERROR TYPE", ErrorRecord::exception_name);

    let header = format!(
        "{:<project_width$}  {:<id_width$}  {:<type_width$}  REPAIRED BY  NOT REPAIRED BY",
        "PROJECT", "ID", "ERROR TYPE"
    );
    writeln!(out, "{}", palette.bold(header))?;
    for record in records {
        writeln!(
            out,
            "{:<project_width$}  {:<id_width$}  {:<type_width$}  {}  {}",
            record.project_name,
            record.error_id,
            record.exception_name(),
            palette.green(join_tools(&record.repaired_by)),
            palette.red(join_tools(&record.not_repaired_by)),
        )?;
    }
    writeln!(
        out,
        "{}",
        palette.dim(format!("{} of {total} errors", records.len()))
    )?;
    Ok(())
}

fn column_width(
    records: &[&ErrorRecord],
    title: &str,
    value: impl Fn(&ErrorRecord) -> &str,
) -> usize {
    records
        .iter()
        .map(|record| value(record).chars().count())
        .chain(std::iter::once(title.len()))
        .max()
        .unwrap_or(0)
}
