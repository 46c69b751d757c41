use std::io::Write;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use styler_core::Dataset;

use crate::output::OutputFormat;
use crate::output::Palette;

#[derive(Debug, Parser)]
pub struct FacetsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct FacetSummary<'a> {
    pub category: &'a str,
    pub group: &'a str,
    pub key: &'a str,
    pub name: &'a str,
    pub count: usize,
}

/// Every facet of the taxonomy, static and derived, in display order.
pub fn summarize(dataset: &Dataset) -> Vec<FacetSummary<'_>> {
    let mut facets = Vec::new();
    for (category, groups) in dataset.taxonomy().categories() {
        for (group, labels) in groups {
            for (key, label) in labels {
                facets.push(FacetSummary {
                    category,
                    group,
                    key: key.as_str(),
                    name: label.display(),
                    count: dataset.count(key.as_str()),
                });
            }
        }
    }
    facets
}

pub fn run(dataset: &Dataset, args: &FacetsArgs, out: &mut impl Write) -> Result<()> {
    let facets = summarize(dataset);
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &facets)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_tree(&facets, Palette::for_stdout(), out)?,
    }
    Ok(())
}

fn write_tree(facets: &[FacetSummary<'_>], palette: Palette, out: &mut impl Write) -> Result<()> {
    let mut category = None;
    let mut group = None;
    for facet in facets {
        if category != Some(facet.category) {
            category = Some(facet.category);
            group = None;
            writeln!(out, "{}", palette.bold(facet.category))?;
        }
        if group != Some(facet.group) {
            group = Some(facet.group);
            writeln!(out, "  {}", facet.group)?;
        }
        let name = if facet.name == facet.key {
            String::new()
        } else {
            format!("  {}", palette.dim(facet.name))
        };
        writeln!(out, "    {:>5}  {}{name}", facet.count, facet.key)?;
    }
    Ok(())
}
