use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use styler_core::DataSource;
use styler_core::DirSource;
use styler_core::FilterEngine;
use styler_core::FilteredView;
use styler_core::MatchMode;
use styler_core::Navigator;
use styler_core::RecordId;
use styler_core::Route;
use styler_core::SortSpec;
use styler_core::SourceError;
use styler_core::detail::fetch_detail;
use styler_core::store;
use tempfile::TempDir;

use super::fixtures;

#[tokio::test]
async fn loads_dataset_from_directory() -> anyhow::Result<()> {
    let root = TempDir::new()?;
    fixtures::write_dataset(root.path())?;
    let source = DirSource::new(root.path());

    let dataset = store::load(&source).await?;
    assert_eq!(dataset.len(), 3);

    let detail = fetch_detail(&source, &RecordId::new("spoon", "12")).await?;
    assert_eq!(detail.first_error().map(|error| error.line), Some(14));
    Ok(())
}

#[tokio::test]
async fn missing_file_reports_path() -> anyhow::Result<()> {
    let root = TempDir::new()?;
    let source = DirSource::new(root.path());
    let err = source.get("data/all.json").await.expect_err("nothing there");
    assert_matches!(err, SourceError::Read { ref path, .. } if path.ends_with("data/all.json"));
    Ok(())
}

#[tokio::test]
async fn filter_sort_and_navigate_loaded_dataset() -> anyhow::Result<()> {
    let root = TempDir::new()?;
    fixtures::write_dataset(root.path())?;
    let dataset = store::load(&DirSource::new(root.path())).await?;

    let mut filter = FilterEngine::new(MatchMode::All);
    filter.toggle("WhitespaceAroundCheck");
    let view = FilteredView::compute(dataset.records(), &filter, SortSpec::default());
    let ids: Vec<String> = view.ids().iter().map(ToString::to_string).collect();
    assert_eq!(ids, vec!["h2database 62", "spoon 12"]);

    let mut navigator = Navigator::new(Route::parse("/error/spoon/12"));
    navigator.sync(&view);
    assert_eq!(navigator.selected(), Some(1));
    navigator.next(&view);
    assert_eq!(navigator.route(), &Route::parse("/error/h2database/62"));

    filter.set_mode(MatchMode::Any);
    filter.toggle("not styler");
    let view = FilteredView::compute(dataset.records(), &filter, SortSpec::default());
    assert_eq!(view.len(), 3);
    Ok(())
}
