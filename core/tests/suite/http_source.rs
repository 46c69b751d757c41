use std::time::Duration;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use styler_core::RecordId;
use styler_core::SourceError;
use styler_core::detail::fetch_detail;
use styler_core::open_source;
use styler_core::store;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

use super::fixtures;

async fn serve_dataset(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/styler/data/classification.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::classification()))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/styler/data/all.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::records()))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn loads_dataset_over_http() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    serve_dataset(&server).await;

    let source = open_source(&format!("{}/styler", server.uri()), Duration::from_secs(5))?;
    let dataset = store::load(source.as_ref()).await?;

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.count("spoon"), 2);
    assert_eq!(dataset.count("whitespace"), 2);
    assert_eq!(dataset.count("not styler"), 1);
    assert!(
        dataset
            .taxonomy()
            .group("Errors", "Projects (2)")
            .is_some()
    );
    assert_eq!(
        dataset.display_name("whitespace"),
        "Whitespace around operators"
    );
    Ok(())
}

#[tokio::test]
async fn missing_records_fail_the_whole_load() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/classification.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::classification()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/all.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such file"))
        .mount(&server)
        .await;

    let source = open_source(&server.uri(), Duration::from_secs(5))?;
    let err = store::load(source.as_ref())
        .await
        .expect_err("load should fail");
    assert_matches!(
        err,
        SourceError::Status { status, ref body, .. } if status.as_u16() == 404 && body == "no such file"
    );
    Ok(())
}

#[tokio::test]
async fn fetches_detail_by_record_id() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/spoon-12.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::detail()))
        .mount(&server)
        .await;

    let source = open_source(&server.uri(), Duration::from_secs(5))?;
    let detail = fetch_detail(source.as_ref(), &RecordId::new("spoon", "12")).await?;

    assert_eq!(styler_core::detail::line_offset(&detail), 12);
    assert_eq!(detail.patches().len(), 1);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/spoon-3.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let source = open_source(&server.uri(), Duration::from_secs(5))?;
    let err = fetch_detail(source.as_ref(), &RecordId::new("spoon", "3"))
        .await
        .expect_err("decode should fail");
    assert_matches!(err, SourceError::Decode { ref path, .. } if path == "data/spoon-3.json");
    Ok(())
}
