use serde_json::json;

use elastic_scout::maintenance::update_index;
use elastic_scout::{ClientCall, IndexConfigurator, MemoryClient, ScoutError};

fn configurator() -> IndexConfigurator {
    IndexConfigurator::new("my_index")
        .with_settings(json!({"analysis": {"analyzer": {"es_std": {"type": "standard"}}}}))
        .with_default_mapping(json!({"properties": {"title": {"type": "text"}}}))
}

#[tokio::test]
async fn test_update_index_closes_applies_and_reopens() -> elastic_scout::Result<()> {
    let client = MemoryClient::new();

    update_index(&client, &configurator()).await?;

    assert_eq!(
        client.call_names(),
        ["exists", "close", "put_settings", "put_mapping", "open"]
    );

    let calls = client.calls();
    match (&calls[2], &calls[3]) {
        (ClientCall::PutSettings(settings), ClientCall::PutMapping(mapping)) => {
            assert_eq!(
                settings.to_value()?,
                json!({
                    "index": "my_index",
                    "body": {"settings": {"analysis": {"analyzer": {"es_std": {"type": "standard"}}}}}
                })
            );
            assert_eq!(
                mapping.to_value()?,
                json!({
                    "index": "my_index",
                    "type": "_default_",
                    "body": {"_default_": {"properties": {"title": {"type": "text"}}}}
                })
            );
        }
        other => panic!("Expected settings then mapping, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_update_index_skips_absent_sections() -> elastic_scout::Result<()> {
    let client = MemoryClient::new();
    let configurator = IndexConfigurator::new("my_index").with_settings(json!({"number_of_replicas": 2}));

    update_index(&client, &configurator).await?;

    assert_eq!(client.call_names(), ["exists", "close", "put_settings", "open"]);
    Ok(())
}

#[tokio::test]
async fn test_update_index_missing_index() {
    let client = MemoryClient::new().without_index();

    let err = update_index(&client, &configurator()).await.unwrap_err();

    assert!(matches!(err, ScoutError::IndexNotFound { .. }));
    assert_eq!(err.to_string(), "Index my_index doesn't exist");
    assert_eq!(client.call_names(), ["exists"]);
}

#[tokio::test]
async fn test_update_index_reopens_after_failure() {
    let client = MemoryClient::new();
    client.fail_on("put_settings");

    let err = update_index(&client, &configurator()).await.unwrap_err();

    assert_eq!(err.to_string(), "Transport error: put_settings failed");
    assert_eq!(
        client.call_names(),
        ["exists", "close", "put_settings", "open"]
    );
}

#[tokio::test]
async fn test_update_index_requires_name() {
    let client = MemoryClient::new();

    let err = update_index(&client, &IndexConfigurator::new("")).await.unwrap_err();

    assert!(matches!(err, ScoutError::Configuration(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_update_index_reopens_after_close_failure() {
    let client = MemoryClient::new();
    client.fail_on("close");

    let err = update_index(&client, &configurator()).await.unwrap_err();

    assert!(matches!(err, ScoutError::IndexOperation { operation: "close", .. }));
    assert_eq!(
        err.to_string(),
        "Failed to close index my_index: Transport error: close failed"
    );
    assert_eq!(client.call_names(), ["exists", "close", "open"]);
}

#[tokio::test]
async fn test_update_index_open_failure_names_index() {
    let client = MemoryClient::new();
    client.fail_on("open");

    let err = update_index(&client, &configurator()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to open index my_index: Transport error: open failed"
    );
    assert_eq!(
        client.call_names(),
        ["exists", "close", "put_settings", "put_mapping", "open"]
    );
}
