//! Updating the settings and mappings of an existing index.
//!
//! Settings can only be changed while an index is closed, so an update closes
//! the index, applies the changes and reopens it. A reopen is attempted even
//! when closing or applying a change fails.

use serde_json::Value;

use crate::client::SearchClient;
use crate::config::IndexConfigurator;
use crate::error::{Result, ScoutError};
use crate::model::Searchable;
use crate::payload::Payload;

const DEFAULT_MAPPING_TYPE: &str = "_default_";

/// Push the configurator's settings and default mapping to its index.
pub async fn update_index(
    client: &dyn SearchClient,
    configurator: &IndexConfigurator,
) -> Result<()> {
    let name = configurator.name.as_str();
    let payload = Payload::index(configurator)?;

    let exists = client
        .exists(&payload)
        .await
        .map_err(|e| ScoutError::index_operation("check", name, e))?;
    if !exists {
        log::error!("index {name} doesn't exist");
        return Err(ScoutError::index_not_found(name));
    }

    if let Err(e) = close_and_apply(client, &payload, configurator).await {
        log::error!("failed to update index {name}: {e}; reopening it");
        if let Err(open_err) = client.open(&payload).await {
            log::error!("failed to reopen index {name}: {open_err}");
        }
        return Err(e);
    }

    if let Err(e) = client.open(&payload).await {
        log::error!("failed to open index {name}: {e}");
        return Err(ScoutError::index_operation("open", name, e));
    }

    log::info!("the index {name} was updated");
    Ok(())
}

async fn close_and_apply(
    client: &dyn SearchClient,
    payload: &Payload,
    configurator: &IndexConfigurator,
) -> Result<()> {
    client
        .close(payload)
        .await
        .map_err(|e| ScoutError::index_operation("close", &configurator.name, e))?;
    apply_changes(client, configurator).await
}

async fn apply_changes(client: &dyn SearchClient, configurator: &IndexConfigurator) -> Result<()> {
    if let Some(settings) = non_empty(&configurator.settings) {
        let payload = Payload::index(configurator)?.set("body.settings", settings.clone())?;
        client.put_settings(&payload).await?;
    }

    if let Some(mapping) = non_empty(&configurator.default_mapping) {
        let payload = Payload::index(configurator)?
            .set("type", Value::String(DEFAULT_MAPPING_TYPE.to_string()))?
            .set(&format!("body.{DEFAULT_MAPPING_TYPE}"), mapping.clone())?;
        client.put_mapping(&payload).await?;
    }

    Ok(())
}

/// Push the type mapping declared by `record`, if any.
pub async fn update_mapping<M: Searchable>(client: &dyn SearchClient, record: &M) -> Result<()> {
    let Some(mapping) = record.mapping().filter(|m| !is_empty(m)) else {
        log::debug!("no mapping declared for {}", record.searchable_as());
        return Ok(());
    };

    let doc_type = record.searchable_as();
    let payload = Payload::for_type(record)?.set(&format!("body.{doc_type}"), mapping)?;
    client.put_mapping(&payload).await?;
    log::info!(
        "the {doc_type} mapping was updated in index {}",
        payload.index
    );
    Ok(())
}

fn non_empty(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !is_empty(v))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
