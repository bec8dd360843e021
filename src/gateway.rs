use crate::config::NeedleSettings;
use crate::error::{GatewayError, Result};
use crate::needle::{FileToAdd, NeedleClient};
use crate::tools::{NeedleTool, ToolArguments};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Translates tool invocations into Needle API calls.
///
/// Each invocation is independent: one outbound request, no retries, no
/// state carried between calls beyond the immutable settings.
#[derive(Debug, Clone)]
pub struct ToolGateway {
    client: NeedleClient,
}

impl ToolGateway {
    pub fn new(settings: Arc<NeedleSettings>) -> Result<Self> {
        Ok(Self {
            client: NeedleClient::new(settings)?,
        })
    }

    /// Run one tool invocation and return its shaped JSON result
    pub async fn invoke(&self, name: &str, arguments: ToolArguments) -> Result<Value> {
        let tool: NeedleTool = name.parse()?;
        self.client.ensure_credentials()?;

        debug!(tool = %tool, "Dispatching tool invocation");
        let result = self.dispatch(tool, &arguments).await;

        match &result {
            Ok(_) => info!(tool = %tool, "Tool invocation completed"),
            Err(e) => warn!(tool = %tool, error = %e, "Tool invocation failed"),
        }
        result
    }

    async fn dispatch(&self, tool: NeedleTool, args: &ToolArguments) -> Result<Value> {
        match tool {
            NeedleTool::ListCollections => {
                let collections = self.client.list_collections().await?;
                let collections: Vec<Value> = collections
                    .into_iter()
                    .map(|c| summarize(c.id, c.name, &c.extra, "created_at"))
                    .collect();
                Ok(json!({ "collections": collections }))
            }
            NeedleTool::CreateCollection => {
                let name = args.required_str("name")?;
                let collection = self.client.create_collection(name).await?;
                Ok(json!({ "collection_id": collection.id }))
            }
            NeedleTool::AddFileToCollection => {
                let collection_id = args.required_str("collection_id")?;
                let file = FileToAdd {
                    name: args.required_str("name")?.to_string(),
                    url: args.required_url("url")?.to_string(),
                };
                let added = self
                    .client
                    .add_files(collection_id, std::slice::from_ref(&file))
                    .await?;
                let first = added
                    .into_iter()
                    .next()
                    .ok_or_else(|| GatewayError::Upstream {
                        status: None,
                        message: format!("no file record returned for '{}'", file.name),
                    })?;
                Ok(json!({ "file_id": first.id }))
            }
            NeedleTool::SearchCollection => {
                let collection_id = args.required_str("collection_id")?;
                let query = args.required_str("query")?;
                let results = self.client.search(collection_id, query).await?;
                debug!(hits = results.len(), "Search returned");
                Ok(json!({ "results": results }))
            }
            NeedleTool::GetCollectionDetails => {
                let collection_id = args.required_str("collection_id")?;
                let collection = self.client.get_collection(collection_id).await?;
                Ok(json!({ "collection": collection }))
            }
            NeedleTool::GetCollectionStats => {
                let collection_id = args.required_str("collection_id")?;
                let stats = self.client.collection_stats(collection_id).await?;
                Ok(json!({ "stats": stats }))
            }
            NeedleTool::ListCollectionFiles => {
                let collection_id = args.required_str("collection_id")?;
                let files = self.client.list_files(collection_id).await?;
                let files: Vec<Value> = files
                    .into_iter()
                    .map(|f| summarize(f.id, f.name, &f.extra, "status"))
                    .collect();
                Ok(json!({ "files": files }))
            }
        }
    }
}

/// `{"id", "name"}` plus `optional` when Needle sent it
fn summarize(id: String, name: String, extra: &Map<String, Value>, optional: &str) -> Value {
    let mut entry = Map::new();
    entry.insert("id".to_string(), Value::String(id));
    entry.insert("name".to_string(), Value::String(name));
    if let Some(value) = extra.get(optional).filter(|v| !v.is_null()) {
        entry.insert(optional.to_string(), value.clone());
    }
    Value::Object(entry)
}
