use crate::error::{GatewayError, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Every tool this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeedleTool {
    ListCollections,
    CreateCollection,
    AddFileToCollection,
    SearchCollection,
    GetCollectionDetails,
    GetCollectionStats,
    ListCollectionFiles,
}

/// A tool as advertised in `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Map<String, Value>,
}

impl NeedleTool {
    pub const ALL: [NeedleTool; 7] = [
        NeedleTool::ListCollections,
        NeedleTool::CreateCollection,
        NeedleTool::AddFileToCollection,
        NeedleTool::SearchCollection,
        NeedleTool::GetCollectionDetails,
        NeedleTool::GetCollectionStats,
        NeedleTool::ListCollectionFiles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NeedleTool::ListCollections => "list_collections",
            NeedleTool::CreateCollection => "create_collection",
            NeedleTool::AddFileToCollection => "add_file_to_collection",
            NeedleTool::SearchCollection => "search_collection",
            NeedleTool::GetCollectionDetails => "get_collection_details",
            NeedleTool::GetCollectionStats => "get_collection_stats",
            NeedleTool::ListCollectionFiles => "list_collection_files",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            NeedleTool::ListCollections => {
                "List all Needle collections you have access to (owned, editor, or viewer)"
            }
            NeedleTool::CreateCollection => "Create a new Needle collection for storing documents",
            NeedleTool::AddFileToCollection => {
                "Add a file to an existing collection; Needle downloads it from the given URL"
            }
            NeedleTool::SearchCollection => {
                "Search a collection for relevant content using a natural-language query"
            }
            NeedleTool::GetCollectionDetails => "Get detailed information about a collection",
            NeedleTool::GetCollectionStats => "Get statistics for a collection",
            NeedleTool::ListCollectionFiles => "List all files in a collection",
        }
    }

    /// Required string arguments with their descriptions, in schema order
    pub fn parameters(self) -> &'static [(&'static str, &'static str)] {
        const COLLECTION_ID: (&str, &str) = ("collection_id", "ID of the collection");
        match self {
            NeedleTool::ListCollections => &[],
            NeedleTool::CreateCollection => &[("name", "Name of the collection")],
            NeedleTool::AddFileToCollection => &[
                ("collection_id", "ID of the collection to add the file to"),
                ("name", "Name of the file"),
                ("url", "Public URL Needle can download the file from"),
            ],
            NeedleTool::SearchCollection => &[
                ("collection_id", "ID of the collection to search in"),
                ("query", "Search query in natural language"),
            ],
            NeedleTool::GetCollectionDetails
            | NeedleTool::GetCollectionStats
            | NeedleTool::ListCollectionFiles => &[COLLECTION_ID],
        }
    }

    pub fn input_schema(self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .parameters()
            .iter()
            .map(|(name, description)| {
                (
                    (*name).to_string(),
                    json!({ "type": "string", "description": description }),
                )
            })
            .collect();
        let required: Vec<&str> = self.parameters().iter().map(|(name, _)| *name).collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(required));
        schema
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }

    pub fn catalog() -> Vec<ToolDefinition> {
        Self::ALL.iter().map(|tool| tool.definition()).collect()
    }
}

impl NeedleTool {
    /// Names accepted for a tool besides its advertised one.
    /// Hyphenated spellings (`search-collection`) are handled separately.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            NeedleTool::AddFileToCollection => &["add_file"],
            NeedleTool::SearchCollection => &["search"],
            _ => &[],
        }
    }

    fn matches(self, name: &str) -> bool {
        let normalized = name.replace('-', "_");
        self.name() == normalized || self.aliases().contains(&normalized.as_str())
    }
}

impl FromStr for NeedleTool {
    type Err = GatewayError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.matches(name))
            .ok_or_else(|| GatewayError::unsupported_tool(name))
    }
}

impl fmt::Display for NeedleTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for tool in NeedleTool::ALL {
            assert_eq!(tool.name().parse::<NeedleTool>().unwrap(), tool);
        }
    }

    #[test]
    fn test_hyphenated_names_resolve() {
        let cases = [
            ("create-collection", NeedleTool::CreateCollection),
            ("add-file-to-collection", NeedleTool::AddFileToCollection),
            ("search-collection", NeedleTool::SearchCollection),
            ("list-collections", NeedleTool::ListCollections),
            ("get-collection-stats", NeedleTool::GetCollectionStats),
        ];
        for (name, expected) in cases {
            assert_eq!(name.parse::<NeedleTool>().unwrap(), expected, "{}", name);
        }
    }

    #[test]
    fn test_short_aliases_resolve() {
        assert_eq!(
            "add_file".parse::<NeedleTool>().unwrap(),
            NeedleTool::AddFileToCollection
        );
        assert_eq!("search".parse::<NeedleTool>().unwrap(), NeedleTool::SearchCollection);
        assert_eq!("add-file".parse::<NeedleTool>().unwrap(), NeedleTool::AddFileToCollection);
    }

    #[test]
    fn test_catalog_advertises_one_name_per_tool() {
        let names: Vec<&str> = NeedleTool::catalog().iter().map(|d| d.name).collect();
        assert_eq!(names.len(), NeedleTool::ALL.len());
        assert!(!names.contains(&"search"));
        assert!(!names.contains(&"search-collection"));
    }

    #[test]
    fn test_unknown_tool_is_invalid_request() {
        let err = "drop_collection".parse::<NeedleTool>().unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
        assert!(err.to_string().contains("unsupported tool: drop_collection"));
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = NeedleTool::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), NeedleTool::ALL.len());
    }

    #[test]
    fn test_search_schema() {
        let schema = NeedleTool::SearchCollection.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["collection_id", "query"]));
        assert_eq!(schema["properties"]["query"]["type"], "string");
    }

    #[test]
    fn test_list_collections_takes_no_arguments() {
        let schema = NeedleTool::ListCollections.input_schema();
        assert_eq!(schema["required"], json!([]));
        assert!(schema["properties"].as_object().unwrap().is_empty());
    }
}
