use httpmock::prelude::*;
use needle_mcp::mcp::NeedleServer;
use rmcp::model::CallToolRequestParams;
use rmcp::ServiceExt;
use serde_json::json;

mod common;

fn call(name: &str, arguments: serde_json::Value) -> CallToolRequestParams {
    CallToolRequestParams {
        meta: None,
        name: name.to_string().into(),
        arguments: arguments.as_object().cloned(),
        task: None,
    }
}

/// Full MCP session over an in-memory pipe: handshake, tools/list, tools/call.
#[tokio::test]
async fn test_session_lists_and_calls_tools() {
    let needle = MockServer::start_async().await;
    let search = needle
        .mock_async(|when, then| {
            when.method(POST)
                .path("/collections/clt_1/search")
                .header("authorization", common::bearer());
            then.status(200).json_body(json!({
                "result": [{"content": "first", "score": 0.9}, {"content": "second", "score": 0.5}]
            }));
        })
        .await;

    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    let server = NeedleServer::new(common::gateway_for(&needle));
    let server_task = tokio::spawn(async move {
        let service = server.serve(server_io).await?;
        service.waiting().await?;
        anyhow::Ok(())
    });

    let client = ().serve(client_io).await.unwrap();

    let tools = client.list_tools(None).await.unwrap();
    let names: Vec<String> = tools.tools.iter().map(|t| t.name.to_string()).collect();
    assert!(names.contains(&"search_collection".to_string()));
    assert!(names.contains(&"add_file_to_collection".to_string()));

    let result = client
        .call_tool(call(
            "search_collection",
            json!({"collection_id": "clt_1", "query": "what comes first"}),
        ))
        .await
        .unwrap();

    search.assert_async().await;
    assert_eq!(result.is_error, Some(false));
    assert_eq!(
        result.structured_content,
        Some(json!({
            "results": [{"content": "first", "score": 0.9}, {"content": "second", "score": 0.5}]
        }))
    );

    client.cancel().await.unwrap();
    let _ = server_task.await;
}

#[tokio::test]
async fn test_session_reports_upstream_failure_as_tool_error() {
    let needle = MockServer::start_async().await;
    needle
        .mock_async(|when, then| {
            when.method(GET).path("/collections");
            then.status(401)
                .json_body(json!({"error": {"message": "Invalid API key"}}));
        })
        .await;

    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    let server = NeedleServer::new(common::gateway_for(&needle));
    let server_task = tokio::spawn(async move {
        let service = server.serve(server_io).await?;
        service.waiting().await?;
        anyhow::Ok(())
    });

    let client = ().serve(client_io).await.unwrap();

    let result = client
        .call_tool(call("list_collections", json!({})))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));

    // Protocol errors do not end the session
    let unknown = client.call_tool(call("no_such_tool", json!({}))).await;
    assert!(unknown.is_err());

    let tools = client.list_tools(None).await.unwrap();
    assert!(!tools.tools.is_empty());

    client.cancel().await.unwrap();
    let _ = server_task.await;
}
