mod common;

use common::{top_artists, Route, Stub};
use lastfm_tools::server::{McpServer, SERVER_NAME};
use lastfm_tools::LastFmTools;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio_test::assert_ok;

async fn run_session(server: &McpServer, messages: &[Value]) -> Vec<Value> {
    let mut input = String::new();
    for message in messages {
        input.push_str(&message.to_string());
        input.push('\n');
    }
    input.push('\n');

    let mut output: Vec<u8> = Vec::new();
    assert_ok!(server.serve(input.as_bytes(), &mut output).await);

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_session() {
    let stub = Stub::start(vec![Route::json(
        &["method=user.gettopartists"],
        top_artists(&["Cher", "Madonna"]),
    )])
    .await;
    let server = McpServer::new(LastFmTools::new(&stub.config_with_user("rj")).unwrap());

    let responses = run_session(
        &server,
        &[
            json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {
                    "name": "get_top_artists",
                    "arguments": { "limit": 2, "detail_level": "minimal" }
                }
            }),
            json!({ "jsonrpc": "2.0", "id": "last", "method": "ping" }),
        ],
    )
    .await;

    assert_eq!(responses.len(), 4);
    let ids: Vec<&Value> = responses.iter().map(|r| &r["id"]).collect();
    assert_eq!(ids, vec![&json!(1), &json!(2), &json!(3), &json!("last")]);

    assert_eq!(responses[0]["result"]["serverInfo"]["name"], SERVER_NAME);
    assert_eq!(responses[0]["result"]["capabilities"], json!({ "tools": {} }));

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 13);
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));

    let call = &responses[2]["result"];
    assert_eq!(call["isError"], false);
    let text = call["content"][0]["text"].as_str().unwrap();
    let artists: Value = serde_json::from_str(text).unwrap();
    assert_eq!(
        artists,
        json!([
            { "name": "Cher", "playcount": 100 },
            { "name": "Madonna", "playcount": 99 }
        ])
    );

    assert_eq!(responses[3]["result"], json!({}));
}

#[tokio::test]
async fn test_tool_error_is_a_result() {
    let stub = Stub::start(vec![Route::raw(&["method=user.gettopartists"], 503, "")]).await;
    let server = McpServer::new(LastFmTools::new(&stub.config_with_user("rj")).unwrap());

    let responses = run_session(
        &server,
        &[json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "tools/call",
            "params": { "name": "get_top_artists", "arguments": {} }
        })],
    )
    .await;

    assert_eq!(responses.len(), 1);
    assert!(responses[0].get("error").is_none());
    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Failed to get top artists: "), "{}", text);
    assert!(text.contains("503"), "{}", text);
}

#[tokio::test]
async fn test_protocol_errors() {
    let stub = Stub::start(vec![]).await;
    let server = McpServer::new(LastFmTools::new(&stub.config()).unwrap());

    let mut output: Vec<u8> = Vec::new();
    let input = "this is not json\n{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"prompts/list\"}\n";
    assert_ok!(server.serve(input.as_bytes(), &mut output).await);

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[1]["id"], 5);
    assert_eq!(responses[1]["error"]["code"], -32601);
}
