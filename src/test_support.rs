use axum::{routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Serves canned JSON-RPC results keyed by method name on an ephemeral port.
/// Replies carrying `code` and `message` are sent back as JSON-RPC errors.
/// Every request body is recorded for inspection.
pub async fn spawn_rpc_server(
    responder: impl Fn(&str, &Value) -> Value + Send + Sync + 'static,
) -> (String, Arc<Mutex<Vec<Value>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();
    let responder = Arc::new(responder);

    let app = Router::new().route(
        "/",
        post(move |Json(body): Json<Value>| {
            let recorded = recorded.clone();
            let responder = responder.clone();
            async move {
                recorded.lock().unwrap().push(body.clone());
                let method = body["method"].as_str().unwrap_or_default().to_string();
                let reply = responder(&method, &body["params"]);
                let mut envelope = json!({ "jsonrpc": "2.0", "id": body["id"] });
                if reply.get("code").is_some() && reply.get("message").is_some() {
                    envelope["error"] = reply;
                } else {
                    envelope["result"] = reply;
                }
                Json(envelope)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/", addr), seen)
}
