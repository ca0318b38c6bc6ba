use mock_server::{Branch, ServerState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "6990".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;

    let mut state = ServerState::default();
    state.plans.insert(
        "DEMO-PLAN".to_string(),
        vec![
            Branch {
                description: "default branch".to_string(),
                short_name: "master".to_string(),
                short_key: "0".to_string(),
                enabled: true,
                workflow_type: "branch".to_string(),
                key: "DEMO-PLAN0".to_string(),
                name: None,
            },
            Branch {
                description: String::new(),
                short_name: "develop".to_string(),
                short_key: "DEV".to_string(),
                enabled: true,
                workflow_type: "branch".to_string(),
                key: "DEMO-PLAN12".to_string(),
                name: Some("Demo Plan - develop".to_string()),
            },
        ],
    );

    println!("listening on {addr}");
    mock_server::run(listener, state).await
}
