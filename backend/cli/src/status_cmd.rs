//! CLI Status Command
//!
//! Reports whether a gateway is up and whether its recognizer is configured.

use anyhow::Result;
use serde_json::Value;

use crate::terminal_output::{dim, note_error, note_success, note_warn};

pub async fn run(gateway_url: &str) -> Result<()> {
    let url = format!("{}/api/health", gateway_url.trim_end_matches('/'));
    let client = reqwest::Client::new();

    let body: Value = match client.get(&url).send().await {
        Ok(resp) => resp.json().await?,
        Err(_) => {
            note_error(&format!("textcam is not running at {gateway_url}"));
            return Ok(());
        }
    };

    match body["recognizer"].as_str() {
        Some("ready") => note_success(&format!("Gateway at {gateway_url} is ready")),
        _ => note_warn(&format!(
            "Gateway at {gateway_url} is up but recognition is unavailable (run `textcam doctor`)"
        )),
    }
    println!("{}", dim(&serde_json::to_string_pretty(&body)?));
    Ok(())
}
