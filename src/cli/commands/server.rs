use serde_json::{json, Value};
use std::time::Duration;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

/// GET <url>/health and report the result
pub async fn ping(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let endpoint = format!("{}/health", url.trim_end_matches('/'));
    let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;

    let response = match client.get(&endpoint).send().await {
        Ok(response) => response,
        Err(e) => {
            output_error(output_format, &format!("{} unreachable: {}", endpoint, e), Some("UNREACHABLE"))?;
            anyhow::bail!("server unreachable");
        }
    };

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(
            output_format,
            &format!("{} is healthy", url),
            None,
            json!({ "status": status.as_u16(), "health": body }),
        )
    } else {
        output_error(
            output_format,
            &format!("{} responded with {}", endpoint, status),
            Some("UNHEALTHY"),
        )?;
        anyhow::bail!("server unhealthy")
    }
}
