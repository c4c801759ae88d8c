//! Health check command - checks a running topfive server.

use std::time::Duration;

use url::Url;

use crate::cli::HealthArgs;

/// Resolve the `/health` endpoint from a base URL, accepting either form.
fn health_url(base: &str) -> Result<Url, url::ParseError> {
    let url = Url::parse(base)?;
    if url.path().trim_end_matches('/').ends_with("/health") {
        return Ok(url);
    }
    let mut url = url;
    let path = format!("{}/health", url.path().trim_end_matches('/'));
    url.set_path(&path);
    Ok(url)
}

/// Run the health check command
pub async fn run(args: &HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let url = health_url(&args.url)?;
    let timeout = Duration::from_secs(args.timeout);

    let client = reqwest::Client::builder().timeout(timeout).build()?;

    match client.get(url.clone()).send().await {
        Ok(response) if response.status().is_success() => {
            let body: serde_json::Value = response.json().await?;
            let status = body.get("status").and_then(|s| s.as_str()).unwrap_or("");
            if status == "healthy" {
                println!("healthy: {body}");
                Ok(())
            } else {
                eprintln!("unhealthy: server returned status {status}");
                std::process::exit(1);
            }
        }
        Ok(response) => {
            eprintln!(
                "unhealthy: server returned HTTP status {}",
                response.status()
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("unhealthy: failed to connect to {url}: {e}");
            std::process::exit(1);
        }
    }
}
