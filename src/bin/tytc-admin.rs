//! TYTC admin export tool.
//!
//! Fetches the member list, applies the filters from the environment, prints
//! the dashboard numbers and writes the filtered CSV export.

use std::env;
use std::path::PathBuf;

use chrono::Utc;

use tytc_backend::admin::{AdminConsole, MemberFilter};
use tytc_backend::client::{ClientConfig, TytcClient};
use tytc_backend::config::{normalize_prefix, LogFormat, DEFAULT_SERVICE_PREFIX};
use tytc_backend::init_tracing;

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing(
        &env::var("TYTC_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        LogFormat::Pretty,
    );

    let base_url = match non_empty_var("TYTC_API_URL") {
        Some(url) => url,
        None => {
            let prefix = normalize_prefix(
                &env::var("TYTC_SERVICE_PREFIX")
                    .unwrap_or_else(|_| DEFAULT_SERVICE_PREFIX.to_string()),
            );
            format!("http://127.0.0.1:8080{}", prefix)
        }
    };
    let api_token = non_empty_var("TYTC_API_TOKEN");
    let export_dir: PathBuf = env::var("TYTC_EXPORT_DIR")
        .unwrap_or_else(|_| ".".to_string())
        .into();

    let client = TytcClient::new(ClientConfig::new(base_url, api_token))?;
    let mut console = AdminConsole::new(client);
    console.filter = MemberFilter {
        search: env::var("TYTC_ADMIN_SEARCH").unwrap_or_default(),
        university: non_empty_var("TYTC_ADMIN_UNIVERSITY"),
        year: non_empty_var("TYTC_ADMIN_YEAR"),
    };

    tracing::info!("Fetching members from {}", console.client().config().base_url);
    if let Err(e) = console.refresh().await {
        eprintln!("{}", e.user_message());
        return Err(e.into());
    }

    let now = Utc::now();
    let stats = console.stats(now);
    println!("Total members:  {}", stats.total);
    println!("Universities:   {}", stats.universities);
    println!("This month:     {}", stats.joined_this_month);
    println!("Today:          {}", stats.joined_today);
    println!("{}", console.summary());

    let path = console.write_export(&export_dir, now).await?;
    println!("Wrote {}", path.display());

    Ok(())
}
