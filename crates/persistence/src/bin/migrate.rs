#![deny(warnings)]

use persistence::{default_sqlite_url, DEFAULT_SLOT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| default_sqlite_url().to_string());
    // Ensure directory exists
    if let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    let pool = persistence::init_db(&url).await?;
    let existing = persistence::load_state(&pool, DEFAULT_SLOT).await?;
    match existing {
        Some(state) => println!(
            "DB migrated at {} | saved session: {} (week {})",
            url,
            state.display_name(),
            state.week
        ),
        None => println!("DB migrated at {} | no saved session", url),
    }
    Ok(())
}
