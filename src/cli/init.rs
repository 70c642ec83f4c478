use anyhow::Result;

use super::open_kv;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    println!("Initializing db at {}...", config.db_path);
    open_kv(config).await?;
    println!("Finished initializing db");
    Ok(())
}
