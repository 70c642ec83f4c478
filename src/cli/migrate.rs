use anyhow::Result;

use crate::core::AppConfig;
use crate::core::db::{async_db, migrate_db};

pub async fn run(config: &AppConfig) -> Result<()> {
    println!("Migrating db...");
    let db = async_db(&config.db_path).await?;
    let removed = db
        .call(|conn| {
            let removed = migrate_db(conn)?;
            Ok(removed)
        })
        .await?;
    println!("Finished migrating db, removed {} unscoped booking flags", removed);
    Ok(())
}
