use anyhow::Result;
use medgod::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
