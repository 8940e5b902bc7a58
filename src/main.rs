use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    archive_purge::cli::run().await
}
