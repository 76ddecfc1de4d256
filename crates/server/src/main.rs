#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tenderlens_server::start().await
}
