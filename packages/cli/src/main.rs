#[tokio::main]
async fn main() -> anyhow::Result<()> {
    modwatch_cli::run_server().await
}
