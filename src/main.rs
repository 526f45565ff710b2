#[tokio::main]
async fn main() {
    if let Err(e) = escola_gateway::run().await {
        eprintln!("fatal: {e:#}");
        std::process::exit(1);
    }
}
