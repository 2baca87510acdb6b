#[tokio::main]
async fn main() {
    if let Err(error) = monitoring_report_api::run().await {
        eprintln!("fatal: {error}");
        std::process::exit(1);
    }
}
