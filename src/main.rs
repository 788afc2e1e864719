#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = csv_enrich_upload_lib::run().await {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
