use std::sync::Arc;

use log::info;
use mock_server::Store;
use tokio::{net::TcpListener, sync::RwLock};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    let mut store = Store::default();
    store.insert_dataset("demo", "reads_1.fastq", "fastqsanger");
    store.insert_dataset("demo", "reads_2.fastq", "fastqsanger");
    store.insert_dataset("demo", "alignments.bam", "bam");

    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    mock_server::run(listener, Arc::new(RwLock::new(store))).await
}
