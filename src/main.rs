#[tokio::main]
async fn main() {
    candles::start_server().await;
}
