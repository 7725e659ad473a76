#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    teaching_schedule::run().await
}
