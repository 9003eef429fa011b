//! imagehost - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    imagehost_web::run().await;
}
