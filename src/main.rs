#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    coverie::run().await
}
