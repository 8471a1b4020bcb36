/// Liveness probe; does not touch the database.
pub async fn health() -> &'static str {
    "ok"
}
