#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Bulletin query failed: {0}")]
    Query(#[from] sqlx::Error),
}
