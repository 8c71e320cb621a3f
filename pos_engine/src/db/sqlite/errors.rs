use thiserror::Error;

use crate::pos_api::errors::OrderStoreError;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Could not run database migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Product not found: {0}")]
    ProductNotFound(i64),
}

impl From<SqliteDatabaseError> for OrderStoreError {
    fn from(e: SqliteDatabaseError) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}
