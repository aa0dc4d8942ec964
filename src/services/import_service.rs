//! Domain service for bulk movie import.
//!
//! Turns the text produced by [`crate::parser::parse_movie_file`] into movies,
//! actors and links, de-duplicating against what is already stored. The whole
//! import runs in one caller-owned transaction.

use sea_orm::DatabaseTransaction;
use thiserror::Error;

use crate::models::movie::Movie;
use crate::parser::ParsedMovie;

pub const EMPTY_FILE_MESSAGE: &str = "File is empty or invalid format";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Outcome of one import.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Resolved movie per imported record, in file order. A title repeated in
    /// the file appears once per occurrence.
    pub movies: Vec<Movie>,
    pub imported: usize,
    /// Records found in the file.
    pub total: usize,
    pub created_movies: usize,
    pub created_actors: usize,
    pub skipped: usize,
}

#[async_trait::async_trait]
pub trait ImportService: Send + Sync {
    /// Parses `content` and reconciles every record.
    ///
    /// # Errors
    ///
    /// - Returns [`ImportError::Validation`] if the text holds no record
    /// - Returns [`ImportError::Validation`] if an incomplete record is found
    ///   and the configured policy rejects them
    async fn import_text(
        &self,
        txn: &DatabaseTransaction,
        content: &str,
    ) -> Result<ImportSummary, ImportError>;

    /// Reconciles already parsed records.
    async fn reconcile(
        &self,
        txn: &DatabaseTransaction,
        records: Vec<ParsedMovie>,
    ) -> Result<ImportSummary, ImportError>;
}
