//! Domain service for the movie catalog.
//!
//! Mutations run inside a transaction owned by the caller: the service never
//! commits, so a failed call leaves nothing behind once the caller drops or
//! rolls back the transaction.

use sea_orm::DatabaseTransaction;
use thiserror::Error;

use crate::db::is_unique_violation;
use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieQuery, MoviePage, MovieUpdate, NewMovie};

pub const DUPLICATE_TITLE_MESSAGE: &str = "Movie already exists.";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    /// Another movie already has this normalized title.
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict(DUPLICATE_TITLE_MESSAGE.to_string())
        } else {
            Self::Database(err.to_string())
        }
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a movie, find-or-creates its actors and links them.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] if a movie with the same normalized
    /// title exists; nothing is written in that case.
    async fn create(&self, txn: &DatabaseTransaction, movie: NewMovie)
    -> Result<Movie, CatalogError>;

    /// Movie with its actors.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no such movie exists.
    async fn get_by_id(&self, id: MovieId) -> Result<Movie, CatalogError>;

    /// Filtered, sorted page plus the unpaginated match count.
    async fn list(&self, query: &MovieQuery) -> Result<MoviePage, CatalogError>;

    /// Updates the provided fields; a provided actor list replaces the cast.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if no such movie exists
    /// - Returns [`CatalogError::Conflict`] if the new title collides
    async fn update(
        &self,
        txn: &DatabaseTransaction,
        id: MovieId,
        changes: MovieUpdate,
    ) -> Result<Movie, CatalogError>;

    /// Deletes the movie and its actor links. Actors stay.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no such movie exists.
    async fn delete(&self, txn: &DatabaseTransaction, id: MovieId) -> Result<(), CatalogError>;
}
