//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseTransaction, DbErr};
use tracing::info;

use crate::db::{ActorRepository, MovieActorRepository, MovieFilter, MovieRepository, Store};
use crate::domain::MovieId;
use crate::entities::movies;
use crate::models::movie::{Movie, MoviePage, MovieQuery, MovieUpdate, NewMovie, normalize_title};
use crate::services::catalog_service::{CatalogError, CatalogService, DUPLICATE_TITLE_MESSAGE};

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Loads the cast of `movie` through `conn`, so a caller inside a
/// transaction sees its own uncommitted links.
pub(crate) async fn attach_actors<C: ConnectionTrait>(
    conn: &C,
    movie: movies::Model,
) -> Result<Movie, DbErr> {
    let mut cast = MovieActorRepository::new(conn)
        .actors_for_movies(&[movie.id])
        .await?;
    let actors = cast.remove(&movie.id).unwrap_or_default();
    Ok(Movie::from(movie).with_actors(actors))
}

async fn link_actors(
    txn: &DatabaseTransaction,
    movie_id: i32,
    names: &[String],
) -> Result<(), DbErr> {
    let actors = ActorRepository::new(txn).find_or_create_all(names).await?;
    let actor_ids: Vec<i32> = actors.iter().map(|a| a.id).collect();

    MovieActorRepository::new(txn)
        .replace_for_movie(movie_id, &actor_ids)
        .await
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        movie: NewMovie,
    ) -> Result<Movie, CatalogError> {
        let movies = MovieRepository::new(txn);

        if movies
            .find_by_normalized_title(&normalize_title(&movie.title))
            .await?
            .is_some()
        {
            return Err(CatalogError::Conflict(DUPLICATE_TITLE_MESSAGE.to_string()));
        }

        // A concurrent create can still win the race; the unique index turns
        // that into a Conflict via `From<DbErr>`.
        let created = movies.insert(&movie.title, movie.year, movie.format).await?;

        link_actors(txn, created.id, &movie.actors).await?;

        info!(
            movie_id = created.id,
            title = %created.title,
            actors = movie.actors.len(),
            "Movie created"
        );

        Ok(attach_actors(txn, created).await?)
    }

    async fn get_by_id(&self, id: MovieId) -> Result<Movie, CatalogError> {
        let movie = self
            .store
            .movies()
            .find_by_id(id.value())
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        Ok(attach_actors(&self.store.conn, movie).await?)
    }

    async fn list(&self, query: &MovieQuery) -> Result<MoviePage, CatalogError> {
        let filter = MovieFilter {
            title: non_empty(query.title.as_ref()),
            actor: non_empty(query.actor.as_ref()),
            search: non_empty(query.search.as_ref()),
        };

        let repo = self.store.movies();
        let total = repo.count_matching(filter).await?;
        let rows = repo
            .page(filter, query.sort, query.order, query.limit, query.offset)
            .await?;

        let ids: Vec<i32> = rows.iter().map(|m| m.id).collect();
        let mut cast = self.store.movie_actors().actors_for_movies(&ids).await?;

        let movies = rows
            .into_iter()
            .map(|model| {
                let actors = cast.remove(&model.id).unwrap_or_default();
                Movie::from(model).with_actors(actors)
            })
            .collect();

        Ok(MoviePage { movies, total })
    }

    async fn update(
        &self,
        txn: &DatabaseTransaction,
        id: MovieId,
        changes: MovieUpdate,
    ) -> Result<Movie, CatalogError> {
        let movies = MovieRepository::new(txn);
        let existing = movies
            .find_by_id(id.value())
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        if let Some(title) = changes.title.as_deref()
            && let Some(other) = movies
                .find_by_normalized_title(&normalize_title(title))
                .await?
            && other.id != existing.id
        {
            return Err(CatalogError::Conflict(DUPLICATE_TITLE_MESSAGE.to_string()));
        }

        let updated = movies
            .update(
                existing,
                changes.title.as_deref(),
                changes.year,
                changes.format,
            )
            .await?;

        if let Some(actors) = &changes.actors {
            link_actors(txn, updated.id, actors).await?;
        }

        info!(movie_id = updated.id, "Movie updated");

        Ok(attach_actors(txn, updated).await?)
    }

    async fn delete(&self, txn: &DatabaseTransaction, id: MovieId) -> Result<(), CatalogError> {
        let movies = MovieRepository::new(txn);

        if movies.find_by_id(id.value()).await?.is_none() {
            return Err(CatalogError::NotFound(id));
        }

        let links = MovieActorRepository::new(txn)
            .delete_for_movie(id.value())
            .await?;
        movies.delete(id.value()).await?;

        info!(movie_id = %id, links, "Movie deleted");
        Ok(())
    }
}
