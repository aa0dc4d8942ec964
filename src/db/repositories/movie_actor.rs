use std::collections::HashMap;

use crate::entities::{movie_actors, prelude::*};
use crate::models::movie::Actor;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};

/// Explicit lifecycle for the movie ↔ actor join rows: link, replace,
/// cascade on movie deletion.
pub struct MovieActorRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> MovieActorRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Idempotent. Returns true when the link did not exist yet.
    pub async fn link(&self, movie_id: i32, actor_id: i32) -> Result<bool, DbErr> {
        let inserted = MovieActors::insert(movie_actors::ActiveModel {
            movie_id: Set(movie_id),
            actor_id: Set(actor_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        })
        .on_conflict(
            OnConflict::columns([movie_actors::Column::MovieId, movie_actors::Column::ActorId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.conn)
        .await?;

        Ok(inserted > 0)
    }

    pub async fn delete_for_movie(&self, movie_id: i32) -> Result<u64, DbErr> {
        let result = MovieActors::delete_many()
            .filter(movie_actors::Column::MovieId.eq(movie_id))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Drops every existing link of `movie_id` and links `actor_ids` instead.
    pub async fn replace_for_movie(&self, movie_id: i32, actor_ids: &[i32]) -> Result<(), DbErr> {
        self.delete_for_movie(movie_id).await?;

        for actor_id in actor_ids {
            self.link(movie_id, *actor_id).await?;
        }

        Ok(())
    }

    /// Cast of each requested movie, keyed by movie id. Movies without actors
    /// map to an empty list.
    pub async fn actors_for_movies(
        &self,
        movie_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<Actor>>, DbErr> {
        let mut cast: HashMap<i32, Vec<Actor>> =
            movie_ids.iter().map(|id| (*id, Vec::new())).collect();

        if movie_ids.is_empty() {
            return Ok(cast);
        }

        let rows = MovieActors::find()
            .filter(movie_actors::Column::MovieId.is_in(movie_ids.iter().copied()))
            .order_by_asc(movie_actors::Column::ActorId)
            .find_also_related(Actors)
            .all(self.conn)
            .await?;

        for (link, actor) in rows {
            if let Some(actor) = actor {
                cast.entry(link.movie_id).or_default().push(Actor {
                    id: actor.id,
                    name: actor.name,
                });
            }
        }

        Ok(cast)
    }
}
