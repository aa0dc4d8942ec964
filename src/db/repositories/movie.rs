use crate::collation::compare_titles;
use crate::domain::{MovieFormat, SortField, SortOrder};
use crate::entities::{actors, movie_actors, movies, prelude::*};
use crate::models::movie::normalize_title;
use sea_orm::sea_query::{Expr, LikeExpr, OnConflict, Query, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

/// Listing filters. All present filters must match.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovieFilter<'q> {
    /// Substring of the normalized title.
    pub title: Option<&'q str>,
    /// Substring of at least one linked actor's name.
    pub actor: Option<&'q str>,
    /// Substring of the title, or of at least one linked actor's name.
    pub search: Option<&'q str>,
}

pub struct MovieRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> MovieRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<movies::Model>, DbErr> {
        Movies::find_by_id(id).one(self.conn).await
    }

    pub async fn find_by_normalized_title(
        &self,
        normalized_title: &str,
    ) -> Result<Option<movies::Model>, DbErr> {
        Movies::find()
            .filter(movies::Column::NormalizedTitle.eq(normalized_title))
            .one(self.conn)
            .await
    }

    /// Plain insert. A duplicate normalized title surfaces as a unique
    /// constraint error.
    pub async fn insert(
        &self,
        title: &str,
        year: i32,
        format: MovieFormat,
    ) -> Result<movies::Model, DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        movies::ActiveModel {
            title: Set(title.trim().to_string()),
            normalized_title: Set(normalize_title(title)),
            year: Set(year),
            format: Set(format.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    /// Returns the movie whose normalized title matches, inserting it from
    /// the given fields first if needed. The boolean is true when a row was
    /// inserted. An existing row is returned untouched.
    pub async fn find_or_create(
        &self,
        title: &str,
        year: i32,
        format: MovieFormat,
    ) -> Result<(movies::Model, bool), DbErr> {
        let normalized = normalize_title(title);
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = Movies::insert(movies::ActiveModel {
            title: Set(title.trim().to_string()),
            normalized_title: Set(normalized.clone()),
            year: Set(year),
            format: Set(format.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(movies::Column::NormalizedTitle)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.conn)
        .await?;

        let movie = self
            .find_by_normalized_title(&normalized)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("movie '{normalized}' after upsert")))?;

        Ok((movie, inserted > 0))
    }

    /// Applies the provided fields. A new title also refreshes the
    /// normalized title.
    pub async fn update(
        &self,
        movie: movies::Model,
        title: Option<&str>,
        year: Option<i32>,
        format: Option<MovieFormat>,
    ) -> Result<movies::Model, DbErr> {
        let mut active: movies::ActiveModel = movie.into();

        if let Some(title) = title {
            active.title = Set(title.trim().to_string());
            active.normalized_title = Set(normalize_title(title));
        }
        if let Some(year) = year {
            active.year = Set(year);
        }
        if let Some(format) = format {
            active.format = Set(format.as_str().to_string());
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active.update(self.conn).await
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = Movies::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_matching(&self, filter: MovieFilter<'_>) -> Result<u64, DbErr> {
        Self::filtered(filter).count(self.conn).await
    }

    /// One page of matching movies.
    ///
    /// Title ordering needs the collation in [`crate::collation`], which the
    /// database does not have, so for that column the whole filtered set is
    /// sorted here before the page is cut.
    pub async fn page(
        &self,
        filter: MovieFilter<'_>,
        sort: SortField,
        order: SortOrder,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<movies::Model>, DbErr> {
        let select = Self::filtered(filter);
        let direction = if order.is_ascending() {
            Order::Asc
        } else {
            Order::Desc
        };

        let column = match sort {
            SortField::Title => {
                let mut rows = select.all(self.conn).await?;
                rows.sort_by(|a, b| {
                    let ordering = compare_titles(&a.title, &b.title).then(a.id.cmp(&b.id));
                    if order.is_ascending() {
                        ordering
                    } else {
                        ordering.reverse()
                    }
                });

                let start = usize::try_from(offset).unwrap_or(usize::MAX);
                let take = usize::try_from(limit).unwrap_or(usize::MAX);
                return Ok(rows.into_iter().skip(start).take(take).collect());
            }
            SortField::Id => movies::Column::Id,
            SortField::Year => movies::Column::Year,
            SortField::Format => movies::Column::Format,
            SortField::CreatedAt => movies::Column::CreatedAt,
            SortField::UpdatedAt => movies::Column::UpdatedAt,
        };

        let mut select = select.order_by(column, direction.clone());
        if sort != SortField::Id {
            select = select.order_by(movies::Column::Id, direction);
        }

        select.offset(offset).limit(limit).all(self.conn).await
    }

    /// Actor filters use `IN (subquery)` rather than a join, so a movie with
    /// several matching actors still appears once and counts once.
    fn filtered(filter: MovieFilter<'_>) -> Select<Movies> {
        let mut select = Movies::find();

        if let Some(title) = filter.title {
            select = select
                .filter(movies::Column::NormalizedTitle.like(contains(&normalize_title(title))));
        }

        if let Some(actor) = filter.actor {
            select = select.filter(movies::Column::Id.in_subquery(movie_ids_with_actor_like(actor)));
        }

        if let Some(search) = filter.search {
            select = select.filter(
                Condition::any()
                    .add(movies::Column::Title.like(contains(search)))
                    .add(movies::Column::Id.in_subquery(movie_ids_with_actor_like(search))),
            );
        }

        select
    }
}

/// `%value%` with LIKE wildcards in `value` matched literally.
fn contains(value: &str) -> LikeExpr {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

fn movie_ids_with_actor_like(name: &str) -> SelectStatement {
    Query::select()
        .column((MovieActors, movie_actors::Column::MovieId))
        .from(MovieActors)
        .inner_join(
            Actors,
            Expr::col((Actors, actors::Column::Id))
                .equals((MovieActors, movie_actors::Column::ActorId)),
        )
        .and_where(Expr::col((Actors, actors::Column::Name)).like(contains(name)))
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_contains_escapes_wildcards() {
        let sql = Movies::find()
            .filter(movies::Column::Title.like(contains("100%_pure")))
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(sql.contains("pure%'"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn test_search_filter_uses_subquery() {
        let sql = MovieRepository::<sea_orm::DatabaseConnection>::filtered(MovieFilter {
            search: Some("Matrix"),
            ..Default::default()
        })
        .build(DbBackend::Sqlite)
        .to_string();

        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains("IN (SELECT"), "{sql}");
    }
}
