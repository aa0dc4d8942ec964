use serde::{Deserialize, Serialize};

use crate::domain::{MovieFormat, MovieId, SortField, SortOrder};
use crate::entities::movies;

pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Deduplication key for movie titles: surrounding whitespace removed,
/// lowercased.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub format: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<Actor>>,
}

impl From<movies::Model> for Movie {
    fn from(model: movies::Model) -> Self {
        Self {
            id: MovieId::new(model.id),
            title: model.title,
            year: model.year,
            format: model.format,
            created_at: model.created_at,
            updated_at: model.updated_at,
            actors: None,
        }
    }
}

impl Movie {
    #[must_use]
    pub fn with_actors(mut self, actors: Vec<Actor>) -> Self {
        self.actors = Some(actors);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub format: MovieFormat,
    pub actors: Vec<String>,
}

/// Partial update. Absent fields are left untouched; `actors`, when present,
/// replaces the whole cast.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub format: Option<MovieFormat>,
    pub actors: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct MovieQuery {
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: u64,
    pub offset: u64,
    pub actor: Option<String>,
    pub title: Option<String>,
    pub search: Option<String>,
}

impl Default for MovieQuery {
    fn default() -> Self {
        Self {
            sort: SortField::Id,
            order: SortOrder::Ascending,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
            actor: None,
            title: None,
            search: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    /// Matching movies ignoring `limit`/`offset`.
    pub total: u64,
}
