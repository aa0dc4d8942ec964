//! `SeaORM` implementation of the `ImportService` trait.

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use crate::config::IncompleteRecordPolicy;
use crate::db::{ActorRepository, MovieActorRepository, MovieRepository};
use crate::domain::MovieFormat;
use crate::entities::movies;
use crate::models::movie::{Movie, normalize_title};
use crate::parser::{ParsedMovie, parse_movie_file};
use crate::services::import_service::{
    EMPTY_FILE_MESSAGE, ImportError, ImportService, ImportSummary,
};

pub struct SeaOrmImportService {
    policy: IncompleteRecordPolicy,
}

impl SeaOrmImportService {
    #[must_use]
    pub const fn new(policy: IncompleteRecordPolicy) -> Self {
        Self { policy }
    }
}

/// What is wrong with a record, or `None` when it can be imported as is.
fn incompleteness(record: &ParsedMovie) -> Option<String> {
    let mut problems: Vec<String> = record
        .missing_fields()
        .into_iter()
        .map(|field| format!("missing {field}"))
        .collect();

    if let Some(format) = &record.format
        && let Err(e) = format.parse::<MovieFormat>()
    {
        problems.push(e);
    }

    if problems.is_empty() {
        None
    } else {
        Some(problems.join(", "))
    }
}

fn parsed_format(record: &ParsedMovie) -> Option<MovieFormat> {
    record.format.as_deref().and_then(|f| f.parse().ok())
}

impl SeaOrmImportService {
    /// Resolves the movie a record refers to. `None` means the record names
    /// a movie that does not exist yet and lacks the fields to create it.
    async fn resolve_movie(
        txn: &DatabaseTransaction,
        record: &ParsedMovie,
    ) -> Result<Option<(movies::Model, bool)>, ImportError> {
        let repo = MovieRepository::new(txn);

        match (record.release_year, parsed_format(record)) {
            (Some(year), Some(format)) => {
                Ok(Some(repo.find_or_create(&record.title, year, format).await?))
            }
            _ => Ok(repo
                .find_by_normalized_title(&normalize_title(&record.title))
                .await?
                .map(|movie| (movie, false))),
        }
    }
}

#[async_trait]
impl ImportService for SeaOrmImportService {
    async fn import_text(
        &self,
        txn: &DatabaseTransaction,
        content: &str,
    ) -> Result<ImportSummary, ImportError> {
        let records: Vec<ParsedMovie> = parse_movie_file(content).collect();

        if records.is_empty() {
            return Err(ImportError::Validation(EMPTY_FILE_MESSAGE.to_string()));
        }

        self.reconcile(txn, records).await
    }

    async fn reconcile(
        &self,
        txn: &DatabaseTransaction,
        records: Vec<ParsedMovie>,
    ) -> Result<ImportSummary, ImportError> {
        let mut summary = ImportSummary {
            total: records.len(),
            ..Default::default()
        };

        let records: Vec<ParsedMovie> = match self.policy {
            IncompleteRecordPolicy::Reject => {
                if let Some((record, problem)) = records
                    .iter()
                    .find_map(|r| incompleteness(r).map(|p| (r, p)))
                {
                    return Err(ImportError::Validation(format!(
                        "Movie '{}' is incomplete: {problem}",
                        record.title
                    )));
                }
                records
            }
            IncompleteRecordPolicy::Skip => records
                .into_iter()
                .filter(|r| incompleteness(r).is_none())
                .collect(),
            IncompleteRecordPolicy::Import => records,
        };
        summary.skipped = summary.total - records.len();

        let actors = ActorRepository::new(txn);
        let links = MovieActorRepository::new(txn);
        let mut resolved: Vec<movies::Model> = Vec::with_capacity(records.len());

        for record in &records {
            let Some((movie, created)) = Self::resolve_movie(txn, record).await? else {
                debug!(title = %record.title, "Skipping record for unknown movie");
                summary.skipped += 1;
                continue;
            };

            if created {
                summary.created_movies += 1;
            }

            for star in &record.stars {
                let (actor, created) = actors.find_or_create(star).await?;
                if created {
                    summary.created_actors += 1;
                }
                links.link(movie.id, actor.id).await?;
            }

            resolved.push(movie);
        }

        let ids: Vec<i32> = resolved.iter().map(|m| m.id).collect();
        let cast = links.actors_for_movies(&ids).await?;

        summary.movies = resolved
            .into_iter()
            .map(|model| {
                let actors = cast.get(&model.id).cloned().unwrap_or_default();
                Movie::from(model).with_actors(actors)
            })
            .collect();
        summary.imported = summary.movies.len();

        info!(
            imported = summary.imported,
            total = summary.total,
            created_movies = summary.created_movies,
            created_actors = summary.created_actors,
            skipped = summary.skipped,
            "Import finished"
        );

        Ok(summary)
    }
}
