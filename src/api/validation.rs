use chrono::Datelike;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use super::ApiError;
use crate::domain::{MovieFormat, SortField, SortOrder};
use crate::models::movie::{DEFAULT_PAGE_LIMIT, MovieQuery, MovieUpdate, NewMovie};

pub const MAX_TITLE_CHARS: usize = 128;
pub const FIRST_FILM_YEAR: i32 = 1888;
pub const MIN_PASSWORD_CHARS: usize = 5;
pub const MIN_NAME_CHARS: usize = 3;

const TITLE_MESSAGE: &str = "Title is required and must be at least 1 character long.";
const YEAR_MESSAGE: &str = "Year must be a valid integer between 1888 and the current year.";
const FORMAT_MESSAGE: &str = "Format must be one of: VHS, DVD, Blu-ray.";
const ACTORS_MESSAGE: &str = "Actors must be a non-empty array of strings.";
const ACTOR_NAME_MESSAGE: &str = "Invalid actor name format. Please enter a valid name.";
const EMAIL_MESSAGE: &str = "Invalid email format. Please enter a valid email address.";
const PASSWORD_MESSAGE: &str = "Password must be at least 5 characters long.";
const NAME_MESSAGE: &str = "Full name must be at least 3 characters long.";
const CONFIRM_MESSAGE: &str = "Passwords do not match.";

fn actor_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Zа-яА-ЯёЁїЇєЄіІґҐ\-.,\s]+$")
            .expect("Invalid regex pattern defined in code")
    })
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("Invalid regex pattern defined in code")
    })
}

/// JSON body of `POST /movies` and `PATCH /movies/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct MovieRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub format: Option<String>,
    pub actors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Raw `GET /movies` query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListMoviesParams {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub actor: Option<String>,
    pub title: Option<String>,
    pub search: Option<String>,
}

pub fn validate_title(title: &str) -> Result<String, ApiError> {
    let trimmed = title.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::validation(TITLE_MESSAGE));
    }
    Ok(trimmed.to_string())
}

pub fn validate_year(year: i32) -> Result<i32, ApiError> {
    let current = chrono::Utc::now().year();
    if !(FIRST_FILM_YEAR..=current).contains(&year) {
        return Err(ApiError::validation(YEAR_MESSAGE));
    }
    Ok(year)
}

/// Exact spelling only; the lenient matching is reserved for import files.
pub fn validate_format(format: &str) -> Result<MovieFormat, ApiError> {
    MovieFormat::ALL
        .into_iter()
        .find(|f| f.as_str() == format)
        .ok_or_else(|| ApiError::validation(FORMAT_MESSAGE))
}

pub fn validate_actors(actors: &[String]) -> Result<Vec<String>, ApiError> {
    if actors.is_empty() {
        return Err(ApiError::validation(ACTORS_MESSAGE));
    }

    actors
        .iter()
        .map(|name| {
            let trimmed = name.trim();
            if trimmed.is_empty() || !actor_name_regex().is_match(trimmed) {
                Err(ApiError::validation(ACTOR_NAME_MESSAGE))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

pub fn validate_new_movie(request: MovieRequest) -> Result<NewMovie, ApiError> {
    let title = validate_title(request.title.as_deref().unwrap_or_default())?;
    let year = validate_year(request.year.ok_or_else(|| ApiError::validation(YEAR_MESSAGE))?)?;
    let format = validate_format(request.format.as_deref().unwrap_or_default())?;
    let actors = validate_actors(request.actors.as_deref().unwrap_or_default())?;

    Ok(NewMovie {
        title,
        year,
        format,
        actors,
    })
}

/// Fields absent from the request stay `None`; present ones obey the same
/// rules as on create.
pub fn validate_movie_update(request: MovieRequest) -> Result<MovieUpdate, ApiError> {
    Ok(MovieUpdate {
        title: request.title.as_deref().map(validate_title).transpose()?,
        year: request.year.map(validate_year).transpose()?,
        format: request.format.as_deref().map(validate_format).transpose()?,
        actors: request.actors.as_deref().map(validate_actors).transpose()?,
    })
}

/// Trimmed, lowercased address.
pub fn validate_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim();
    if !email.is_ascii() || !email_regex().is_match(email) {
        return Err(ApiError::validation(EMAIL_MESSAGE));
    }
    Ok(email.to_lowercase())
}

/// Validated registration fields: `(email, name, password)`.
pub fn validate_registration(
    request: &RegisterRequest,
) -> Result<(String, String, String), ApiError> {
    let email = validate_email(&request.email)?;

    let password = request.password.trim();
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::validation(PASSWORD_MESSAGE));
    }

    let name = request.name.trim();
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(ApiError::validation(NAME_MESSAGE));
    }

    if request.confirm_password != request.password {
        return Err(ApiError::validation(CONFIRM_MESSAGE));
    }

    Ok((email, name.to_string(), password.to_string()))
}

/// Validated login fields: `(email, password)`.
pub fn validate_login(request: &LoginRequest) -> Result<(String, String), ApiError> {
    let email = validate_email(&request.email)?;

    if request.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::validation(PASSWORD_MESSAGE));
    }

    Ok((email, request.password.trim().to_string()))
}

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MAX_LIMIT: u64 = 1000;
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between {} and {}",
            limit, MIN_LIMIT, MAX_LIMIT
        )));
    }
    Ok(limit)
}

/// Offsets are bound as signed 64-bit integers by the storage layer.
pub fn validate_offset(offset: u64) -> Result<u64, ApiError> {
    const MAX_OFFSET: u64 = i64::MAX as u64;

    if offset > MAX_OFFSET {
        return Err(ApiError::validation(format!(
            "Invalid offset: {}. Offset must be between 0 and {}",
            offset, MAX_OFFSET
        )));
    }
    Ok(offset)
}

pub fn validate_list_query(params: ListMoviesParams) -> Result<MovieQuery, ApiError> {
    let sort = params
        .sort
        .as_deref()
        .map(str::parse::<SortField>)
        .transpose()
        .map_err(ApiError::validation)?
        .unwrap_or_default();

    let order = params
        .order
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()
        .map_err(ApiError::validation)?
        .unwrap_or_default();

    Ok(MovieQuery {
        sort,
        order,
        limit: validate_limit(params.limit.unwrap_or(DEFAULT_PAGE_LIMIT))?,
        offset: validate_offset(params.offset.unwrap_or(0))?,
        actor: params.actor,
        title: params.title,
        search: params.search,
    })
}
