use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use std::sync::Arc;

use super::validation::{
    ListMoviesParams, MovieRequest, validate_list_query, validate_movie_update, validate_new_movie,
};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::MovieId;
use crate::models::movie::Movie;

fn movie_id(id: Result<Path<i32>, PathRejection>) -> Result<MovieId, ApiError> {
    let Path(id) = id?;
    Ok(MovieId::new(id))
}

/// POST /movies
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Movie>>), ApiError> {
    let Json(request) = payload?;
    let movie = validate_new_movie(request)?;

    let txn = state.store().begin().await?;
    let created = state.catalog().create(&txn, movie).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// GET /movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    let movie = state.catalog().get_by_id(movie_id(id)?).await?;
    Ok(Json(ApiResponse::success(movie)))
}

/// GET /movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListMoviesParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Movie>>>, ApiError> {
    let Query(params) = params?;
    let query = validate_list_query(params)?;

    let page = state.catalog().list(&query).await?;

    Ok(Json(
        ApiResponse::success(page.movies).with_meta(json!({ "total": page.total })),
    ))
}

/// PATCH /movies/{id}
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    let Json(request) = payload?;
    let changes = validate_movie_update(request)?;

    let txn = state.store().begin().await?;
    let updated = state
        .catalog()
        .update(&txn, movie_id(id)?, changes)
        .await?;
    txn.commit().await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /movies/{id}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let txn = state.store().begin().await?;
    state.catalog().delete(&txn, movie_id(id)?).await?;
    txn.commit().await?;

    Ok(Json(ApiResponse::ok()))
}
