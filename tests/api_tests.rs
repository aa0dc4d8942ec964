use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use marquee::config::Config;
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceExt;

const BOUNDARY: &str = "marquee-test-boundary";

struct TestApp {
    router: Router,
    db_path: PathBuf,
    upload_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.db_path.display()));
        }
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let id = uuid::Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("marquee-api-test-{id}.db"));
    let upload_dir = std::env::temp_dir().join(format!("marquee-api-uploads-{id}"));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.auth.jwt_secret = "test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.import.upload_dir = upload_dir.display().to_string();
    configure(&mut config);

    let state = marquee::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");

    TestApp {
        router: marquee::api::router(state),
        db_path,
        upload_dir,
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => request
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/users",
        None,
        Some(json!({
            "email": email,
            "name": "Tester",
            "password": "secret-password",
            "confirmPassword": "secret-password",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create_movie(app: &Router, token: &str, title: &str, actors: &[&str]) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/movies",
        Some(token),
        Some(json!({
            "title": title,
            "year": 1999,
            "format": "DVD",
            "actors": actors,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

fn multipart_body(field: &str, content_type: &str, content: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"movies.txt\"\r\n\
         Content-Type: {content_type}\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

async fn upload(app: &Router, token: &str, content_type: &str, content: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/movies/import")
        .header("Authorization", format!("Bearer {token}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body("movies", content_type, content)))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn titles(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;
    let (status, body) = send(&app.router, "GET", "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 1);
}

#[tokio::test]
async fn test_register_and_login() {
    let app = spawn_app().await;
    let token = register(&app.router, "neo@matrix.io").await;
    assert_eq!(token.split('.').count(), 3);

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/sessions",
        None,
        Some(json!({ "email": "neo@matrix.io", "password": "secret-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 1);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = spawn_app().await;
    register(&app.router, "morpheus@matrix.io").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/users",
        None,
        Some(json!({
            "email": "Morpheus@Matrix.io",
            "name": "Morpheus",
            "password": "another-one",
            "confirmPassword": "another-one",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "status": 0, "message": "Email already exists." }));
}

#[tokio::test]
async fn test_registration_validation() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/users",
        None,
        Some(json!({
            "email": "tank@matrix.io",
            "name": "Tank",
            "password": "secret-password",
            "confirmPassword": "different",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 0);
    assert_eq!(body["message"], "Passwords do not match.");
}

#[tokio::test]
async fn test_login_errors_do_not_leak_existence() {
    let app = spawn_app().await;
    register(&app.router, "trinity@matrix.io").await;

    let (wrong_password_status, wrong_password) = send(
        &app.router,
        "POST",
        "/api/v1/sessions",
        None,
        Some(json!({ "email": "trinity@matrix.io", "password": "not-the-password" })),
    )
    .await;

    let (unknown_email_status, unknown_email) = send(
        &app.router,
        "POST",
        "/api/v1/sessions",
        None,
        Some(json!({ "email": "smith@matrix.io", "password": "not-the-password" })),
    )
    .await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["message"], "Invalid email or password.");
}

#[tokio::test]
async fn test_movies_require_token() {
    let app = spawn_app().await;

    let (status, body) = send(&app.router, "GET", "/api/v1/movies", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 0);

    let (status, _) = send(&app.router, "GET", "/api/v1/movies", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_movie_crud() {
    let app = spawn_app().await;
    let token = register(&app.router, "crud@matrix.io").await;

    let movie = create_movie(
        &app.router,
        &token,
        "The Matrix",
        &["Keanu Reeves", "Carrie-Anne Moss"],
    )
    .await;
    let id = movie["id"].as_i64().unwrap();
    assert_eq!(movie["actors"].as_array().unwrap().len(), 2);
    assert!(movie["createdAt"].is_string());

    let (status, body) = send(
        &app.router,
        "GET",
        &format!("/api/v1/movies/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "The Matrix");

    let (status, body) = send(
        &app.router,
        "PATCH",
        &format!("/api/v1/movies/{id}"),
        Some(&token),
        Some(json!({ "year": 1998, "actors": ["Laurence Fishburne"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["year"], 1998);
    assert_eq!(body["data"]["title"], "The Matrix");
    assert_eq!(body["data"]["actors"][0]["name"], "Laurence Fishburne");
    assert_eq!(body["data"]["actors"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app.router,
        "DELETE",
        &format!("/api/v1/movies/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app.router,
        "GET",
        &format!("/api/v1/movies/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 0);
}

#[tokio::test]
async fn test_missing_movie_is_not_found() {
    let app = spawn_app().await;
    let token = register(&app.router, "missing@matrix.io").await;

    let (status, _) = send(&app.router, "GET", "/api/v1/movies/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app.router,
        "PATCH",
        "/api/v1/movies/999",
        Some(&token),
        Some(json!({ "year": 2000 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app.router, "DELETE", "/api/v1/movies/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_title_conflicts_without_writes() {
    let app = spawn_app().await;
    let token = register(&app.router, "dupes@matrix.io").await;
    create_movie(&app.router, &token, "Heat", &["Al Pacino"]).await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/movies",
        Some(&token),
        Some(json!({
            "title": "  HEAT ",
            "year": 1995,
            "format": "VHS",
            "actors": ["Robert De Niro"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Movie already exists.");

    let (_, body) = send(&app.router, "GET", "/api/v1/movies", Some(&token), None).await;
    assert_eq!(body["meta"]["total"], 1);

    let (_, body) = send(
        &app.router,
        "GET",
        "/api/v1/movies?actor=De%20Niro",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_renaming_onto_existing_title_conflicts() {
    let app = spawn_app().await;
    let token = register(&app.router, "rename@matrix.io").await;
    create_movie(&app.router, &token, "Heat", &["Al Pacino"]).await;
    let ronin = create_movie(&app.router, &token, "Ronin", &["Jean Reno"]).await;
    let id = ronin["id"].as_i64().unwrap();

    let (status, body) = send(
        &app.router,
        "PATCH",
        &format!("/api/v1/movies/{id}"),
        Some(&token),
        Some(json!({ "title": " heat ", "actors": ["Robert De Niro"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Movie already exists.");

    let (status, body) = send(
        &app.router,
        "GET",
        &format!("/api/v1/movies/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Ronin");
    assert_eq!(body["data"]["actors"][0]["name"], "Jean Reno");
    assert_eq!(body["data"]["actors"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app.router,
        "PATCH",
        &format!("/api/v1/movies/{id}"),
        Some(&token),
        Some(json!({ "title": "RONIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["title"], "RONIN");
}

#[tokio::test]
async fn test_invalid_movie_is_rejected() {
    let app = spawn_app().await;
    let token = register(&app.router, "invalid@matrix.io").await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/movies",
        Some(&token),
        Some(json!({
            "title": "Metropolis",
            "year": 1850,
            "format": "DVD",
            "actors": ["Brigitte Helm"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 0);

    let (status, _) = send(
        &app.router,
        "POST",
        "/api/v1/movies",
        Some(&token),
        Some(json!({
            "title": "Metropolis",
            "year": 1927,
            "format": "Betamax",
            "actors": ["Brigitte Helm"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_keeps_actors() {
    let app = spawn_app().await;
    let token = register(&app.router, "orphans@matrix.io").await;

    let first = create_movie(&app.router, &token, "Speed", &["Sandra Bullock"]).await;
    let actor_id = first["actors"][0]["id"].clone();

    let (status, _) = send(
        &app.router,
        "DELETE",
        &format!("/api/v1/movies/{}", first["id"]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let second = create_movie(&app.router, &token, "Gravity", &["Sandra Bullock"]).await;
    assert_eq!(second["actors"][0]["id"], actor_id);
}

#[tokio::test]
async fn test_list_filters_and_search() {
    let app = spawn_app().await;
    let token = register(&app.router, "search@matrix.io").await;

    create_movie(&app.router, &token, "Blade Runner", &["Harrison Ford", "Rutger Hauer"]).await;
    create_movie(&app.router, &token, "Witness", &["Harrison Ford"]).await;
    create_movie(&app.router, &token, "Harrison's Flowers", &["Andie MacDowell"]).await;

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/v1/movies?search=harrison",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(titles(&body).len(), 3);

    let (_, body) = send(
        &app.router,
        "GET",
        "/api/v1/movies?actor=Ford&sort=title",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(titles(&body), vec!["Blade Runner", "Witness"]);

    let (_, body) = send(
        &app.router,
        "GET",
        "/api/v1/movies?title=RUNNER",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(titles(&body), vec!["Blade Runner"]);
}

#[tokio::test]
async fn test_list_sort_and_pagination() {
    let app = spawn_app().await;
    let token = register(&app.router, "sorting@matrix.io").await;

    for title in ["banana", "Cherry", "apple", "Яблуко", "Ґава", "Гарбуз"] {
        create_movie(&app.router, &token, title, &["Some Actor"]).await;
    }

    let (_, body) = send(
        &app.router,
        "GET",
        "/api/v1/movies?sort=title&order=ASC",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(
        titles(&body),
        vec!["apple", "banana", "Cherry", "Гарбуз", "Ґава", "Яблуко"]
    );

    let (_, body) = send(
        &app.router,
        "GET",
        "/api/v1/movies?sort=title&order=desc&limit=2&offset=1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(titles(&body), vec!["Ґава", "Гарбуз"]);
    assert_eq!(body["meta"]["total"], 6);

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/v1/movies?limit=0",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/v1/movies?sort=rating",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_rejects_out_of_range_offset() {
    let app = spawn_app().await;
    let token = register(&app.router, "offset@matrix.io").await;

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/v1/movies?offset=9223372036854775808",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 0);

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/v1/movies?offset=9223372036854775807",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_import_upload() {
    let app = spawn_app().await;
    let token = register(&app.router, "import@matrix.io").await;

    let content = "Title: Se7en\nRelease Year: 1995\nFormat: DVD\nStars: Morgan Freeman, Brad Pitt\n\n\
                   Title: Fargo\nRelease Year: 1996\nFormat: blu-ray\nStars: Frances McDormand\n";

    let (status, body) = upload(&app.router, &token, "text/plain", content).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["meta"]["imported"], 2);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["title"], "Se7en");
    assert_eq!(body["data"][0]["actors"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][1]["format"], "Blu-ray");

    let (status, body) = upload(&app.router, &token, "text/plain", content).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["imported"], body["meta"]["total"]);

    let (_, body) = send(&app.router, "GET", "/api/v1/movies", Some(&token), None).await;
    assert_eq!(body["meta"]["total"], 2);

    let leftovers = std::fs::read_dir(&app.upload_dir).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_import_rejects_other_media_types() {
    let app = spawn_app().await;
    let token = register(&app.router, "mime@matrix.io").await;

    let (status, body) = upload(&app.router, &token, "application/pdf", "%PDF-1.7").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["status"], 0);
}

#[tokio::test]
async fn test_import_incomplete_file_writes_nothing() {
    let app = spawn_app().await;
    let token = register(&app.router, "partial@matrix.io").await;

    let content = "Title: Alien\nRelease Year: 1979\nFormat: VHS\nStars: Sigourney Weaver\n\n\
                   Title: Aliens\nFormat: DVD\n";

    let (status, body) = upload(&app.router, &token, "text/plain", content).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Aliens"));

    let (_, body) = send(&app.router, "GET", "/api/v1/movies", Some(&token), None).await;
    assert_eq!(body["meta"]["total"], 0);

    let leftovers = std::fs::read_dir(&app.upload_dir).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_import_empty_file() {
    let app = spawn_app().await;
    let token = register(&app.router, "empty@matrix.io").await;

    let (status, body) = upload(&app.router, &token, "text/plain", "\n\n  \n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "File is empty or invalid format");
}

#[tokio::test]
async fn test_import_rejects_oversized_file() {
    let app = spawn_app_with(|config| config.import.max_upload_bytes = 64).await;
    let token = register(&app.router, "oversized@matrix.io").await;

    let content = "Title: Se7en\nRelease Year: 1995\nFormat: DVD\nStars: Morgan Freeman\n\n".repeat(8);
    assert!(content.len() > 64);

    let (status, body) = upload(&app.router, &token, "text/plain", &content).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{body}");
    assert_eq!(body["status"], 0);

    let (_, body) = send(&app.router, "GET", "/api/v1/movies", Some(&token), None).await;
    assert_eq!(body["meta"]["total"], 0);

    let leftovers = std::fs::read_dir(&app.upload_dir)
        .map(Iterator::count)
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
}
