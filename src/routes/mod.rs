use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::catch_panic::CatchPanicLayer;

use crate::catalog::{CatalogClient, Lookup};
use crate::errors::AppError;
use crate::models::{DetailContext, HomeContext, ResourceKind, SearchContext};
use crate::render::pages;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub search_limit: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", get(search))
        .route("/user/{id}", get(user_detail))
        .route("/track/{id}", get(track_detail))
        .route("/editorial", get(editorial_list))
        .route("/editorial/{id}", get(editorial_detail))
        .route("/album/{id}", get(album_detail))
        .route("/artist/{id}", get(artist_detail))
        .route("/playlist/{id}", get(playlist_detail))
        .route("/genre", get(genre_list))
        .route("/radio", get(radio_list))
        .route("/episode/{id}", get(episode_detail))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(render_panic))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let chart = state.catalog.chart().await;
    let editorial = state.catalog.editorial().await;
    Html(pages::home_page(&HomeContext { chart, editorial }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_search_type", rename = "type")]
    pub search_type: String,
}

fn default_search_type() -> String {
    "track".to_string()
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Html<String> {
    // An empty query never reaches the upstream API.
    let results = if params.q.is_empty() {
        Lookup::Absent
    } else {
        log::info!("Searching for '{}' (type: {})", params.q, params.search_type);
        state
            .catalog
            .search(&params.search_type, &params.q, state.search_limit)
            .await
    };

    Html(pages::search_page(&SearchContext {
        results,
        query: params.q,
        search_type: params.search_type,
    }))
}

async fn user_detail(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let payload = state.catalog.user(&id).await;
    Html(pages::detail_page(&DetailContext::new(
        payload,
        format!("User {}", id),
        ResourceKind::User,
    )))
}

async fn track_detail(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let payload = state.catalog.track(&id).await;
    Html(pages::detail_page(&DetailContext::new(
        payload,
        "Track Details",
        ResourceKind::Track,
    )))
}

async fn editorial_list(State(state): State<AppState>) -> Html<String> {
    let payload = state.catalog.editorial().await;
    Html(pages::detail_page(&DetailContext::new(
        payload,
        "Editorial Picks",
        ResourceKind::Editorial,
    )))
}

async fn editorial_detail(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let payload = state.catalog.editorial_selection(&id).await;
    Html(pages::detail_page(
        &DetailContext::new(payload, "Editorial Selection", ResourceKind::EditorialDetail)
            .with_editorial_id(id),
    ))
}

async fn album_detail(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let payload = state.catalog.album(&id).await;
    Html(pages::detail_page(&DetailContext::new(
        payload,
        "Album Details",
        ResourceKind::Album,
    )))
}

/// Two independent upstream calls; either one may come back absent without
/// affecting the other.
async fn artist_detail(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let artist = state.catalog.artist(&id).await;
    let top_tracks = state.catalog.artist_top(&id, state.search_limit).await;
    Html(pages::detail_page(
        &DetailContext::new(artist, "Artist Details", ResourceKind::Artist)
            .with_top_tracks(top_tracks),
    ))
}

async fn playlist_detail(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let payload = state.catalog.playlist(&id).await;
    Html(pages::detail_page(&DetailContext::new(
        payload,
        "Playlist Details",
        ResourceKind::Playlist,
    )))
}

async fn genre_list(State(state): State<AppState>) -> Html<String> {
    let payload = state.catalog.genres().await;
    Html(pages::detail_page(&DetailContext::new(
        payload,
        "Music Genres",
        ResourceKind::Genre,
    )))
}

async fn radio_list(State(state): State<AppState>) -> Html<String> {
    let payload = state.catalog.radios().await;
    Html(pages::detail_page(&DetailContext::new(
        payload,
        "Radio Stations",
        ResourceKind::Radio,
    )))
}

async fn episode_detail(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let payload = state.catalog.episode(&id).await;
    Html(pages::detail_page(&DetailContext::new(
        payload,
        "Episode Details",
        ResourceKind::Episode,
    )))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No page at {}", uri.path()))
}

fn render_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    log::error!("Handler panicked: {}", detail);
    AppError::Internal("Something went wrong while handling the request".to_string())
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use httpmock::prelude::*;
    use serde_json::json;
    use tower::ServiceExt;

    fn test_state(base_url: &str) -> AppState {
        let config = AppConfig {
            api_base_url: base_url.to_string(),
            ..AppConfig::default()
        };
        AppState {
            catalog: Arc::new(CatalogClient::new(&config).unwrap()),
            search_limit: config.search_limit,
        }
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn search_with_empty_query_never_calls_upstream() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({"data": []}));
        });

        let state = test_state(&server.base_url());
        let params = SearchParams {
            q: String::new(),
            search_type: "track".to_string(),
        };
        let Html(html) = search(State(state), Query(params)).await;

        mock.assert_calls(0);
        assert!(html.contains("Nothing found."));
    }

    #[tokio::test]
    async fn search_type_defaults_to_track() {
        let uri: Uri = "/search?q=abc".parse().unwrap();
        let Query(params) = Query::<SearchParams>::try_from_uri(&uri).unwrap();

        assert_eq!(params.q, "abc");
        assert_eq!(params.search_type, "track");
    }

    #[tokio::test]
    async fn search_requests_the_expected_endpoint() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search/track")
                .query_param("q", "abc")
                .query_param("limit", "10");
            then.status(200).json_body(json!({"data": [
                {"id": 42, "type": "track", "title": "Abc", "artist": {"name": "Someone"}}
            ]}));
        });

        let state = test_state(&server.base_url());
        let params = SearchParams {
            q: "abc".to_string(),
            search_type: "track".to_string(),
        };
        let Html(html) = search(State(state), Query(params)).await;

        mock.assert_calls(1);
        assert!(html.contains("Abc"));
    }

    #[tokio::test]
    async fn artist_page_issues_both_calls_even_when_one_fails() {
        let server = MockServer::start();
        let artist_mock = server.mock(|when, then| {
            when.method(GET).path("/artist/27");
            then.status(200)
                .json_body(json!({"id": 27, "name": "Daft Punk", "nb_album": 36, "nb_fan": 9738556}));
        });
        let top_mock = server.mock(|when, then| {
            when.method(GET).path("/artist/27/top");
            then.status(500).body("upstream exploded");
        });

        let state = test_state(&server.base_url());
        let Html(html) = artist_detail(State(state), Path("27".to_string())).await;

        artist_mock.assert_calls(1);
        top_mock.assert_calls(1);
        assert!(html.contains("Daft Punk"));
        assert!(html.contains(r#"<section id="top-tracks">"#));
        assert!(html.contains("Nothing found."));
    }

    #[tokio::test]
    async fn unknown_path_renders_the_404_page() {
        let server = MockServer::start();
        let app = router(test_state(&server.base_url()));

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_string(response).await;
        assert!(html.contains("404 Not Found"));
        assert!(html.contains("/nope"));
    }

    #[tokio::test]
    async fn every_route_serves_html_against_a_mocked_upstream() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({"data": []}));
        });

        let paths = [
            "/",
            "/search?q=abc",
            "/user/5",
            "/track/3135556",
            "/editorial",
            "/editorial/0",
            "/album/302127",
            "/artist/27",
            "/playlist/908622995",
            "/genre",
            "/radio",
            "/episode/526673645",
        ];

        for path in paths {
            let app = router(test_state(&server.base_url()));
            let response = app
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "route {} should be 200", path);
            let html = body_string(response).await;
            assert!(html.contains("<!DOCTYPE html>"), "route {} should render html", path);
        }
    }

    #[tokio::test]
    async fn upstream_outage_still_renders_a_page() {
        // No mock server at all: connection refused everywhere.
        let app = router(test_state("http://127.0.0.1:9"));

        let response = app
            .oneshot(Request::builder().uri("/track/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Nothing found."));
    }
}
