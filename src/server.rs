// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::path::Component;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use axum::routing::get;
use maud::Markup;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::assets::StaticAssets;
use crate::config::Config;
use crate::context::RenderContext;
use crate::error::Fallible;
use crate::error::RenderError;
use crate::error_page::render_error_page;
use crate::home::render_home;
use crate::home::render_user_server;
use crate::session::SessionLookup;
use crate::url::url_concat;
use crate::url::url_path_join;

#[derive(Clone)]
pub struct ServerState {
    /// The hub prefix, which is the base URL of every rendered page.
    pub hub_prefix: String,
    pub assets: Arc<StaticAssets>,
    pub session: Arc<SessionLookup>,
}

impl ServerState {
    pub fn from_config(config: &Config) -> Fallible<Self> {
        let session = SessionLookup::new(config.user_header.as_deref(), config.user.as_deref())?;
        Ok(Self {
            hub_prefix: config.hub_prefix()?,
            assets: Arc::new(config.assets()?),
            session: Arc::new(session),
        })
    }

    fn context(&self, headers: &HeaderMap) -> RenderContext {
        RenderContext::new(&self.hub_prefix, self.assets.clone())
            .with_user(self.session.current_user(headers))
    }
}

pub fn router(state: ServerState) -> Router {
    let prefix = state.hub_prefix.clone();
    let app = Router::new();
    let app = app.route(&prefix, get(home));
    let app = app.route(&format!("{prefix}user/{{name}}"), get(user_server));
    let app = app.route(
        &format!("{prefix}user/{{name}}/{{*rest}}"),
        get(user_server_subpath),
    );
    let app = app.route(&format!("{prefix}static/{{*path}}"), get(static_file));
    let app = app.fallback(fallback);
    app.with_state(state)
}

pub async fn start_server(config: Config, open_browser: bool) -> Fallible<()> {
    let state = ServerState::from_config(&config)?;
    let url = format!("http://{}{}", config.bind, state.hub_prefix);
    let app = router(state);

    if open_browser {
        // Start a separate task to open the browser.
        let bind = config.bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&bind).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    log::debug!("Starting server on {}", config.bind);
    let listener = TcpListener::bind(&config.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn home(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    let ctx = state.context(&headers);
    page_response(&state, &headers, render_home(&ctx))
}

async fn user_server(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    user_response(&state, &name, &uri, &headers)
}

async fn user_server_subpath(
    State(state): State<ServerState>,
    Path((name, _rest)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    user_response(&state, &name, &uri, &headers)
}

/// Only the named user may see their server page. Anyone else is sent to log
/// in, and comes back here afterwards.
fn user_response(state: &ServerState, name: &str, uri: &Uri, headers: &HeaderMap) -> Response {
    let ctx = state.context(headers);
    let is_owner = ctx
        .current_user
        .as_ref()
        .is_some_and(|user| user.name == name);
    if !is_owner {
        let target = url_concat(&ctx.link("login"), &[("next", uri.path())]);
        log::debug!("Redirecting {} to {target}", uri.path());
        return Redirect::temporary(&target).into_response();
    }
    page_response(state, headers, render_user_server(&ctx, name))
}

/// Turns a rendered page into a response. Render failures become a 500 page
/// carrying the error message.
fn page_response(
    state: &ServerState,
    headers: &HeaderMap,
    result: Result<Markup, RenderError>,
) -> Response {
    match result {
        Ok(html) => (StatusCode::OK, Html(html.into_string())).into_response(),
        Err(e) => {
            log::error!("error: {e}");
            error_response(
                state,
                headers,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&e.to_string()),
            )
        }
    }
}

async fn static_file(
    State(state): State<ServerState>,
    Path(path): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let Some(file) = resolve_static_path(&state, &path).await else {
        return error_response(&state, &headers, StatusCode::NOT_FOUND, None);
    };
    let bytes = match tokio::fs::read(&file).await {
        Ok(bytes) => bytes,
        Err(_) => return error_response(&state, &headers, StatusCode::NOT_FOUND, None),
    };
    // Versioned URLs change whenever the content does, so they can be cached
    // for good.
    let cache = if query.contains_key("v") {
        "public, max-age=604800, immutable"
    } else {
        "no-cache"
    };
    (
        StatusCode::OK,
        [(CONTENT_TYPE, content_type(&path)), (CACHE_CONTROL, cache)],
        bytes,
    )
        .into_response()
}

/// Maps a request path to a file in the static directory. Paths that could
/// leave the directory, including through symlinks, are rejected.
async fn resolve_static_path(state: &ServerState, path: &str) -> Option<PathBuf> {
    let directory = state.assets.directory()?;
    let requested = std::path::Path::new(path);
    let safe = requested
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if !safe || path.is_empty() {
        return None;
    }
    let full = tokio::fs::canonicalize(directory.join(requested)).await.ok()?;
    if !full.starts_with(directory) {
        return None;
    }
    let metadata = tokio::fs::metadata(&full).await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    Some(full)
}

fn content_type(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match extension {
        "css" => "text/css",
        "js" => "text/javascript",
        "html" => "text/html; charset=utf-8",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Paths outside the hub prefix are redirected into it; unknown paths inside
/// it get a 404 page.
async fn fallback(State(state): State<ServerState>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path();
    if path.starts_with(&state.hub_prefix) {
        return error_response(&state, &headers, StatusCode::NOT_FOUND, None);
    }
    let target = if format!("{path}/") == state.hub_prefix {
        state.hub_prefix.clone()
    } else {
        url_path_join(&[&state.hub_prefix, path])
    };
    log::debug!("Redirecting {path} to {target}");
    Redirect::temporary(&target).into_response()
}

fn error_response(
    state: &ServerState,
    headers: &HeaderMap,
    status: StatusCode,
    message: Option<&str>,
) -> Response {
    let ctx = state.context(headers);
    match render_error_page(&ctx, status, message) {
        Ok(html) => (status, Html(html.into_string())).into_response(),
        Err(e) => {
            log::error!("error: {e}");
            (status, "Internal Server Error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;
    use std::fs::write;
    use std::path::PathBuf;
    use std::time::Duration;

    use reqwest::StatusCode;
    use reqwest::redirect::Policy;
    use tempfile::TempDir;
    use tempfile::tempdir;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;

    use super::*;

    const STYLESHEET: &str = "body { margin: 0; }";

    fn static_dir() -> Fallible<TempDir> {
        let dir = tempdir()?;
        create_dir_all(dir.path().join("css"))?;
        write(dir.path().join("css/style.min.css"), STYLESHEET)?;
        Ok(dir)
    }

    /// Starts a server on a free port and waits until it accepts
    /// connections. Returns the address.
    async fn serve(static_dir: PathBuf, user: Option<&str>) -> String {
        let port = portpicker::pick_unused_port().unwrap();
        let bind = format!("127.0.0.1:{port}");
        let config = Config {
            bind: bind.clone(),
            static_dir: Some(static_dir),
            user: user.map(str::to_string),
            user_header: Some("X-Remote-User".to_string()),
            ..Config::default()
        };
        spawn(async move { start_server(config, false).await });
        loop {
            if let Ok(stream) = TcpStream::connect(&bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        format!("http://{bind}")
    }

    #[tokio::test]
    async fn test_start_server_with_missing_static_dir() -> Fallible<()> {
        let config = Config {
            static_dir: Some(PathBuf::from("./derpherp")),
            ..Config::default()
        };
        let result = start_server(config, false).await;
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: static directory does not exist.");
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e_authenticated() -> Fallible<()> {
        let dir = static_dir()?;
        let base = serve(dir.path().to_path_buf(), Some("alice")).await;

        // Hit the home page.
        let response = reqwest::get(format!("{base}/hub/")).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await.unwrap();
        assert!(html.contains(r#"href="/hub/logout""#));
        assert!(!html.contains("/hub/login"));
        assert!(html.contains(r#""user":"alice""#));
        assert!(html.contains(r#"id="stop-my-server-dialog""#));
        // The stylesheet exists, so its link carries a version.
        assert!(html.contains("/hub/static/css/style.min.css?v="));

        // A proxy-supplied user takes precedence.
        let response = reqwest::Client::new()
            .get(format!("{base}/hub/"))
            .header("X-Remote-User", "bob")
            .send()
            .await
            .unwrap();
        let html = response.text().await.unwrap();
        assert!(html.contains(r#""user":"bob""#));
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e_anonymous() -> Fallible<()> {
        let dir = static_dir()?;
        let base = serve(dir.path().to_path_buf(), None).await;

        let response = reqwest::get(format!("{base}/hub/")).await.unwrap();
        assert!(response.status().is_success());
        let html = response.text().await.unwrap();
        assert!(html.contains(r#"href="/hub/login""#));
        assert!(!html.contains("/hub/logout"));
        assert!(!html.contains(r#""user""#));
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e_static() -> Fallible<()> {
        let dir = static_dir()?;
        let base = serve(dir.path().to_path_buf(), None).await;

        // Hit the stylesheet.
        let response = reqwest::get(format!("{base}/hub/static/css/style.min.css"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");
        assert_eq!(response.headers().get("cache-control").unwrap(), "no-cache");
        assert_eq!(response.text().await.unwrap(), STYLESHEET);

        // Versioned requests are cached.
        let response = reqwest::get(format!("{base}/hub/static/css/style.min.css?v=abc"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("cache-control").unwrap(),
            "public, max-age=604800, immutable"
        );

        // Hit a missing file.
        let response = reqwest::get(format!("{base}/hub/static/css/missing.css"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = response.text().await.unwrap();
        assert!(html.contains("404 : Not Found"));
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e_not_found_and_redirects() -> Fallible<()> {
        let dir = static_dir()?;
        let base = serve(dir.path().to_path_buf(), None).await;

        // Unknown path under the prefix.
        let response = reqwest::get(format!("{base}/hub/herp-derp")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = response.text().await.unwrap();
        assert!(html.contains("<title>404 Not Found</title>"));

        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();

        // The root is redirected into the prefix.
        let response = client.get(format!("{base}/")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get("location").unwrap(), "/hub/");

        // So is any other path outside it.
        let response = client.get(format!("{base}/foo/bar")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get("location").unwrap(), "/hub/foo/bar");

        // The prefix without its trailing slash.
        let response = client.get(format!("{base}/hub")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get("location").unwrap(), "/hub/");
        Ok(())
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("css/style.min.css"), "text/css");
        assert_eq!(content_type("js/home.js"), "text/javascript");
        assert_eq!(content_type("images/favicon.ico"), "image/x-icon");
        assert_eq!(content_type("LICENSE"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_e2e_user_server() -> Fallible<()> {
        let dir = static_dir()?;
        let base = serve(dir.path().to_path_buf(), Some("alice")).await;

        // The owner sees their page.
        let response = reqwest::get(format!("{base}/hub/user/alice")).await.unwrap();
        assert!(response.status().is_success());
        let html = response.text().await.unwrap();
        assert!(html.contains("<title>JupyterHub - alice</title>"));
        assert!(html.contains("No notebook server is running for this user."));

        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();

        // Anyone else is sent to log in.
        let response = client
            .get(format!("{base}/hub/user/bob"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/hub/login?next=%2Fhub%2Fuser%2Fbob"
        );

        // Including for paths below the server.
        let response = client
            .get(format!("{base}/hub/user/bob/tree"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/hub/login?next=%2Fhub%2Fuser%2Fbob%2Ftree"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e_user_server_anonymous() -> Fallible<()> {
        let dir = static_dir()?;
        let base = serve(dir.path().to_path_buf(), None).await;
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();
        let response = client
            .get(format!("{base}/hub/user/alice"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/hub/login?next=%2Fhub%2Fuser%2Falice"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_page_response_error_message() -> Fallible<()> {
        let state = ServerState::from_config(&Config::default())?;
        let result = Err(RenderError::InvalidSpec("title must not be empty".to_string()));
        let response = page_response(&state, &HeaderMap::new(), result);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("500 : Internal Server Error"));
        assert!(html.contains("invalid modal spec: title must not be empty"));
        Ok(())
    }

    fn state_for(dir: &TempDir) -> Fallible<ServerState> {
        let config = Config {
            static_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        ServerState::from_config(&config)
    }

    #[tokio::test]
    async fn test_resolve_static_path_rejects_traversal() -> Fallible<()> {
        let dir = static_dir()?;
        let state = state_for(&dir)?;
        assert!(resolve_static_path(&state, "css/style.min.css").await.is_some());
        assert!(resolve_static_path(&state, "../etc/passwd").await.is_none());
        assert!(resolve_static_path(&state, "/etc/passwd").await.is_none());
        assert!(resolve_static_path(&state, "css").await.is_none());
        assert!(resolve_static_path(&state, "").await.is_none());
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_static_path_rejects_symlinks() -> Fallible<()> {
        use std::os::unix::fs::symlink;

        let dir = static_dir()?;
        let outside = tempdir()?;
        write(outside.path().join("secret.txt"), "secret")?;
        symlink(outside.path(), dir.path().join("linked"))?;
        symlink(
            outside.path().join("secret.txt"),
            dir.path().join("css/secret.css"),
        )?;
        let state = state_for(&dir)?;
        assert!(resolve_static_path(&state, "linked/secret.txt").await.is_none());
        assert!(resolve_static_path(&state, "css/secret.css").await.is_none());
        assert!(resolve_static_path(&state, "css/style.min.css").await.is_some());
        Ok(())
    }
}
