//! Local preview server.
//!
//! Pages are rendered per request from a fresh content load, so edits pushed
//! by `enju admin` show up on the next reload. Other paths are served as files
//! from the site root.
//!
//! # Routes
//!
//! | Path                          | Response                             |
//! |-------------------------------|--------------------------------------|
//! | `/`, `/index.html`            | home page                            |
//! | `/sobre.html`                 | about page                           |
//! | `/pacote-detalhes.html?id=..` | package detail (inline "not found")  |
//! | anything else                 | file under the site root, else 404   |
//!
//! A page request that finds no content (API and fallback both failing)
//! answers `503`.

use crate::{
    client::ContentClient,
    config::SiteConfig,
    content::Document,
    log,
    render::{DetailLinks, Page, RenderOptions, package_id_from_query, render_html},
    utils::mime::guess_content_type,
};
use anyhow::{Context, Result};
use std::{
    fs,
    io::Cursor,
    net::{IpAddr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the preview server. Blocks until Ctrl+C is received.
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let interface: IpAddr = config.serve.interface.parse()?;
    let client = ContentClient::from_config(config)?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config, &client) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Routing
// ============================================================================

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Page(Page),
    File(PathBuf),
    NotFound,
}

/// Resolve a request URL (path plus optional query) against the site root.
///
/// Hidden paths, the config file and the token state file are never served.
fn route(url: &str, config: &SiteConfig) -> Route {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let path = urlencoding::decode(path)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    let path = path.trim_matches('/');

    match path {
        "" | "index.html" => return Route::Page(Page::Home),
        "sobre.html" => return Route::Page(Page::About),
        "pacote-detalhes.html" => {
            return Route::Page(Page::PackageDetail(package_id_from_query(query)));
        }
        _ => {}
    }

    // Only plain, visible segments; `..`, `.env` and absolute parts never match
    let relative = Path::new(path);
    let plain = relative.components().all(|c| match c {
        Component::Normal(segment) => !segment.to_string_lossy().starts_with('.'),
        _ => false,
    });
    if !plain {
        return Route::NotFound;
    }

    let local = config.get_root().join(relative);
    let file = if local.is_file() {
        local
    } else if local.join("index.html").is_file() {
        local.join("index.html")
    } else {
        return Route::NotFound;
    };

    if is_private(&file, config) {
        Route::NotFound
    } else {
        Route::File(file)
    }
}

/// Whether `file` is the config file or the token state file.
fn is_private(file: &Path, config: &SiteConfig) -> bool {
    let resolve = |path: &Path| path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let file = resolve(file);
    [&config.config_path, &config.api.state]
        .into_iter()
        .any(|private| resolve(private.as_path()) == file)
}

// ============================================================================
// Request Handling
// ============================================================================

/// Status, content type and body of a reply.
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.as_bytes().to_vec(),
        }
    }
}

fn handle_request(request: Request, config: &SiteConfig, client: &ContentClient) -> Result<()> {
    let reply = match route(request.url(), config) {
        Route::Page(page) => render_reply(&page, client.load().as_ref(), config),
        Route::File(path) => file_reply(&path)?,
        Route::NotFound => Reply::text(404, "404 Not Found"),
    };

    let content_type = Header::from_bytes("Content-Type", reply.content_type)
        .map_err(|()| anyhow::anyhow!("invalid content type `{}`", reply.content_type))?;
    let length = reply.body.len();
    let response = Response::new(
        StatusCode(reply.status),
        vec![content_type],
        Cursor::new(reply.body),
        Some(length),
        None,
    );
    request.respond(response)?;
    Ok(())
}

fn render_reply(page: &Page, document: Option<&Document>, config: &SiteConfig) -> Reply {
    let Some(document) = document else {
        return Reply::text(503, "Content unavailable: the API and the fallback file both failed");
    };
    let options = RenderOptions::from_config(config, DetailLinks::Query);
    Reply {
        status: 200,
        content_type: "text/html; charset=utf-8",
        body: render_html(page, document, &options).into_bytes(),
    }
}

fn file_reply(path: &Path) -> Result<Reply> {
    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Reply {
        status: 200,
        content_type: guess_content_type(path),
        body,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config.config_path = root.join("enju.toml");
        config.api.state = root.join(".enju/state.json");
        config
    }

    #[test]
    fn test_route_pages() {
        let config = config_at(Path::new("/nonexistent"));
        assert_eq!(route("/", &config), Route::Page(Page::Home));
        assert_eq!(route("/index.html", &config), Route::Page(Page::Home));
        assert_eq!(route("/sobre.html", &config), Route::Page(Page::About));
        assert_eq!(
            route("/pacote-detalhes.html?id=package-namibe", &config),
            Route::Page(Page::PackageDetail(Some("package-namibe".into())))
        );
        assert_eq!(
            route("/pacote-detalhes.html", &config),
            Route::Page(Page::PackageDetail(None))
        );
        assert_eq!(route("/missing.png", &config), Route::NotFound);
    }

    #[test]
    fn test_route_files_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_at(dir.path());
        fs::create_dir_all(dir.path().join("assets/css")).unwrap();
        fs::write(dir.path().join("assets/css/style.css"), "body{}").unwrap();
        fs::create_dir_all(dir.path().join("admin")).unwrap();
        fs::write(dir.path().join("admin/index.html"), "<p>admin</p>").unwrap();

        assert_eq!(
            route("/assets/css/style.css?v=2", &config),
            Route::File(dir.path().join("assets/css/style.css"))
        );
        assert_eq!(
            route("/admin/", &config),
            Route::File(dir.path().join("admin/index.html"))
        );
    }

    #[test]
    fn test_route_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        fs::create_dir_all(&site).unwrap();
        fs::write(dir.path().join("secret.txt"), "x").unwrap();
        let config = config_at(&site);

        assert_eq!(route("/../secret.txt", &config), Route::NotFound);
        assert_eq!(route("/%2e%2e/secret.txt", &config), Route::NotFound);
    }

    #[test]
    fn test_route_hides_config_and_token() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("enju.toml"), "").unwrap();
        fs::create_dir_all(root.join(".enju")).unwrap();
        fs::write(root.join(".enju/state.json"), r#"{"enju_token":"tok"}"#).unwrap();
        fs::write(root.join(".env"), "SECRET=1").unwrap();

        let config = config_at(root);
        assert_eq!(route("/enju.toml", &config), Route::NotFound);
        assert_eq!(route("/.enju/state.json", &config), Route::NotFound);
        assert_eq!(route("/%2Eenju/state.json", &config), Route::NotFound);
        assert_eq!(route("/.env", &config), Route::NotFound);

        // A state file outside any dot directory is still refused
        let mut config = config_at(root);
        fs::create_dir_all(root.join("private")).unwrap();
        fs::write(root.join("private/token.json"), "{}").unwrap();
        config.api.state = root.join("private/token.json");
        assert_eq!(route("/private/token.json", &config), Route::NotFound);
    }

    #[test]
    fn test_render_reply() {
        let config = SiteConfig::default();
        let document = Document::from_json(include_str!("embed/content-data.json")).unwrap();

        let reply = render_reply(
            &Page::PackageDetail(Some("package-kalandula".into())),
            Some(&document),
            &config,
        );
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "text/html; charset=utf-8");
        let html = String::from_utf8(reply.body).unwrap();
        assert!(html.contains("Quedas de Kalandula"));

        let home = String::from_utf8(render_reply(&Page::Home, Some(&document), &config).body)
            .unwrap();
        assert!(home.contains("pacote-detalhes.html?id=package-namibe"));
    }

    #[test]
    fn test_render_reply_without_content() {
        let reply = render_reply(&Page::Home, None, &SiteConfig::default());
        assert_eq!(reply.status, 503);
    }

    #[test]
    fn test_file_reply_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let reply = file_reply(&path).unwrap();
        assert_eq!(reply.content_type, "image/png");
        assert_eq!(reply.body.len(), 4);
    }
}
