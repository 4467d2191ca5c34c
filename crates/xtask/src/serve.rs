//! Static file server for trying the browser build locally
//!
//! Shared wasm memory is only available to cross-origin isolated pages, so
//! every response carries the COOP/COEP headers.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Response, Server};

/// Headers that make the page cross-origin isolated
const ISOLATION_HEADERS: [(&str, &str); 2] = [
    ("Cross-Origin-Opener-Policy", "same-origin"),
    ("Cross-Origin-Embedder-Policy", "require-corp"),
];

/// Map a request URL onto a file below `root`
///
/// Query strings are ignored and directory URLs resolve to `index.html`.
/// Returns None for anything that would escape `root`.
pub fn resolve(root: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let relative = path.trim_start_matches('/');

    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if relative.is_empty() || path.ends_with('/') {
        resolved.push("index.html");
    }
    Some(resolved)
}

/// Content type by file extension
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header {}: {}", name, value))
}

/// Serve `root` on localhost until the process is stopped
pub fn serve(root: &Path, port: u16) -> Result<()> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    let server = Server::http(("127.0.0.1", port))
        .map_err(|e| anyhow!("Failed to bind port {}: {}", port, e))?;

    log::info!("Serving {} at http://127.0.0.1:{}/web/", root.display(), port);

    for request in server.incoming_requests() {
        let url = request.url().to_string();

        let file = resolve(&root, &url).and_then(|path| {
            let bytes = std::fs::read(&path).ok()?;
            Some((content_type(&path), bytes))
        });

        let mut response = match file {
            Some((mime, bytes)) => {
                log::debug!("200 {}", url);
                Response::from_data(bytes).with_header(header("Content-Type", mime)?)
            }
            None => {
                log::warn!("404 {}", url);
                Response::from_data(b"not found".to_vec()).with_status_code(404)
            }
        };
        for (name, value) in ISOLATION_HEADERS {
            response.add_header(header(name, value)?);
        }

        if let Err(e) = request.respond(response) {
            log::warn!("Failed to respond to {}: {}", url, e);
        }
    }

    Ok(())
}
