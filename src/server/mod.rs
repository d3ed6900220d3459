//! Browser session: one page with the search form, the table, the CSV
//! download and the map. Every request runs the whole pipeline again.

pub mod response;
pub mod router;

use anyhow::{Context, Result};
use astra::{Request, Response, Server};
use std::net::SocketAddr;

use crate::api::ElementSource;
pub use response::{GENERIC_FAILURE, ServerError, error_response};
pub use router::{Settings, handle};

/// Handle a request, turning failures into HTML error pages
pub fn respond(req: &Request, source: &dyn ElementSource, settings: &Settings) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    match handle(req, source, settings) {
        Ok(resp) => {
            tracing::info!(%method, %uri, status = resp.status().as_u16(), "request handled");
            resp
        }
        Err(err) => {
            let resp = error_response(&err);
            match err.status() {
                404 => tracing::info!(%method, %uri, "not found"),
                _ => {
                    let chain = format!("{:#}", anyhow::Error::new(err));
                    tracing::error!(%method, %uri, error = %chain, "request failed");
                }
            }
            resp
        }
    }
}

/// Serve requests one at a time until the process is stopped
pub fn serve<S>(bind: &str, source: S, settings: Settings) -> Result<()>
where
    S: ElementSource + Send + Sync + 'static,
{
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {bind}"))?;

    println!("Serving on http://{addr}");
    tracing::info!(%addr, locality = %settings.default_locality, "server starting");

    Server::bind(&addr)
        .max_workers(1)
        .serve(move |req, _info| respond(&req, &source, &settings))
        .context("Server ended with error")?;

    Ok(())
}
