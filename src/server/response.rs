use astra::{Body, Response, ResponseBuilder};
use maud::Markup;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

use crate::export::ExportError;
use crate::render::error_page;

pub const GENERIC_FAILURE: &str =
    "Impossibile recuperare le attività in questo momento. Riprova più tardi.";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("not found")]
    NotFound,

    #[error("pipeline failed")]
    Pipeline(#[from] anyhow::Error),

    #[error("export failed")]
    Export(#[from] ExportError),

    #[error("failed to build response")]
    Internal,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            _ => 500,
        }
    }
}

pub type ResultResp = Result<Response, ServerError>;

pub fn html_response(markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::Internal)
}

/// CSV download with an ASCII fallback name and an RFC 5987 UTF-8 name
pub fn csv_response(csv: String, filename: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/csv; charset=utf-8")
        .header("Content-Disposition", content_disposition(filename))
        .body(Body::from(csv))
        .map_err(|_| ServerError::Internal)
}

pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded = utf8_percent_encode(filename, NON_ALPHANUMERIC);

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Error page for `err`. The page never carries the error detail.
pub fn error_response(err: &ServerError) -> Response {
    let status = err.status();
    let message = match err {
        ServerError::NotFound => "Pagina non trovata.",
        _ => GENERIC_FAILURE,
    };

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(error_page(status, message).into_string()))
        .unwrap_or_else(|_| Response::new(Body::from(message.to_string())))
}
