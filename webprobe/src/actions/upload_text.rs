//! Upload typed text as UTF-8.

use bytes::Bytes;

use super::{ActionContext, render_upload_response};
use crate::errors::Result;
use crate::form::{FieldId, FormInputs};
use crate::http::{HttpClient, HttpRequest};
use crate::render;

pub const CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// POST the text body (empty when blank) to the text path (`/upload/note.txt` when blank).
pub async fn run<C: HttpClient>(ctx: &ActionContext<C>, inputs: &FormInputs) -> String {
    let target = inputs.value_or(FieldId::TextPath, &ctx.defaults.text_path);
    let body = inputs.value_or(FieldId::TextBody, "");

    send(ctx, target, body).await.unwrap_or_else(|e| render::error(&e))
}

async fn send<C: HttpClient>(ctx: &ActionContext<C>, target: &str, text: &str) -> Result<String> {
    let url = ctx.resolve(target)?;
    // Content-Length counts encoded bytes, not characters
    let body = Bytes::copy_from_slice(text.as_bytes());
    tracing::debug!(url = %url, chars = text.chars().count(), bytes = body.len(), "Uploading text");

    let response = ctx.client.execute(HttpRequest::post(url.clone(), CONTENT_TYPE, body)).await?;

    Ok(render_upload_response(response, &url))
}
