//! Fetch a resource and render its body.

use super::ActionContext;
use crate::errors::Result;
use crate::form::{FieldId, FormInputs};
use crate::http::{HttpClient, HttpRequest};
use crate::render;

/// GET the fetch path (`/` when blank).
///
/// Textual bodies are rendered in full, anything else as a byte count. Unlike the uploads,
/// a body that cannot be read is reported as an error.
pub async fn run<C: HttpClient>(ctx: &ActionContext<C>, inputs: &FormInputs) -> String {
    let target = inputs.value_or(FieldId::FetchPath, &ctx.defaults.fetch_path);

    send(ctx, target).await.unwrap_or_else(|e| render::error(&e))
}

async fn send<C: HttpClient>(ctx: &ActionContext<C>, target: &str) -> Result<String> {
    let url = ctx.resolve(target)?;
    tracing::debug!(url = %url, "Fetching resource");

    let response = ctx.client.execute(HttpRequest::get(url)).await?;

    let status = response.status;
    let status_text = response.status_text.clone();
    let content_type = response.content_type.clone().unwrap_or_default();

    let body = if render::is_textual(&content_type) {
        response.text()?
    } else {
        render::binary_placeholder(response.bytes()?.len())
    };

    Ok(render::fetch(status, &status_text, &content_type, &body))
}
