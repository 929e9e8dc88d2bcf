//! Upload the selected file's raw bytes.

use super::{ActionContext, render_upload_response};
use crate::errors::Result;
use crate::form::{FieldId, FormInputs, SelectedFile};
use crate::http::{HttpClient, HttpRequest};
use crate::render;

pub const CONTENT_TYPE: &str = "application/octet-stream";

/// POST the selected file to the upload path (`/upload/my.bin` when blank).
///
/// Without a selection nothing is sent and the advisory text is returned instead.
pub async fn run<C: HttpClient>(ctx: &ActionContext<C>, inputs: &FormInputs) -> String {
    let target = inputs.value_or(FieldId::UploadPath, &ctx.defaults.upload_path);

    let Some(file) = inputs.selected_file() else {
        tracing::info!(target_path = %target, "No file selected, nothing sent");
        return render::NO_FILE_SELECTED.to_string();
    };

    send(ctx, target, file).await.unwrap_or_else(|e| render::error(&e))
}

async fn send<C: HttpClient>(ctx: &ActionContext<C>, target: &str, file: &SelectedFile) -> Result<String> {
    let url = ctx.resolve(target)?;
    tracing::debug!(url = %url, file = %file.name, size = file.size(), "Uploading file");

    let response = ctx
        .client
        .execute(HttpRequest::post(url.clone(), CONTENT_TYPE, file.data.clone()))
        .await?;

    Ok(render_upload_response(response, &url))
}
