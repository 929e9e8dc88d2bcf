//! The probe actions and their registry.
//!
//! Every action follows the same shape: read its input fields, send one request, render the
//! outcome into its output panel. Actions never fail: transport errors are rendered as
//! `Error: ...` text and non-2xx statuses are shown like any other response.
//!
//! Actions are looked up by name through [`ActionRegistry`], so a front end can trigger them
//! without passing arguments.

pub mod fetch;
pub mod upload_file;
pub mod upload_text;

use futures::future::join_all;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::config::DefaultPaths;
use crate::errors::{Error, Result};
use crate::form::{FieldId, FormInputs, OutputBoard, OutputTarget, Panel};
use crate::http::{HttpClient, HttpResponse};
use crate::render;

/// Everything an action needs besides the form: where to send, how, and the fallback paths.
pub struct ActionContext<C> {
    pub client: C,
    pub base_url: Url,
    pub defaults: DefaultPaths,
}

impl<C: HttpClient> ActionContext<C> {
    pub fn new(client: C, base_url: Url, defaults: DefaultPaths) -> Self {
        Self {
            client,
            base_url,
            defaults,
        }
    }

    /// Resolve a target path against the base URL. Absolute URLs are used as given.
    pub fn resolve(&self, target: &str) -> Result<Url> {
        self.base_url.join(target).map_err(|source| Error::InvalidTarget {
            target: target.to_string(),
            source,
        })
    }
}

/// Render an upload response. The body is read as text; if that fails it is shown as empty.
fn render_upload_response(response: HttpResponse, url: &Url) -> String {
    let status = response.status;
    let status_text = response.status_text.clone();

    let body = response.text().unwrap_or_else(|e| {
        tracing::warn!(url = %url, status, error = %e.describe(), "Failed to read upload response body, showing it as empty");
        String::new()
    });

    render::upload(status, &status_text, &body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    UploadFile,
    UploadText,
    Fetch,
}

impl Action {
    /// Every registered action, in page order.
    pub const ALL: [Action; 3] = [Action::UploadFile, Action::UploadText, Action::Fetch];

    pub fn name(&self) -> &'static str {
        match self {
            Action::UploadFile => "upload-file",
            Action::UploadText => "upload-text",
            Action::Fetch => "fetch",
        }
    }

    /// Input fields the action reads.
    pub fn inputs(&self) -> &'static [FieldId] {
        match self {
            Action::UploadFile => &[FieldId::UploadPath, FieldId::UploadFile],
            Action::UploadText => &[FieldId::TextPath, FieldId::TextBody],
            Action::Fetch => &[FieldId::FetchPath],
        }
    }

    pub fn output(&self) -> OutputTarget {
        match self {
            Action::UploadFile => OutputTarget::UploadFileResult,
            Action::UploadText => OutputTarget::UploadTextResult,
            Action::Fetch => OutputTarget::FetchResult,
        }
    }

    /// Text shown in the output panel while the action runs.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Action::UploadFile | Action::UploadText => render::SENDING,
            Action::Fetch => render::FETCHING,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == name)
            .ok_or_else(|| Error::UnknownAction { name: name.to_string() })
    }
}

/// Registry of invokable actions sharing one context and one output board.
pub struct ActionRegistry<C> {
    context: ActionContext<C>,
    board: OutputBoard,
}

impl<C: HttpClient> ActionRegistry<C> {
    pub fn new(context: ActionContext<C>) -> Self {
        Self {
            context,
            board: OutputBoard::new(),
        }
    }

    pub fn board(&self) -> &OutputBoard {
        &self.board
    }

    /// Run an action against the current inputs.
    ///
    /// The action's panel shows its placeholder while the request is in flight and the
    /// rendered result afterwards. The rendered result is also returned.
    #[tracing::instrument(skip_all, fields(action = %action))]
    pub async fn invoke(&self, action: Action, inputs: &FormInputs) -> String {
        let target = action.output();
        self.board.write(target, action.placeholder());

        let rendered = match action {
            Action::UploadFile => upload_file::run(&self.context, inputs).await,
            Action::UploadText => upload_text::run(&self.context, inputs).await,
            Action::Fetch => fetch::run(&self.context, inputs).await,
        };

        self.board.write(target, rendered.clone());
        rendered
    }

    /// Run an action looked up by its name, e.g. `"upload-file"`.
    pub async fn invoke_by_name(&self, name: &str, inputs: &FormInputs) -> Result<String> {
        let action = name.parse::<Action>()?;
        Ok(self.invoke(action, inputs).await)
    }

    /// Run every action concurrently and return all panels in page order.
    pub async fn invoke_all(&self, inputs: &FormInputs) -> Vec<Panel> {
        join_all(Action::ALL.iter().map(|action| self.invoke(*action, inputs))).await;
        self.board.snapshot()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::http::MockHttpClient;

    pub const BASE_URL: &str = "http://probe.test/";

    pub fn context(mock: &MockHttpClient) -> ActionContext<MockHttpClient> {
        ActionContext::new(mock.clone(), Url::parse(BASE_URL).unwrap(), DefaultPaths::default())
    }
}
