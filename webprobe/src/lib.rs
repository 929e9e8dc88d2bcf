//! # webprobe: manual HTTP probing
//!
//! `webprobe` sends the three requests a person testing a web server by hand reaches for
//! most often, and shows the raw outcome as text:
//!
//! - **upload-file**: POST a file's bytes as `application/octet-stream`
//! - **upload-text**: POST typed text as `text/plain; charset=UTF-8`
//! - **fetch**: GET a resource, printing textual bodies and summarizing binary ones
//!
//! Results are deliberately unprocessed. A 404 or 500 is rendered exactly like a 200, and
//! interpreting it is left to whoever reads the output. Only transport failures (nothing
//! came back) are reported as `Error: ...`.
//!
//! ## Model
//!
//! The tool mirrors a small test page. Actions read named input fields ([`form::FieldId`])
//! from a [`form::FormInputs`] and write into named output panels ([`form::OutputTarget`])
//! on an [`form::OutputBoard`]. Actions take no arguments and are invoked by name through
//! the [`actions::ActionRegistry`]. Blank path fields fall back to
//! [`config::DefaultPaths`].
//!
//! Requests go through the [`http::HttpClient`] trait: [`http::ReqwestHttpClient`] in
//! production, [`http::MockHttpClient`] in tests.

pub mod actions;
pub mod config;
pub mod errors;
pub mod form;
pub mod http;
pub mod render;
pub mod telemetry;

#[cfg(test)]
mod test;

pub use actions::{Action, ActionContext, ActionRegistry};
pub use config::{Args, Command, Config, OutputFormat};
pub use errors::{Error, Result};
pub use form::{FormInputs, OutputBoard, OutputTarget, Panel, SelectedFile};
pub use http::{HttpClient, HttpRequest, HttpResponse, MockHttpClient, ReqwestHttpClient};

/// Build a registry backed by a real HTTP client from loaded configuration.
pub fn registry(config: &Config) -> ActionRegistry<ReqwestHttpClient> {
    ActionRegistry::new(ActionContext::new(
        ReqwestHttpClient::new(),
        config.base_url.clone(),
        config.defaults.clone(),
    ))
}
