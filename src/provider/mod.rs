//! The expansion provider: execute, render, store.
//!
//! [`ExpansionProvider`] is the content-provider facade over the cache. Given
//! a fresh request it runs the external tool, decorates the captured text
//! according to the user's [`Settings`], writes the result into the cache
//! slot named by the request's identifier, and hands the rendering back.
//! Given only an identifier it replays the stored originating request - it
//! never fabricates a computation context from scratch.
//!
//! There is exactly one provider per invocation, constructed by the CLI and
//! passed to handlers by reference; no ambient singleton. Calls are never
//! deduplicated or debounced: each one spawns one process and performs one
//! cache write.

use anyhow::Result;
use std::path::PathBuf;

use crate::cache::ExpansionCache;
use crate::config::Settings;
use crate::core::ExpandError;
use crate::expand::{CargoCommand, ExpandOutput};
use crate::ident::VirtualId;
use crate::request::{ExpandRequest, Request};

/// The outcome of one provide call.
#[derive(Debug)]
pub struct Rendered {
    /// The cache slot that was written
    pub id: VirtualId,
    /// Absolute path of the rendered text file
    pub file: PathBuf,
    /// The rendered document body
    pub text: String,
    /// Warnings the tool printed alongside a usable expansion
    pub warnings: Option<String>,
    /// Whether the external tool exited successfully
    pub tool_succeeded: bool,
}

/// Content provider over the expansion cache.
pub struct ExpansionProvider<'a> {
    cache: &'a mut ExpansionCache,
    settings: &'a Settings,
}

impl<'a> ExpansionProvider<'a> {
    /// Create a provider over `cache` with the given rendering settings.
    pub fn new(cache: &'a mut ExpansionCache, settings: &'a Settings) -> Self {
        Self { cache, settings }
    }

    /// Resolve either request variant: run a fresh expansion, or replay the
    /// stored request behind an identifier.
    pub async fn provide_request(&mut self, request: &Request) -> Result<Rendered> {
        match request {
            Request::Expand(request) => self.provide(request).await,
            Request::Reload(id) => self.provide_id(id).await,
        }
    }

    /// Execute `request`, render and store the output, and return the
    /// rendering.
    ///
    /// A failing tool run is not an error: its captured output becomes the
    /// document body ("render whatever the tool said"). Only spawn-level
    /// failures and cache write failures propagate.
    pub async fn provide(&mut self, request: &ExpandRequest) -> Result<Rendered> {
        let output = CargoCommand::from_line(&request.command)?
            .current_dir(&request.manifest_dir)
            .execute()
            .await?;

        let text = render(self.settings, request, &output);
        let warnings = output.warnings().map(str::to_string);
        let file = self.cache.insert(request.clone(), &text)?;

        Ok(Rendered {
            id: request.id.clone(),
            file,
            text,
            warnings,
            tool_succeeded: output.success,
        })
    }

    /// Replay the stored request for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ExpandError::ExpansionNotFound`] when the cache has no
    /// entry for the identifier; no process is spawned in that case.
    pub async fn provide_id(&mut self, id: &VirtualId) -> Result<Rendered> {
        let request = self
            .cache
            .get(id)
            .map(|entry| entry.request.clone())
            .ok_or_else(|| ExpandError::ExpansionNotFound { id: id.uri() })?;

        tracing::debug!(target: "provider", "Replaying stored request for {}", id.uri());
        self.provide(&request).await
    }
}

/// Decorate captured tool output into the document body.
///
/// Optional header comments (command, directory, timestamp) come first, then
/// captured warnings as a block comment, then the tool's output verbatim.
fn render(settings: &Settings, request: &ExpandRequest, output: &ExpandOutput) -> String {
    let mut text = String::new();

    if settings.display_command {
        text.push_str(&format!("// command: {}\n", request.command));
    }
    if settings.display_path {
        text.push_str(&format!("// directory: {}\n", request.manifest_dir.display()));
    }
    if settings.display_timestamp {
        text.push_str(&format!(
            "// generated: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
    }
    if !text.is_empty() {
        text.push('\n');
    }

    if settings.display_warnings {
        if let Some(warnings) = output.warnings() {
            text.push_str("/*\n");
            text.push_str(warnings.trim_end());
            text.push_str("\n*/\n\n");
        }
    }

    text.push_str(output.body());
    text
}
