//! Search command - recommend places for a keyword query
//!
//! Streams each progress message to stdout as it arrives. Ctrl+C cancels
//! the run between upstream calls.

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::error::{PlaceError, Result};
use crate::core::orchestrator::ProgressSink;
use crate::core::services::Services;
use crate::core::types::{CommentDocument, PlaceCandidate, ProgressToken, SearchRequest, SearchSummary};
use async_trait::async_trait;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Comment snippets shown per place in human output
const COMMENTS_SHOWN: usize = 3;

/// Characters kept from each comment snippet
const SNIPPET_CHARS: usize = 80;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Korean keywords, e.g. "강남역 맛집" (multiple words are joined)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Also print the Markdown rendering guidance (human format)
    #[arg(long)]
    pub show_guidance: bool,
}

impl SearchArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

/// One progress message in JSON output
#[derive(Debug, Serialize)]
pub struct ProgressLine<'a> {
    pub progress: u64,
    pub message: &'a str,
}

/// Final line of JSON output
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    #[serde(flatten)]
    pub summary: SearchSummary,
    pub elapsed_ms: u128,
}

/// Enriched place as read back from its payload
#[derive(Debug, Deserialize)]
struct PlaceView {
    #[serde(flatten)]
    place: PlaceCandidate,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    comments: Vec<CommentDocument>,
}

/// Progress sink printing to the terminal
pub struct TerminalSink {
    format: OutputFormat,
    show_guidance: bool,
    progress: AtomicU64,
    places: AtomicU64,
}

impl TerminalSink {
    pub fn new(format: OutputFormat, show_guidance: bool) -> Self {
        Self {
            format,
            show_guidance,
            progress: AtomicU64::new(0),
            places: AtomicU64::new(0),
        }
    }

    /// Text to print for one message, or `None` to print nothing
    pub fn render(&self, message: &str) -> Option<String> {
        let progress = self.progress.fetch_add(1, Ordering::SeqCst) + 1;

        match self.format {
            OutputFormat::Json => serde_json::to_string(&ProgressLine { progress, message }).ok(),
            OutputFormat::Human => match serde_json::from_str::<PlaceView>(message) {
                Ok(view) => {
                    let rank = self.places.fetch_add(1, Ordering::SeqCst) + 1;
                    Some(render_place(rank, &view))
                }
                // Anything that is not a place payload is guidance text
                Err(_) if self.show_guidance => Some(message.trim().to_string()),
                Err(_) => None,
            },
        }
    }
}

#[async_trait]
impl ProgressSink for TerminalSink {
    async fn emit(&self, _token: &ProgressToken, message: String) -> Result<()> {
        if let Some(text) = self.render(&message) {
            println!("{text}");
        }
        Ok(())
    }
}

fn render_place(rank: u64, view: &PlaceView) -> String {
    let place = &view.place;
    let mut lines = vec![format!(
        "[{}] {}",
        colors::rank(&rank.to_string()),
        colors::place_name(&place.name)
    )];

    let field = |label: &str, value: &str| {
        let value = if value.is_empty() { "-" } else { value };
        format!("    {} {}", colors::label(&format!("{label}:")), value)
    };

    lines.push(field("Address", &place.address));
    lines.push(field("Category", &place.category));
    lines.push(field("Contact", &place.phone));
    lines.push(format!(
        "    {} {}",
        colors::label("Link:"),
        colors::url(&place.url)
    ));
    if !view.image_url.is_empty() {
        lines.push(format!(
            "    {} {}",
            colors::label("Image:"),
            colors::url(&view.image_url)
        ));
    }

    lines.push(format!(
        "    {} {}",
        colors::label("Comments:"),
        colors::number(&view.comments.len().to_string())
    ));
    for comment in view.comments.iter().take(COMMENTS_SHOWN) {
        let snippet = output::truncate_chars(&strip_markup(&comment.contents), SNIPPET_CHARS);
        lines.push(format!("      - {}", colors::dim(&snippet)));
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Remove the `<b>` highlight tags the web search puts around matches
fn strip_markup(text: &str) -> String {
    text.replace("<b>", "").replace("</b>", "")
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let query = args.query_text();
    let request = SearchRequest::new(query.clone());
    let sink = TerminalSink::new(format, args.show_guidance);

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let started = Instant::now();
    let outcome = services
        .recommender
        .recommend(&request, &ProgressToken::from("cli"), &sink, &cancel)
        .await;
    ctrl_c.abort();

    let summary = match outcome {
        Ok(summary) => summary,
        Err(PlaceError::Cancelled) => {
            output::print_warning("Search cancelled");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let elapsed = started.elapsed();
    match format {
        OutputFormat::Human => {
            if summary.candidates == 0 {
                println!("No places found for '{}'", colors::label(query.trim()));
            } else {
                output::print_success(&format!(
                    "Delivered {} of {} place(s) for '{}' ({} dropped) in {}",
                    summary.delivered,
                    summary.candidates,
                    query.trim(),
                    summary.dropped,
                    output::format_duration(elapsed.as_secs_f64())
                ));
            }
        }
        OutputFormat::Json => {
            let out = SearchOutput {
                query: query.trim().to_string(),
                summary,
                elapsed_ms: elapsed.as_millis(),
            };
            output::print_output(&out, format);
        }
    }

    Ok(())
}
