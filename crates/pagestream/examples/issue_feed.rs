//! Headless issue feed
//!
//! Scrolls through a repository's issues a screen at a time and prints the
//! rows a renderer would materialize for each screen.
//!
//! Run with: cargo run -p pagestream --example issue_feed -- [settings.toml]
//!
//! Set `GITHUB_TOKEN` to lift the unauthenticated rate limit and
//! `RUST_LOG=pagestream_core=debug` to watch fetches.

use std::time::Duration;

use pagestream::net::{GitHubIssue, GitHubIssueSource};
use pagestream::{FetchError, ListController, ListStatus, RenderFrame, RenderSink, Settings};
use tracing_subscriber::EnvFilter;

const VIEWPORT_HEIGHT: f64 = 900.0;
const SCREENS: usize = 8;

#[derive(Default)]
struct ConsoleSink {
    status: Option<ListStatus>,
}

impl RenderSink<GitHubIssue> for ConsoleSink {
    fn render(&mut self, frame: RenderFrame<'_, GitHubIssue>) {
        println!(
            "--- rows {:?} of {}px ({}) ---",
            frame.range.range(),
            frame.total_size,
            frame.status
        );
        for (index, offset, issue) in frame.visible() {
            let labels: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
            println!(
                "{index:>5} @{offset:>7}px  #{:<6} {} [{}] ({} comments, by {})",
                issue.number,
                issue.title,
                labels.join(", "),
                issue.comments,
                issue.user.login
            );
        }
        self.status = Some(frame.status);
    }

    fn fetch_failed(&mut self, error: &FetchError) {
        eprintln!("fetch failed: {error}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let source = GitHubIssueSource::new(settings.github_config())?;
    let controller = ListController::new(source, settings.query.clone(), settings.viewport)?;
    let mut sink = ConsoleSink::default();

    controller.on_resize(VIEWPORT_HEIGHT);
    let mut scroll_offset = 0.0;

    for _ in 0..SCREENS {
        while controller.fetch_state().is_in_flight() {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        controller.render(&mut sink);

        match &sink.status {
            Some(ListStatus::Error(_)) | Some(ListStatus::Empty) => break,
            Some(ListStatus::Ready { has_more: false, .. })
                if scroll_offset + VIEWPORT_HEIGHT
                    >= controller.with_list(|l| l.total_size()) as f64 =>
            {
                break;
            }
            _ => {}
        }

        scroll_offset += VIEWPORT_HEIGHT;
        controller.on_scroll(scroll_offset);
    }

    println!("{} issues loaded", controller.len());
    Ok(())
}
