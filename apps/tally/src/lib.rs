//! # Tally Library
//!
//! The terminal front end for `tally-core`: a line-oriented cart session and
//! a one-shot page-snippet fetch.
//!
//! ## Module Organization
//! ```text
//! tally_lib/
//! ├── lib.rs          ◄─── You are here (tracing, session loop, snippet run)
//! ├── config.rs       ◄─── tally.toml + TALLY_* overrides
//! ├── state/
//! │   ├── mod.rs      ◄─── CartState alias
//! │   ├── terminal.rs ◄─── CartView that writes to a terminal
//! │   └── timer.rs    ◄─── Timer backed by tokio sleeps
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command grammar
//! │   └── cart.rs     ◄─── Command dispatch onto the calculator
//! ├── snippet.rs      ◄─── Fetch + CSS-select a page snippet
//! └── error.rs        ◄─── AppError / ErrorCode
//! ```
//!
//! ## Session Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         tokio::select!                                  │
//! │                                                                         │
//! │   stdin line ──► Command ──► dispatch ──► on_increase / on_remove / ... │
//! │                                               │ Timer::defer            │
//! │                                               ▼                         │
//! │   TimerHandle::next ◄──── sleeping task ◄── TokioTimer                  │
//! │          │                                                              │
//! │          └──────────► on_timer(Deferred)                                │
//! │                                                                         │
//! │   Ends once input is closed (EOF or `quit`) and no task is pending.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod snippet;
pub mod state;

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tally_core::{Cart, CartCalculator};

use commands::cart::{dispatch, Flow};
use commands::{Command, HELP};
use config::TallyConfig;
use error::AppError;
use snippet::{fetch_snippet, HttpFetcher};
use state::{CartState, TerminalView, TokioTimer};

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_LOG_FILTER: &str = "info,tally=debug,tally_lib=debug";

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_core=trace` - Trace the calculator only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    log_subscriber(filter).init();
}

/// Formatting subscriber gated by `filter`, writing to stderr so logs never
/// interleave with the cart on stdout.
fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Runs an interactive cart session on stdin/stdout.
pub async fn run_cart(config: &TallyConfig) -> Result<(), AppError> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_session(config, stdin, std::io::stdout()).await?;
    Ok(())
}

/// Runs a cart session over any line source and writer, returning the writer.
pub async fn run_session<R, W>(
    config: &TallyConfig,
    input: R,
    out: W,
) -> Result<W, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let cart = Cart::from_catalog(&config.catalog)?;
    let (timer, mut timer_handle) = TokioTimer::channel();
    let mut calc: CartState<W> = CartCalculator::new(
        cart,
        config.pricing(),
        config.delays(),
        TerminalView::new(out),
        timer,
    );

    info!(items = calc.cart().item_count(), "Cart session started");
    calc.mount();

    let mut lines = input.lines();
    let mut input_open = true;

    loop {
        if !input_open && timer_handle.is_idle() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        if handle_line(&mut calc, &line) == Flow::Quit {
                            debug!("Quit requested");
                            input_open = false;
                        }
                    }
                    None => {
                        debug!("Input closed");
                        input_open = false;
                    }
                }
            }
            task = timer_handle.next() => {
                match task {
                    Some(task) => calc.on_timer(task),
                    None => break,
                }
            }
        }
    }

    info!("Cart session ended");
    Ok(calc.into_view().into_inner())
}

/// Parses and applies one line; errors are shown and the session goes on.
fn handle_line<W: Write>(calc: &mut CartState<W>, line: &str) -> Flow {
    let result = line
        .parse::<Command>()
        .map_err(AppError::from)
        .and_then(|command| dispatch(calc, command));

    match result {
        Ok(Flow::ShowHelp) => {
            calc.view_mut().note(HELP);
            Flow::Continue
        }
        Ok(flow) => flow,
        Err(e) => {
            debug!(error = %e, "Command rejected");
            calc.view_mut().note(&e.message);
            Flow::Continue
        }
    }
}

/// Fetches the configured (or given) page and returns the snippet text.
pub async fn run_snippet(
    config: &TallyConfig,
    url: Option<String>,
    selector: Option<String>,
) -> Result<String, AppError> {
    let url = url.unwrap_or_else(|| config.snippet.url.clone());
    let selector = selector.unwrap_or_else(|| config.snippet.selector.clone());

    info!(url = %url, selector = %selector, "Fetching snippet");
    let fetcher = HttpFetcher::new(
        Duration::from_secs(config.snippet.timeout_secs),
        &config.snippet.user_agent,
    )?;
    let text = fetch_snippet(&fetcher, &url, &selector).await?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_output(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_default_log_filter_applies() {
        let subscriber = log_subscriber(EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(target: "hyper", tracing::Level::TRACE));
            assert!(!tracing::enabled!(target: "hyper", tracing::Level::DEBUG));
            assert!(tracing::enabled!(target: "hyper", tracing::Level::INFO));
            assert!(tracing::enabled!(target: "tally_lib", tracing::Level::DEBUG));
            assert!(!tracing::enabled!(target: "tally_lib", tracing::Level::TRACE));
        });
    }

    #[test]
    fn test_custom_log_filter_applies() {
        let subscriber = log_subscriber(EnvFilter::new("warn"));
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(target: "tally_lib", tracing::Level::INFO));
            assert!(tracing::enabled!(target: "tally_lib", tracing::Level::WARN));
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_renders_initial_cart() {
        let config = TallyConfig::default();
        let out = run_session(&config, &b""[..], Vec::new()).await.unwrap();
        let out = session_output(out);

        assert!(out.starts_with("Cart\n"));
        assert!(out.contains("BOOK-DUNE"));
        assert!(out.contains("Shipping $5.00"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_applies_commands() {
        let config = TallyConfig::default();
        let input = b"+ BOOK-DUNE\n\nbogus\nquit\n+ BOOK-DUNE\n";
        let out = run_session(&config, &input[..], Vec::new()).await.unwrap();
        let out = session_output(out);

        assert!(out.contains("2 copies"));
        assert!(out.contains("Unknown command 'bogus'"));
        // Nothing after `quit` is read
        assert!(!out.contains("3 copies"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_waits_for_removals_before_ending() {
        let config = TallyConfig::default();
        let input = b"rm BOOK-DUNE\nrm BOOK-EMMA\nrm BOOK-ILIAD\n";
        let out = run_session(&config, &input[..], Vec::new()).await.unwrap();
        let out = session_output(out);

        assert!(out.contains("Removed BOOK-ILIAD"));
        assert!(out.contains("Bummer, you removed all items!"));
        assert!(out.contains("Subtotal $0.00 | Tax $0.00 | Shipping Free | Total $0.00"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_reports_unknown_item() {
        let config = TallyConfig::default();
        let out = run_session(&config, &b"rm NOPE\n"[..], Vec::new())
            .await
            .unwrap();
        assert!(session_output(out).contains("Item not found: NOPE"));
    }
}
