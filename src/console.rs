//! Console channel: one caller's session over stdin/stdout.

use std::pin::Pin;

use futures::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::engine::{Engine, Screen};
use crate::error::Result;

/// Lines typed by the caller.
pub type InputStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Stream of trimmed lines from stdin; ends at EOF.
pub fn stdin_lines() -> InputStream {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line.trim().to_string()).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    Box::pin(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|line| (line, rx))
    }))
}

/// Run one session for `msisdn` starting at `entry`, reading replies from
/// `input` and passing every screen to `show`. Returns the final screen,
/// or `None` if the input ended first.
pub async fn run_session(
    engine: &Engine,
    msisdn: &str,
    entry: &str,
    mut input: InputStream,
    mut show: impl FnMut(&Screen),
) -> Result<Option<Screen>> {
    let (mut conversation, mut screen) = engine.start(msisdn, entry)?;
    loop {
        show(&screen);
        if screen.is_end() {
            return Ok(Some(screen));
        }
        let Some(line) = input.next().await else {
            return Ok(None);
        };
        screen = engine.reply(&mut conversation, &line)?;
    }
}

/// Print a screen the way a handset would show it.
pub fn print_screen(screen: &Screen) {
    println!("\n{}\n", screen.text());
    if !screen.is_end() {
        eprint!("> ");
    }
}
