use anyhow::Result;
use colored::*;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::output::{print_event, TestResult};
use crate::ws_client::Connection;

const MSG: &str = "msg";
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Time given to the server to register or unregister a socket before the
/// scenario relies on it. Clients cannot observe registration directly.
pub const SETTLE: Duration = Duration::from_millis(250);

/// Waits for a `msg` event on `conn` and checks its payload equals `expected`.
/// Returns a failure description instead of an error so scenarios can report it.
async fn expect_payload(conn: &mut Connection, expected: &Value) -> Option<String> {
    match conn.wait_for_event(MSG, EVENT_TIMEOUT).await {
        Ok(event) => {
            print_event(&conn.user_label, &event);
            if &event.data == expected {
                println!("{} {} payload verified", "✓".green(), conn.user_label);
                None
            } else {
                println!("{} {} payload mismatch!", "✗".red(), conn.user_label);
                Some(format!(
                    "{}: expected {}, got {}",
                    conn.user_label, expected, event.data
                ))
            }
        }
        Err(e) => {
            println!("{} {}: {}", "✗".red(), conn.user_label, e);
            Some(format!("{}: {}", conn.user_label, e))
        }
    }
}

fn finish(scenario: &str, failures: Vec<String>, start: Instant) -> TestResult {
    if failures.is_empty() {
        TestResult::pass(scenario, start.elapsed())
    } else {
        TestResult::fail(scenario, failures.join("; "), start.elapsed())
    }
}

/// A sends "hello": both A and B receive it.
pub async fn test_broadcast(a: &mut Connection, b: &mut Connection) -> Result<TestResult> {
    let start = Instant::now();
    println!("\n{}", "=== TEST: Broadcast ===".bright_cyan().bold());
    a.drain();
    b.drain();

    let payload = json!("hello");
    println!("{} {} sending {}...", "→".blue(), a.user_label, payload);
    a.emit(MSG, payload.clone()).await?;

    let mut failures = Vec::new();
    failures.extend(expect_payload(a, &payload).await);
    failures.extend(expect_payload(b, &payload).await);

    Ok(finish("broadcast", failures, start))
}

/// A sends an object payload: every client receives a deep-equal copy.
pub async fn test_object_payload(a: &mut Connection, b: &mut Connection) -> Result<TestResult> {
    let start = Instant::now();
    println!("\n{}", "=== TEST: Object Payload ===".bright_cyan().bold());
    a.drain();
    b.drain();

    let payload = json!({"text": "hi", "user": "x"});
    println!("{} {} sending {}...", "→".blue(), a.user_label, payload);
    a.emit(MSG, payload.clone()).await?;

    let mut failures = Vec::new();
    failures.extend(expect_payload(a, &payload).await);
    failures.extend(expect_payload(b, &payload).await);

    Ok(finish("object_payload", failures, start))
}

/// A client joining after a message was sent never sees that message.
pub async fn test_no_replay(
    base_url: &str,
    a: &mut Connection,
    b: &mut Connection,
) -> Result<TestResult> {
    let start = Instant::now();
    println!("\n{}", "=== TEST: No Replay ===".bright_cyan().bold());
    a.drain();
    b.drain();

    let before = json!("sent before client C joined");
    a.emit(MSG, before.clone()).await?;
    let mut failures = Vec::new();
    failures.extend(expect_payload(a, &before).await);

    println!("{} Client C connecting...", "→".blue());
    let mut c = Connection::establish(base_url, "Client C (late)".to_string()).await?;
    tokio::time::sleep(SETTLE).await;

    let after = json!("sent after client C joined");
    a.emit(MSG, after.clone()).await?;
    failures.extend(expect_payload(a, &after).await);
    // The first msg C sees must be the one sent after it joined
    failures.extend(expect_payload(&mut c, &after).await);

    c.close().await?;
    b.drain();

    Ok(finish("no_replay", failures, start))
}

/// A client that disconnected is no longer a recipient and does not disturb others.
pub async fn test_disconnect(
    base_url: &str,
    a: &mut Connection,
    b: &mut Connection,
) -> Result<TestResult> {
    let start = Instant::now();
    println!("\n{}", "=== TEST: Disconnect ===".bright_cyan().bold());
    a.drain();
    b.drain();

    println!("{} Client D connecting and leaving...", "→".blue());
    let d = Connection::establish(base_url, "Client D (leaves)".to_string()).await?;
    tokio::time::sleep(SETTLE).await;
    d.close().await?;
    tokio::time::sleep(SETTLE).await;

    let payload = json!("sent after client D left");
    a.emit(MSG, payload.clone()).await?;

    let mut failures = Vec::new();
    failures.extend(expect_payload(a, &payload).await);
    failures.extend(expect_payload(b, &payload).await);
    if let Err(e) = a.expect_silence(MSG, SETTLE).await {
        failures.push(format!("{}: {}", a.user_label, e));
    }

    Ok(finish("disconnect", failures, start))
}
