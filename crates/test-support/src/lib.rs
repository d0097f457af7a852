//! Helpers for integration tests that spawn the bridge binary.

use std::net::TcpListener;
use std::process::Child;
use std::time::{Duration, Instant};

/// Guard that kills (and reaps) a spawned child process when dropped, so a
/// failing test never leaves a bridge instance behind.
pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// Pick a currently-unused localhost TCP port.
///
/// The port is released again before this returns, so a racing process could
/// grab it; good enough for tests.
///
/// # Errors
///
/// Returns an error if no ephemeral port can be bound.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
    Ok(port)
}

/// Poll `url` until it answers with a 2xx status or `timeout` elapses.
///
/// # Errors
///
/// Returns an error if the deadline passes without a successful response.
pub async fn wait_http_ok(url: &str, timeout: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let deadline = Instant::now() + timeout;

    while Instant::now() < deadline {
        if let Ok(resp) = client.get(url).send().await
            && resp.status().is_success()
        {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("no 2xx from {url} within {timeout:?}")
}
