use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

/// Set to a reachable MongoDB URI to run the end-to-end tests
const MONGODB_URI_VAR: &str = "INSTA_TEST_MONGODB_URI";

/// A running server binary; the process is killed when this is dropped
pub struct TestServer {
    pub base_url: String,
    database: String,
    child: Child,
}

impl TestServer {
    fn spawn(mongodb_uri: &str) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Fresh database per server so collection contents are predictable
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
        let database = format!("insta_test_{}_{}", std::process::id(), nanos);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_insta-api"));
        cmd.env("BIND_ADDRESS", format!("127.0.0.1:{}", port))
            .env("MONGODB_URI", mongodb_uri)
            .env("MONGODB_DATABASE", &database)
            .env("SECURITY_BCRYPT_COST", "4")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, database, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server on {} (database {}) did not become ready within {:?}",
            self.base_url,
            self.database,
            timeout
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Start the server binary against the MongoDB named by INSTA_TEST_MONGODB_URI.
///
/// The end-to-end tests are `#[ignore]`d, so this only runs under `--ignored`;
/// an unset variable at that point is an error rather than a silent pass.
pub async fn spawn_server() -> Result<TestServer> {
    let uri = std::env::var(MONGODB_URI_VAR)
        .with_context(|| format!("{} must point at a MongoDB instance", MONGODB_URI_VAR))?;

    let server = TestServer::spawn(&uri)?;
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}
