use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    #[allow(dead_code)]
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests.
        // Assumes debug profile; adjust if you run tests with --release.
        let mut cmd = Command::new("target/debug/storykeep-api");
        cmd.env("STORYKEEP_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL from .env
        // (loaded by the server itself). In development mode it migrates on
        // startup, so a fresh database is fine.
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Ready as soon as the router answers; a degraded health
                // response still proves the server is up.
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

#[allow(dead_code)]
pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when a database is reachable for end-to-end data tests. Tests that
/// need real storage call this and skip quietly on bare machines.
#[allow(dead_code)]
pub fn database_configured() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// A client that keeps cookies between requests, like a browser would.
#[allow(dead_code)]
pub fn browser() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().cookie_store(true).build()?)
}
