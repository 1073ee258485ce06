//! End-to-end supervision loop behavior: startup, shutdown
//! interruption, and the crash-retry path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use geyser_common::DataDir;
use geyserd::config::Config;
use geyserd::shutdown::Shutdown;
use geyserd::supervisor::Supervisor;

/// Config whose update endpoints refuse connections immediately, so
/// check cycles complete fast without network access.
fn offline_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::new(DataDir::new(dir.path()));
    config.download_base = "http://127.0.0.1:1".to_string();
    config.broadcast_api_url = "http://127.0.0.1:1/releases/latest".to_string();
    config.check_interval = Duration::from_secs(60);
    config.retry_delay = Duration::from_secs(60);
    config.stop_grace = Duration::from_secs(2);
    config
}

#[tokio::test]
async fn shutdown_interrupts_the_wait_and_stops_the_server() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = offline_config(&dir);
    // Stand-in server that records the graceful stop.
    config.server_program = "sh".to_string();
    config.server_args = vec![
        "-c".to_string(),
        "trap 'touch stopped.marker; exit 0' TERM; while true; do sleep 1; done".to_string(),
    ];
    std::fs::write(config.data.standalone_jar(), b"").unwrap();

    let shutdown = Shutdown::new();
    let mut supervisor = Supervisor::new(Arc::new(config), shutdown.clone());
    let handle = tokio::spawn(async move { supervisor.run().await });

    // Let the loop run its first checks and start the server, then
    // signal while it sits in the 60 s wait.
    tokio::time::sleep(Duration::from_millis(500)).await;
    shutdown.trigger();

    let start = Instant::now();
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("loop did not exit after shutdown")
        .unwrap();
    assert!(start.elapsed() < Duration::from_secs(10));

    // Final cleanup sent SIGTERM; the stand-in saw it.
    assert!(dir.path().join("stopped.marker").exists());
}

#[tokio::test]
async fn failed_start_waits_instead_of_spinning() {
    let dir = tempfile::tempdir().unwrap();
    // No jar: every start attempt fails, so the loop sits in its
    // retry wait rather than exiting or spinning.
    let config = offline_config(&dir);

    let shutdown = Shutdown::new();
    let mut supervisor = Supervisor::new(Arc::new(config), shutdown.clone());
    let handle = tokio::spawn(async move { supervisor.run().await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!handle.is_finished());

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("loop did not exit after shutdown")
        .unwrap();
}

#[tokio::test]
async fn loop_exits_immediately_when_already_shut_down() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(&dir);

    let shutdown = Shutdown::new();
    shutdown.trigger();

    let mut supervisor = Supervisor::new(Arc::new(config), shutdown);
    tokio::time::timeout(Duration::from_secs(5), supervisor.run())
        .await
        .expect("run did not return for a pre-triggered shutdown");
}
