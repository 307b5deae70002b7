use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use officehours::command::{CommandRunner, Reply};
use officehours::config::Config;
use officehours::directory::Directory;
use officehours::engine::Engine;
use officehours::notify::NotifyHub;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries replies; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = Config::from_env();
    officehours::observability::init(config.metrics_port)?;

    let notify = Arc::new(NotifyHub::with_capacity(config.notify_capacity));
    let engine = Arc::new(Engine::with_config(&config, notify.clone()));
    let runner = CommandRunner::new(engine, Arc::new(Directory::new()));

    info!("officehours ready, reading commands from stdin");
    info!("  max_intervals_per_teacher: {}", config.max_intervals_per_teacher);
    info!(
        "  metrics: {}",
        config
            .metrics_port
            .map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    let mut stdout = tokio::io::stdout();
    let mut handled = 0u64;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            read = stdin.read_until(b'\n', &mut buf) => {
                if read? == 0 {
                    break;
                }
                let Some(reply) = runner.handle_bytes(&buf).await else {
                    buf.clear();
                    continue;
                };
                buf.clear();
                if matches!(reply, Reply::Error { ref kind, .. } if kind == "parse") {
                    warn!("rejected unparseable input line");
                }
                let mut out = serde_json::to_vec(&reply)?;
                out.push(b'\n');
                stdout.write_all(&out).await?;
                stdout.flush().await?;
                handled += 1;
            }
            _ = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!(
        "officehours stopped after {handled} commands, {} notification channels open",
        notify.channel_count()
    );
    Ok(())
}
