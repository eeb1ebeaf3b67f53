//! Companion readiness wait.
//!
//! Some installations pair the host with a sidecar that must be up
//! before requests are accepted. The wait is bounded; a companion that
//! never becomes ready delays startup but does not block it.

use std::time::Duration;

use crate::config::CompanionConfig;

pub async fn wait_until_ready(config: &CompanionConfig) {
    let client = reqwest::Client::new();
    for attempt in 1..=config.max_attempts {
        match client.get(&config.ready_url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(url = %config.ready_url, attempt, "companion ready");
                return;
            }
            Ok(response) => {
                tracing::debug!(url = %config.ready_url, status = %response.status(), attempt, "companion not ready yet");
            }
            Err(err) => {
                tracing::debug!(url = %config.ready_url, error = %err, attempt, "companion not reachable yet");
            }
        }
        tokio::time::sleep(Duration::from_millis(config.interval_ms)).await;
    }
    tracing::warn!(
        url = %config.ready_url,
        attempts = config.max_attempts,
        "companion never became ready, continuing startup"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    async fn serve_ready_after(failures: u32) -> SocketAddr {
        use axum::routing::get;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};

        let remaining = Arc::new(AtomicU32::new(failures));
        let app = axum::Router::new().route(
            "/ready",
            get(move || {
                let remaining = remaining.clone();
                async move {
                    if remaining.load(Ordering::SeqCst) == 0 {
                        http::StatusCode::OK
                    } else {
                        remaining.fetch_sub(1, Ordering::SeqCst);
                        http::StatusCode::SERVICE_UNAVAILABLE
                    }
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn returns_once_the_companion_answers_ok() {
        let addr = serve_ready_after(2).await;
        let config = CompanionConfig {
            ready_url: format!("http://{addr}/ready"),
            max_attempts: 10,
            interval_ms: 10,
        };
        // Completes well before the attempt budget.
        tokio::time::timeout(Duration::from_secs(5), wait_until_ready(&config))
            .await
            .expect("wait should finish");
    }

    #[tokio::test]
    async fn gives_up_after_the_attempt_budget() {
        let config = CompanionConfig {
            // Nothing listens here.
            ready_url: "http://127.0.0.1:1/ready".to_owned(),
            max_attempts: 3,
            interval_ms: 10,
        };
        tokio::time::timeout(Duration::from_secs(5), wait_until_ready(&config))
            .await
            .expect("bounded wait should finish");
    }
}
