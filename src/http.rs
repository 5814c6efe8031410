use anyhow::{anyhow, Result};
use reqwest::{RequestBuilder, StatusCode};
use tokio_util::sync::CancellationToken;

/// Returned (inside an `anyhow::Error`) when the caller's token fires before a reply arrives.
#[derive(Debug, thiserror::Error)]
#[error("request cancelled")]
pub struct Cancelled;

/// Status and body of a completed HTTP exchange.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    /// Turn a non-2xx reply into an error mentioning `service`.
    pub fn ensure_success(self, service: &str) -> Result<Self> {
        if !self.status.is_success() {
            return Err(anyhow!(
                "{} API error: HTTP {} - {}",
                service,
                self.status.as_u16(),
                self.body
            ));
        }
        Ok(self)
    }
}

/// Send `request` and read the whole body, giving up as soon as `cancel` fires.
///
/// Dropping the in-flight future closes the connection.
pub async fn execute(request: RequestBuilder, cancel: &CancellationToken) -> Result<Reply> {
    let exchange = async {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok::<_, reqwest::Error>(Reply { status, body })
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            log::debug!("HTTP request abandoned after cancellation");
            Err(Cancelled.into())
        }
        outcome = exchange => outcome.map_err(|e| anyhow!("HTTP request failed: {e}")),
    }
}

/// True when `err` (or anything in its chain) is a cancellation.
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<Cancelled>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn pre_cancelled_token_skips_the_request() {
        let token = CancellationToken::new();
        token.cancel();

        let request = Client::new().get("http://127.0.0.1:9/never-sent");
        let err = execute(request, &token).await.unwrap_err();
        assert!(is_cancelled(&err));
    }

    #[tokio::test]
    async fn cancelling_abandons_a_hanging_request() {
        // Accepts connections into the backlog but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/slow", listener.local_addr().unwrap());

        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            trigger.cancel();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();
        let err = execute(client.get(url), &token).await.unwrap_err();
        assert!(is_cancelled(&err));
        drop(listener);
    }

    #[tokio::test]
    async fn successful_reply_is_returned() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body("pong")
            .create_async()
            .await;

        let reply = execute(
            Client::new().get(format!("{}/ping", server.url())),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, "pong");
        mock.assert_async().await;
    }

    #[test]
    fn error_status_becomes_an_error() {
        let reply = Reply {
            status: StatusCode::NOT_FOUND,
            body: "{\"message\":\"Not Found\"}".into(),
        };
        let err = reply.ensure_success("GitHub").unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
        assert!(!is_cancelled(&err));
    }
}
