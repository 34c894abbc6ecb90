use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use super::traits::BaseMailer;

/// Transactional mail client.
///
/// Talks to an HTTP mail API (JSON POST per message). Without a configured
/// endpoint it degrades to logging the send, which keeps development
/// environments working without credentials.
pub struct HttpMailer {
    client: Client,
    api_url: Option<String>,
    api_token: Option<String>,
    from_address: String,
}

#[derive(Debug, Serialize)]
struct MailMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl HttpMailer {
    pub fn new(
        api_url: Option<String>,
        api_token: Option<String>,
        from_address: String,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_token,
            from_address,
        }
    }
}

#[async_trait]
impl BaseMailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let Some(api_url) = &self.api_url else {
            info!(to, subject, "Mail API not configured; skipping send");
            return Ok(());
        };

        let message = MailMessage {
            from: &self.from_address,
            to,
            subject,
            html: html_body,
        };

        let mut request = self.client.post(api_url).json(&message);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        info!(to, subject, "Sending email");

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Mail API returned {}: {}", status, body));
        }

        Ok(())
    }
}

/// Mailer that records nothing and always succeeds. Used in tests.
pub struct NoopMailer;

#[async_trait]
impl BaseMailer for NoopMailer {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<()> {
        Ok(())
    }
}
