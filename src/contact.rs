//! Contact form relay client.
//!
//! The form is POSTed as JSON to the external relay's `/api/contact`; mail
//! delivery is entirely the relay's problem. A non-success status counts as
//! failure so the user can retry.

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// All four fields are required before the form may be sent.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.subject.trim().is_empty()
            && !self.message.trim().is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct ContactClient {
    base_url: String,
    client: reqwest::Client,
}

impl ContactClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn send(&self, form: &ContactForm) -> Result<()> {
        let url = format!("{}/api/contact", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(form)
            .send()
            .await
            .context("Failed to reach the contact relay")?;

        if !response.status().is_success() {
            anyhow::bail!("Contact relay returned {}", response.status());
        }
        Ok(())
    }
}
