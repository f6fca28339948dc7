// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Single-attempt delivery of module names to the automation webhook.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::models::submission::{ModuleSubmission, SubmitError};

/// Blocking webhook client; one POST per submission, never retried.
pub struct Webhook {
    url: String,
    client: Client,
}

impl Webhook {
    /// Build a client with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self::with_client(url, client))
    }

    fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// POST `{"module_name": ...}` and require a 2xx answer.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status becomes [`SubmitError::Transport`]
    /// carrying the underlying cause.
    pub fn submit(&self, submission: &ModuleSubmission) -> Result<(), SubmitError> {
        let result = self
            .client
            .post(&self.url)
            .json(submission)
            .send()
            .and_then(|resp| resp.error_for_status());

        match result {
            Ok(resp) => {
                info!(
                    module = submission.module_name(),
                    status = %resp.status(),
                    "module name delivered to webhook"
                );
                Ok(())
            }
            Err(err) => {
                warn!(module = submission.module_name(), error = %err, "webhook delivery failed");
                Err(transport(err))
            }
        }
    }
}

fn transport(err: reqwest::Error) -> SubmitError {
    SubmitError::Transport(err.to_string())
}
