use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::error::{ForcesError, Result};
use crate::models::config::Settings;

pub trait PageFetcher {
    /// Returns the raw markup served at `url`.
    fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForcesError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

pub fn contest_url(host: &str, contest_id: &str) -> String {
    format!("https://{}/contest/{}", host, contest_id)
}

pub fn problem_url(host: &str, contest_id: &str, problem_id: &str) -> String {
    format!("https://{}/contest/{}/problem/{}", host, contest_id, problem_id)
}
