// src/fetch.rs

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use reqwest::blocking::Client;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Blocking HTTP client for the single page GET.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ScrapeError::Config(format!("building HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// GET `url` and return the body. Every call goes to the network.
    pub fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        let start = Instant::now();
        info!(url = %url, "fetching");

        let network = |source: reqwest::Error| ScrapeError::Network {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url.clone()).send().map_err(network)?;
        let status = resp.status();
        debug!(url = %url, status = %status, "response");
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(network)?;
        info!(
            url = %url,
            bytes = body.len(),
            elapsed = ?start.elapsed(),
            "fetched"
        );
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve exactly one HTTP response on a random local port.
    pub fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        let addr = listener.local_addr().expect("local addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut line = String::new();
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes());
            let _ = stream.flush();
        });
        (format!("http://{}/wiki/states", addr), handle)
    }
}
