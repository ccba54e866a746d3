use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::StatusCode;

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared client. The timeout of the first caller wins.
pub fn http_client(timeout_secs: u64) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .context("failed to build http client")
    })
}

/// Statuses that mean "try again next cycle" rather than a broken request:
/// not started yet (404), edge protection (403), rate limits and upstream 5xx.
pub fn is_unavailable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 403 | 404 | 429 | 500 | 502 | 503 | 504)
}

/// GET that must succeed. Used for the games list, where any failure ends
/// the cycle.
pub fn fetch_json(client: &Client, url: &str, extra_headers: &[(&str, &str)]) -> Result<String> {
    let resp = request(client, url, extra_headers)
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, truncate(&body, 200)));
    }
    Ok(body)
}

/// GET where temporary unavailability is `Ok(None)`: classified statuses
/// and timeouts. Anything else that is not a success is an error.
pub fn fetch_json_optional(
    client: &Client,
    url: &str,
    extra_headers: &[(&str, &str)],
) -> Result<Option<String>> {
    let resp = match request(client, url, extra_headers).send() {
        Ok(resp) => resp,
        Err(err) if err.is_timeout() => return Ok(None),
        Err(err) => return Err(err).context("request failed"),
    };
    let status = resp.status();
    if is_unavailable_status(status) {
        return Ok(None);
    }
    let body = match resp.text() {
        Ok(body) => body,
        Err(err) if err.is_timeout() => return Ok(None),
        Err(err) => return Err(err).context("failed reading body"),
    };
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, truncate(&body, 200)));
    }
    Ok(Some(body))
}

fn request(
    client: &Client,
    url: &str,
    extra_headers: &[(&str, &str)],
) -> reqwest::blocking::RequestBuilder {
    let mut req = client
        .get(url)
        .header(USER_AGENT, "Mozilla/5.0")
        .header(ACCEPT, "application/json,text/plain,*/*");
    for (name, value) in extra_headers {
        req = req.header(*name, *value);
    }
    req
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
