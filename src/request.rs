use reqwest::Client;

use crate::{Error, Result, REQUEST_TIMEOUT, USER_AGENT};

/// One client for the whole run. Carries the fixed User-Agent and timeout.
pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

#[inline]
pub fn year_url(base_url: &str, year: u16) -> String {
    format!("{base_url}?year={year}")
}

/// Requests the leaderboard page for `year` and returns the HTML.
/// Non-2xx responses are reported as `Error::Http`, everything on the wire as `Error::Transport`.
pub async fn request_year_html(client: &Client, base_url: &str, year: u16) -> Result<String> {
    let url = year_url(base_url, year);
    let res = client.get(&url).send().await?;

    let status = res.status();
    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            url,
        });
    }

    let html = res.text().await?;
    Ok(html)
}
