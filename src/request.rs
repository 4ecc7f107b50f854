use reqwest::Client;

use crate::{Error, Result};

pub(crate) fn build_client(user_agent: &str) -> Result<Client> {
    Ok(Client::builder().user_agent(user_agent).build()?)
}

/// Requests a page and returns a `Result<String>` containing the HTML.
/// Anything but a 2xx answer is an error.
pub(crate) async fn request_page_html(client: Client, url: &str) -> Result<String> {
    let res = client.get(url).send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status,
        });
    }
    let html = res.text().await?;
    Ok(html)
}
