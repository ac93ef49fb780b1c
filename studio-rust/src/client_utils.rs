use crate::StudioError;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

/// Create a JSON request, parse the response.
/// Throws error on non-success status code.
pub async fn send_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
    headers: reqwest::header::HeaderMap,
) -> Result<R, StudioError> {
    let response = client.post(url).headers(headers).json(data).send().await?;
    let status = response.status();
    if status.is_success() {
        Ok(response.json::<R>().await?)
    } else {
        Err(StudioError::StatusCode(
            status,
            response.text().await.unwrap_or_default(),
        ))
    }
}
