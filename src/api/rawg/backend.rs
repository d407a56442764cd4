use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::Status;

/// Sends a GET request to a RAWG endpoint and parses the json response.
pub async fn get<T: DeserializeOwned>(
    client: &reqwest::Client,
    endpoint: &str,
    params: &[(&str, String)],
) -> Result<T, Status> {
    let uri = format!("{RAWG_SERVICE_URL}/{endpoint}");
    let resp = client.get(&uri).query(params).send().await?;

    match resp.status() {
        status if status.is_success() => {}
        StatusCode::NOT_FOUND => {
            return Err(Status::not_found(format!("RAWG endpoint not found: {uri}")))
        }
        status => {
            let text = resp.text().await.unwrap_or_default();
            return Err(Status::unavailable(format!(
                "RAWG returned {status}: {text}\nuri: {uri}"
            )));
        }
    }

    let text = resp.text().await?;
    serde_json::from_str::<T>(&text).map_err(|_| {
        let msg = format!("Received unexpected response: {text}\nuri: {uri}");
        error!(msg);
        Status::unavailable(msg)
    })
}

const RAWG_SERVICE_URL: &str = "https://api.rawg.io/api";
