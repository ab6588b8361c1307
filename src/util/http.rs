use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;

use crate::{declare, logging::Logger};

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
///
/// # Returns
///
/// * Result<&'static Client>: A reference to the reqwest client instance,
///   or an error if the client cannot be created.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            // ===== 超時設置 =====
            .connect_timeout(Duration::from_secs(8))
            .timeout(Duration::from_secs(30))
            // ===== Headers =====
            .user_agent(declare::USER_AGENT)
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Performs an HTTP POST request with form-encoded parameters and deserializes
/// the JSON response into the specified type.
///
/// The request is sent exactly once; a transport failure, a non-2xx status or
/// a body that is not valid JSON all end the call with an error.
///
/// # Type Parameters
///
/// * `RES`: The type to deserialize the JSON response into. It must implement `DeserializeOwned`.
///
/// # Arguments
///
/// * `url`: The URL to send the POST request to.
/// * `headers`: An optional set of headers to include with the request.
/// * `params`: A map of form data key-value pairs.
///
/// # Returns
///
/// * `Result<RES>`: The deserialized response, or an error if the request fails
///   or the response cannot be deserialized.
pub async fn post_form<RES: DeserializeOwned>(
    url: &str,
    headers: Option<header::HeaderMap>,
    params: HashMap<&str, &str>,
) -> Result<RES> {
    let visit_log = format!("POST:{url}");
    let client = get_client()?;
    let mut rb = client.post(url);

    if let Some(h) = headers {
        rb = rb.headers(h);
    }

    let start = Instant::now();
    let res = rb.form(&params).send().await;
    let elapsed = start.elapsed().as_millis();

    let response = match res {
        Ok(response) => {
            LOGGER.info(format!("{} {} ms", visit_log, elapsed));
            response
        }
        Err(why) => {
            LOGGER.error(format!("{} failed because {:?}. {} ms", visit_log, why, elapsed));
            return Err(anyhow!("Failed to send request to {} because {:?}", url, why));
        }
    };

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!(
            "{} responded with HTTP error status: {} - {}",
            url,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ));
    }

    response
        .json::<RES>()
        .await
        .map_err(|e| anyhow!("Error parsing response JSON: {:?}", e))
}
