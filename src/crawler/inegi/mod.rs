use std::collections::HashMap;

use reqwest::header::{self, HeaderValue};
use rust_decimal::RoundingStrategy;
use serde_json::Value;

use crate::{
    config,
    declare::{FuelPriceEntry, STATION_COUNT_UNAVAILABLE},
    error::Error,
    logging,
    util::{self, text},
};

/// 原始資料裡燃料名稱的欄位
const FIELD_FUEL_TYPE: &str = "tipo";
/// 原始資料裡價格的欄位
const FIELD_COST: &str = "costo";

/// Fetches the fuel price averages from the INEGI API.
///
/// Issues exactly one POST with the API key and the requested format as
/// form-encoded parameters and returns the JSON payload untouched; the
/// payload shape is the business of [`extract_fuel_prices`].
///
/// # Arguments
///
/// * `cfg`: Endpoint URL and API key.
///
/// # Returns
///
/// * `Result<Value, Error>`: The raw JSON payload, or [`Error::Fetch`] when
///   the call cannot be completed, the remote answers with a non-2xx status
///   or the body is not JSON.
pub async fn fetch_prices(cfg: &config::Inegi) -> Result<Value, Error> {
    logging::info_console("Fetching fuel prices from INEGI API".to_string());

    let mut params = HashMap::new();
    params.insert("type", "json");
    params.insert("key", cfg.key.as_str());

    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    let payload: Value = util::http::post_form(&cfg.url, Some(headers), params)
        .await
        .map_err(|why| {
            let msg = format!("Error fetching fuel prices: {:?}", why);
            logging::error_file_async(msg.clone());
            Error::Fetch(msg)
        })?;

    logging::info_console("Successfully fetched fuel prices data".to_string());

    Ok(payload)
}

/// Extracts and normalizes the fuel price records from the raw payload.
///
/// Records without a fuel type, without a cost, or whose cost is not a finite
/// number are skipped without error; everything else is trimmed, rounded and
/// sorted by fuel type under Spanish collation.
///
/// # Arguments
///
/// * `raw`: The payload returned by [`fetch_prices`].
///
/// # Returns
///
/// * `Result<Vec<FuelPriceEntry>, Error>`: The normalized entries, or
///   [`Error::Schema`] when the payload has no `data` array. An empty `data`
///   array is valid and yields an empty list.
pub fn extract_fuel_prices(raw: &Value) -> Result<Vec<FuelPriceEntry>, Error> {
    logging::info_console("Processing fuel price data".to_string());

    let records = raw
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            let msg = "Invalid API response structure".to_string();
            logging::error_file_async(msg.clone());
            Error::Schema(msg)
        })?;

    let mut fuel_prices: Vec<FuelPriceEntry> = records.iter().filter_map(to_entry).collect();

    fuel_prices.sort_by(|a, b| {
        text::spanish_collation_key(&a.fuel_type)
            .cmp(&text::spanish_collation_key(&b.fuel_type))
            .then_with(|| a.fuel_type.cmp(&b.fuel_type))
    });

    logging::info_console(format!(
        "Processed {} fuel types from API data",
        fuel_prices.len()
    ));

    Ok(fuel_prices)
}

/// 一筆原始資料轉成正規化後的報價，缺欄位或價格不是數字時回傳 None
fn to_entry(record: &Value) -> Option<FuelPriceEntry> {
    let fuel_type = record.get(FIELD_FUEL_TYPE)?.as_str()?.trim().to_string();
    if fuel_type.is_empty() {
        return None;
    }

    let cost = match record.get(FIELD_COST)? {
        Value::String(s) => text::parse_decimal(s, None).ok()?,
        Value::Number(n) => text::parse_decimal(&n.to_string(), None).ok()?,
        _ => return None,
    };

    // 上游只提供平均價，最低與最高價跟著平均價走
    let price = format!(
        "{:.2}",
        cost.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    );

    Some(FuelPriceEntry {
        fuel_type,
        average_price: price.clone(),
        min_price: price.clone(),
        max_price: price,
        station_count: STATION_COUNT_UNAVAILABLE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_fetch_prices() {
        dotenv::dotenv().ok();
        logging::debug_file_async("開始 fetch_prices".to_string());

        let cfg = config::Inegi::default();
        match fetch_prices(&cfg).await {
            Ok(payload) => {
                dbg!(&payload);
            }
            Err(why) => {
                logging::error_file_async(format!("Failed to fetch_prices because {:?}", why));
            }
        }

        logging::debug_file_async("結束 fetch_prices".to_string());
    }

    #[test]
    fn test_extract_fuel_prices() {
        let raw = json!({
            "data": [
                {"tipo": "Ron 95", "costo": "24.35"},
                {"tipo": " Diésel ", "costo": 25.124},
                {"tipo": "Magna", "costo": "22.5"}
            ]
        });

        let entries = extract_fuel_prices(&raw).unwrap();

        assert_eq!(entries.len(), 3);
        // 按照燃料名稱排序，Diésel 的 é 歸在 D 底下
        assert_eq!(entries[0].fuel_type, "Diésel");
        assert_eq!(entries[1].fuel_type, "Magna");
        assert_eq!(entries[2].fuel_type, "Ron 95");

        assert_eq!(entries[0].average_price, "25.12");
        assert_eq!(entries[0].min_price, "25.12");
        assert_eq!(entries[0].max_price, "25.12");
        assert_eq!(entries[0].station_count, STATION_COUNT_UNAVAILABLE);
        assert_eq!(entries[2].average_price, "24.35");
    }

    #[test]
    fn test_extract_skips_malformed_records() {
        let raw = json!({
            "data": [
                {"tipo": "Magna", "costo": "22.5"},
                {"tipo": "Premium"},
                {"costo": "21.0"},
                {"tipo": "Diésel", "costo": "no disponible"},
                {"tipo": "   ", "costo": "20.0"},
                {"tipo": "Ron 95", "costo": null}
            ]
        });

        let entries = extract_fuel_prices(&raw).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].fuel_type, "Magna");
        assert_eq!(entries[0].average_price, "22.50");
    }

    #[test]
    fn test_extract_rounds_half_up_to_two_decimals() {
        let raw = json!({
            "data": [
                {"tipo": "Magna", "costo": 19.1},
                {"tipo": "Premium", "costo": "19.999"},
                {"tipo": "Diésel", "costo": "19.125"}
            ]
        });

        let entries = extract_fuel_prices(&raw).unwrap();

        assert_eq!(entries[0].average_price, "19.13");
        assert_eq!(entries[1].average_price, "19.10");
        assert_eq!(entries[2].average_price, "20.00");
    }

    #[test]
    fn test_extract_keeps_duplicate_fuel_types() {
        let raw = json!({
            "data": [
                {"tipo": "Magna", "costo": "22.5"},
                {"tipo": "Magna", "costo": "23.0"}
            ]
        });

        let entries = extract_fuel_prices(&raw).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].fuel_type, "Magna");
        assert_eq!(entries[1].fuel_type, "Magna");
    }

    #[test]
    fn test_extract_empty_data_is_valid() {
        let raw = json!({"data": []});
        let entries = extract_fuel_prices(&raw).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_extract_missing_data_is_schema_error() {
        let raw = json!({"message": "sin datos"});
        assert!(matches!(
            extract_fuel_prices(&raw),
            Err(Error::Schema(_))
        ));

        let raw = json!({"data": "no es una lista"});
        assert!(matches!(
            extract_fuel_prices(&raw),
            Err(Error::Schema(_))
        ));
    }
}
