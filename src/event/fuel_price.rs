use chrono::Local;

use crate::{
    config, crawler,
    declare::DeliveryReceipt,
    error::Error,
    logging, mailer, report,
};

/// 執行一次完整的燃料價格通報：抓取、正規化、產生報表、寄出
///
/// The four stages run strictly in order; the first failure aborts the run
/// and bubbles up to the caller untouched.
pub async fn execute(cfg: &config::App) -> Result<DeliveryReceipt, Error> {
    let raw = crawler::inegi::fetch_prices(&cfg.inegi).await?;

    let fuel_prices = crawler::inegi::extract_fuel_prices(&raw)?;

    if fuel_prices.is_empty() {
        logging::info_console(
            "No fuel price data available, but continuing with empty report".to_string(),
        );
    } else {
        logging::info_console(format!("Found data for {} fuel types:", fuel_prices.len()));
        for fuel in &fuel_prices {
            logging::info_console(format!(
                "   • {}: ${} promedio",
                fuel.fuel_type, fuel.average_price
            ));
        }
    }

    let rendered = report::render(&fuel_prices, Local::now())?;

    let receipt = mailer::deliver(&cfg.smtp, &rendered).await?;

    logging::info_file_async(format!(
        "Fuel price report delivered to {} (message id: {})",
        receipt.recipient, receipt.message_id
    ));

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use serde_json::json;

    use crate::{crawler, report};

    use super::*;

    /// 從原始回應一路到渲染完成的報表，沒有網路
    #[test]
    fn test_raw_response_to_rendered_report() {
        let raw = json!({"data": [{"tipo": "Diésel", "costo": "22.5"}]});

        let entries = crawler::inegi::extract_fuel_prices(&raw).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].fuel_type, "Diésel");
        assert_eq!(entries[0].average_price, "22.50");

        let now = Local.with_ymd_and_hms(2024, 8, 6, 14, 30, 0).unwrap();
        let rendered = report::render(&entries, now).unwrap();

        assert!(rendered.subject.contains("1 tipos disponibles"));
        assert!(rendered.html.contains("22.50"));
        assert!(rendered.html.contains("Diésel"));
        assert!(rendered.text.contains("1 tipos de combustibles"));
    }

    #[tokio::test]
    #[ignore]
    async fn test_execute() {
        dotenv::dotenv().ok();
        logging::debug_file_async("開始 execute".to_string());

        match execute(&config::SETTINGS).await {
            Ok(receipt) => {
                dbg!(&receipt);
            }
            Err(why) => {
                logging::error_file_async(format!("Failed to execute because {:?}", why));
            }
        }

        logging::debug_file_async("結束 execute".to_string());
    }
}
