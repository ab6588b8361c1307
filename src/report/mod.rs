use std::fmt::Write;
use std::fs;

use chrono::{DateTime, Local};

use crate::{
    declare::{FuelPriceEntry, Report},
    error::Error,
    logging,
    util::datetime,
};

/// 信件樣板的路徑，樣板裡有 ${currentDate} 與 ${tableRows} 兩個佔位符
const TEMPLATE_PATH: &str = "templates/email.html";

const CURRENT_DATE_PLACEHOLDER: &str = "${currentDate}";
const TABLE_ROWS_PLACEHOLDER: &str = "${tableRows}";

/// Renders the fuel price report from the entry list and the supplied run
/// timestamp.
///
/// The caller passes `now` explicitly; this module never reads the wall
/// clock, so the same inputs always produce the same report.
///
/// # Arguments
///
/// * `entries`: The normalized fuel price entries, already sorted.
/// * `now`: The run timestamp stamped into the body and the subject.
///
/// # Returns
///
/// * `Result<Report, Error>`: The rendered subject, HTML body and plain-text
///   fallback, or [`Error::Template`] when the HTML template cannot be read.
pub fn render(entries: &[FuelPriceEntry], now: DateTime<Local>) -> Result<Report, Error> {
    logging::info_console("Generating HTML email content".to_string());

    let template = fs::read_to_string(TEMPLATE_PATH).map_err(|why| {
        let msg = format!("Failed to read {} because {:?}", TEMPLATE_PATH, why);
        logging::error_file_async(msg.clone());
        Error::Template(msg)
    })?;

    let report = render_with_template(&template, entries, now);

    logging::info_console("HTML email content generated successfully".to_string());

    Ok(report)
}

/// Pure substitution step: same template, entries and timestamp give a
/// byte-identical report on every call.
pub fn render_with_template(
    template: &str,
    entries: &[FuelPriceEntry],
    now: DateTime<Local>,
) -> Report {
    let html = template
        .replacen(CURRENT_DATE_PLACEHOLDER, &datetime::format_long_es(&now), 1)
        .replacen(TABLE_ROWS_PLACEHOLDER, &table_rows(entries), 1);

    let short_date = datetime::format_short_es(&now);
    let fuel_count = entries.len();

    let subject = format!(
        "📊 Reporte Precios Combustibles - {} ({} tipos disponibles)",
        short_date, fuel_count
    );

    let text = format!(
        "Reporte de Precios de Combustibles - {}\n\n\
         Se han procesado {} tipos de combustibles.\n\
         Para ver el reporte completo, consulte la versión HTML de este email.\n\n\
         Datos proporcionados por INEGI.",
        short_date, fuel_count
    );

    Report {
        subject,
        html,
        text,
    }
}

/// 每種燃料一列，只有名稱與平均價兩欄；沒有資料時放一列佔位訊息
fn table_rows(entries: &[FuelPriceEntry]) -> String {
    if entries.is_empty() {
        return r#"
            <tr>
                <td colspan="2" style="text-align:center;padding:20px;color:#666;font-style:italic;">
                    No hay datos de precios disponibles en este momento.
                </td>
            </tr>
"#
        .to_string();
    }

    let mut rows = String::with_capacity(entries.len() * 256);
    for fuel in entries {
        let _ = write!(
            &mut rows,
            r#"
            <tr>
                <td style="padding:12px;border-bottom:1px solid #e0e0e0;font-weight:500;">
                    {fuel_type}
                </td>
                <td style="padding:12px;border-bottom:1px solid #e0e0e0;text-align:right;font-weight:600;color:#2c5530;">
                    ${price}
                </td>
            </tr>
"#,
            fuel_type = fuel.fuel_type,
            price = fuel.average_price
        );
    }

    rows
}
