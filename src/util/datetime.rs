use chrono::{DateTime, Datelike, Local, Timelike};

/// 西班牙文的月份全名，chrono 沒有內建 es-MX 的格式
const MONTHS_LONG_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// 西班牙文的月份縮寫
const MONTHS_SHORT_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Formats a timestamp the long Mexican-Spanish way for the report body.
///
/// # Example
///
/// ```
/// // 2026-08-06 14:05 => "6 de agosto de 2026, 14:05"
/// ```
pub fn format_long_es(dt: &DateTime<Local>) -> String {
    format!(
        "{} de {} de {}, {:02}:{:02}",
        dt.day(),
        MONTHS_LONG_ES[dt.month0() as usize],
        dt.year(),
        dt.hour(),
        dt.minute()
    )
}

/// Formats a date the short Mexican-Spanish way for the subject line.
///
/// # Example
///
/// ```
/// // 2026-08-06 => "6 ago 2026"
/// ```
pub fn format_short_es(dt: &DateTime<Local>) -> String {
    format!(
        "{} {} {}",
        dt.day(),
        MONTHS_SHORT_ES[dt.month0() as usize],
        dt.year()
    )
}
