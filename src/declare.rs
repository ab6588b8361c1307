use serde::{Deserialize, Serialize};

/// 固定的收件人，報表只寄給這一個地址
pub const RECIPIENT_EMAIL: &str = "reynaldo.orozco@olpega.net";

/// 寄件人在信件上顯示的名稱
pub const SENDER_NAME: &str = "Sistema de Monitoreo de Precios";

/// 對外請求時使用的 User-Agent
pub const USER_AGENT: &str = "FuelPriceMonitor/1.0";

/// INEGI 的資料僅提供平均價，沒有加油站的統計數
pub const STATION_COUNT_UNAVAILABLE: &str = "N/A";

/// 一種燃料的正規化後報價
///
/// The upstream feed only reports one average figure per fuel type, so
/// `min_price` and `max_price` mirror `average_price`, and `station_count`
/// carries the [`STATION_COUNT_UNAVAILABLE`] marker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FuelPriceEntry {
    #[serde(rename = "type")]
    pub fuel_type: String,
    pub average_price: String,
    pub min_price: String,
    pub max_price: String,
    pub station_count: String,
}

/// 渲染完成的報表，一次執行結束後即丟棄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// 郵件伺服器回覆的寄送結果
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub message_id: String,
    pub recipient: String,
}
