use thiserror::Error;

/// 管線各階段可能產生的錯誤
///
/// Every stage maps its own failures into exactly one of these kinds, and no
/// kind is retried or recovered. The payload is a human-readable description
/// built where the failure happened.
#[derive(Error, Debug)]
pub enum Error {
    /// 無法從遠端取得燃料價格(連線失敗、非 2xx 或回應不是 JSON)
    #[error("failed to fetch fuel prices: {0}")]
    Fetch(String),

    /// API 回應缺少預期的結構
    #[error("unexpected API response shape: {0}")]
    Schema(String),

    /// 讀不到報表的 HTML 樣板
    #[error("report template unavailable: {0}")]
    Template(String),

    /// 寄件的帳號或密碼未設定或仍是預設值
    #[error("mail configuration error: {0}")]
    Config(String),

    /// 郵件伺服器連不上、驗證失敗或拒收
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}
