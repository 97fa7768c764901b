use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

wire_enum!(PaymentMethod {
    Cash => "CASH",
    BankTransfer => "BANK_TRANSFER",
    VnPay => "VNPAY",
    Momo => "MOMO",
});

wire_enum!(PaymentStatus {
    Pending => "PENDING",
    Paid => "PAID",
    Failed => "FAILED",
    Refunded => "REFUNDED",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    #[serde(default)]
    pub booking_id: Option<String>,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Gateway page to send the customer to, for online methods.
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "VND".to_string()
}
