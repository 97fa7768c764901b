use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserSummary;

wire_enum!(ReportStatus {
    Pending => "PENDING",
    InProgress => "IN_PROGRESS",
    Resolved => "RESOLVED",
    Rejected => "REJECTED",
});

wire_enum!(ReportType {
    Service => "SERVICE",
    Payment => "PAYMENT",
    Staff => "STAFF",
    Other => "OTHER",
});

/// A dispute raised by a customer or provider and resolved by an admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub status: ReportStatus,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub reporter: Option<UserSummary>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn is_closed(&self) -> bool {
        matches!(self.status, ReportStatus::Resolved | ReportStatus::Rejected)
    }
}
