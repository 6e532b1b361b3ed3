//! Bot-farming report models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review state of a bot report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Approved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Approved => "approved",
            ReportStatus::Dismissed => "dismissed",
        }
    }
}

/// An automated bot-farming detection awaiting or past admin review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotReport {
    pub report_id: u64,

    /// Round the detection fired on
    pub round_id: u64,

    pub server_name: String,
    pub map_name: String,

    /// Players implicated by the detector
    pub players: Vec<String>,

    /// Detector explanation, e.g. "37 kills in 40s against idle targets"
    pub reason: String,

    pub detected_at: DateTime<Utc>,

    pub status: ReportStatus,

    /// Admin who reviewed it, once reviewed
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Review verdict submitted by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportVerdict {
    /// Confirm the detection; the round stays unranked
    Approve,
    /// Reject the detection; the round is restored to ranked
    Dismiss,
}

impl ReportVerdict {
    pub fn resulting_status(&self) -> ReportStatus {
        match self {
            ReportVerdict::Approve => ReportStatus::Approved,
            ReportVerdict::Dismiss => ReportStatus::Dismissed,
        }
    }
}
