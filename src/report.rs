use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::matching::MatchStrategy;
use crate::period::WeekInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskRating {
    Unrated,
    Low,
    Medium,
    High,
    Other(String),
}

impl RiskRating {
    pub fn label(&self) -> &str {
        match self {
            RiskRating::Unrated => "-",
            RiskRating::Low => "Low Risk",
            RiskRating::Medium => "Medium Risk",
            RiskRating::High => "High Risk",
            RiskRating::Other(literal) => literal,
        }
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

impl Serialize for RiskRating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Hours {
    Clock(String),
    Decimal(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub acceleration: RiskRating,
    pub braking: RiskRating,
    pub cornering: RiskRating,
    pub speeding: RiskRating,
    pub seatbelt: RiskRating,
    pub following: RiskRating,
    pub distraction: RiskRating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transporter_id: Option<String>,
    pub strategy: MatchStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRecord {
    pub first_name_token: String,
    pub last_name_token: String,
    pub station: String,
    pub total_trips: f64,
    pub total_km: f64,
    pub total_hours: Hours,
    pub overall_rating: String,
    pub risk_metrics: RiskMetrics,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub rows_scanned: usize,
    pub header_row: usize,
    pub rows_transformed: usize,
    pub rows_filtered_out: usize,
    pub matched_count: usize,
    pub unmatched_count: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub strategy_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub week_number: u32,
    pub year: i32,
    pub file_name: String,
    pub report_date: NaiveDate,
    pub drivers: Vec<DriverRecord>,
    pub summary: IngestSummary,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

pub fn assemble_report(
    week: WeekInfo,
    file_name: &str,
    drivers: Vec<DriverRecord>,
    summary: IngestSummary,
) -> Report {
    Report {
        week_number: week.week_number,
        year: week.year,
        file_name: file_name.to_string(),
        report_date: week.report_date,
        drivers,
        summary,
    }
}
