use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekInfo {
    pub week_number: u32,
    pub year: i32,
    pub report_date: NaiveDate,
}

pub fn extract_period(file_name: &str) -> WeekInfo {
    extract_period_at(file_name, Local::now().date_naive())
}

fn extract_period_at(file_name: &str, today: NaiveDate) -> WeekInfo {
    if let Some(info) = period_from_embedded_date(file_name) {
        return info;
    }
    if let Some(info) = period_from_week_tag(file_name, today) {
        return info;
    }

    debug!(file = %file_name, "no period marker in filename, using current week");
    let iso = today.iso_week();
    WeekInfo {
        week_number: iso.week(),
        year: iso.year(),
        report_date: today,
    }
}

fn period_from_embedded_date(file_name: &str) -> Option<WeekInfo> {
    let pattern = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("valid embedded date regex");
    let captures = pattern.captures(file_name)?;

    let year = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let day = captures[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    if date.weekday() != Weekday::Sun {
        warn!(file = %file_name, date = %date, "embedded date is not a Sunday");
    }

    let monday = date + Duration::days(1);
    let iso = monday.iso_week();

    Some(WeekInfo {
        week_number: iso.week(),
        year: iso.year(),
        report_date: date,
    })
}

fn period_from_week_tag(file_name: &str, today: NaiveDate) -> Option<WeekInfo> {
    let pattern =
        Regex::new(r"(?i)KW\s*(\d{1,2})(?:[-_](\d{4}))?").expect("valid week tag regex");
    let captures = pattern.captures(file_name)?;

    let week_number: u32 = captures[1].parse().ok()?;
    if !(1..=53).contains(&week_number) {
        return None;
    }

    let year = captures
        .get(2)
        .and_then(|value| value.as_str().parse().ok())
        .unwrap_or_else(|| today.iso_week().year());

    let report_date = NaiveDate::from_isoywd_opt(year, week_number, Weekday::Mon).unwrap_or(today);

    Some(WeekInfo {
        week_number,
        year,
        report_date,
    })
}
