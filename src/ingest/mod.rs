use tracing::{info, warn};

use crate::error::IngestError;
use crate::grid::RawGrid;
use crate::matching::{CollisionPolicy, RosterIndex};
use crate::period::extract_period;
use crate::report::{IngestSummary, Report, assemble_report};
use crate::roster::{EmployeeRecord, MentorBackfill, propose_mentor_backfills};

mod filter;
mod header;
mod normalize;
mod rows;

pub use filter::filter_valid;
pub use header::{ColumnMapping, Field, detect_header};
pub use normalize::{
    clean_numeric, extract_distance, normalize_hours, normalize_risk, normalize_row,
};
pub use rows::{MappedRow, transform_rows};

pub fn build_report(grid: &RawGrid, file_name: &str) -> Result<Report, IngestError> {
    let week = extract_period(file_name);

    if grid.is_empty() {
        warn!(file = %file_name, "empty grid, assembling report without drivers");
        return Ok(assemble_report(
            week,
            file_name,
            Vec::new(),
            IngestSummary::default(),
        ));
    }

    let mapping = detect_header(grid, file_name)?;
    let mapped_rows = transform_rows(grid, &mapping);
    let rows_transformed = mapped_rows.len();

    let normalized: Vec<_> = mapped_rows
        .iter()
        .map(|row| normalize_row(row, &mapping))
        .collect();
    let drivers = filter_valid(normalized);
    let rows_filtered_out = rows_transformed - drivers.len();

    if drivers.is_empty() {
        warn!(file = %file_name, "no valid driver rows after filtering");
    }

    let summary = IngestSummary {
        rows_scanned: grid.len(),
        header_row: mapping.header_row(),
        rows_transformed,
        rows_filtered_out,
        ..IngestSummary::default()
    };

    info!(
        file = %file_name,
        week = week.week_number,
        year = week.year,
        drivers = drivers.len(),
        "report assembled"
    );

    Ok(assemble_report(week, file_name, drivers, summary))
}

pub fn resolve_identities(
    report: &mut Report,
    roster: &[EmployeeRecord],
    policy: CollisionPolicy,
) {
    let index = RosterIndex::build(roster, policy);
    let mut matched_count = 0;

    for driver in &mut report.drivers {
        driver.matched = index.match_driver(driver);
        if let Some(result) = &driver.matched {
            matched_count += 1;
            *report
                .summary
                .strategy_counts
                .entry(result.strategy.as_str().to_string())
                .or_insert(0) += 1;
        }
    }

    report.summary.matched_count = matched_count;
    report.summary.unmatched_count = report.drivers.len() - matched_count;

    info!(
        matched = matched_count,
        unmatched = report.summary.unmatched_count,
        "identity resolution complete"
    );
}

pub fn process_upload(
    grid: &RawGrid,
    file_name: &str,
    roster: &[EmployeeRecord],
) -> Result<(Report, Vec<MentorBackfill>), IngestError> {
    let mut report = build_report(grid, file_name)?;
    resolve_identities(&mut report, roster, CollisionPolicy::default());
    let backfills = propose_mentor_backfills(&report.drivers, roster, CollisionPolicy::default());

    Ok((report, backfills))
}
