pub mod error;
pub mod grid;
pub mod ingest;
pub mod matching;
pub mod period;
pub mod report;
pub mod roster;

pub use error::IngestError;
pub use grid::{CellValue, RawGrid, RawRow};
pub use ingest::{build_report, process_upload, resolve_identities};
pub use matching::{CollisionPolicy, MatchStrategy, RosterIndex};
pub use period::{WeekInfo, extract_period};
pub use report::{
    DriverRecord, Hours, IngestSummary, MatchResult, Report, RiskMetrics, RiskRating,
    assemble_report,
};
pub use roster::{
    EmployeeRecord, InMemoryRoster, MentorBackfill, RosterStore, apply_backfills,
    propose_mentor_backfills,
};
