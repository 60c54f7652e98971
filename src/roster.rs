use std::collections::HashSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::matching::{CollisionPolicy, RosterIndex, name_key};
use crate::report::DriverRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transporter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_last_name: Option<String>,
}

pub trait RosterStore {
    fn load_roster(&self) -> Result<Vec<EmployeeRecord>>;
    fn save_roster(&mut self, roster: &[EmployeeRecord]) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    employees: Vec<EmployeeRecord>,
}

impl InMemoryRoster {
    pub fn new(employees: Vec<EmployeeRecord>) -> Self {
        Self { employees }
    }
}

impl RosterStore for InMemoryRoster {
    fn load_roster(&self) -> Result<Vec<EmployeeRecord>> {
        Ok(self.employees.clone())
    }

    fn save_roster(&mut self, roster: &[EmployeeRecord]) -> Result<()> {
        self.employees = roster.to_vec();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorBackfill {
    pub employee_id: String,
    pub mentor_first_name: String,
    pub mentor_last_name: String,
}

pub fn propose_mentor_backfills(
    records: &[DriverRecord],
    roster: &[EmployeeRecord],
    policy: CollisionPolicy,
) -> Vec<MentorBackfill> {
    let index = RosterIndex::build(roster, policy);
    let mut proposals = Vec::new();
    let mut proposed_ids: HashSet<&str> = HashSet::new();

    for record in records {
        let first = record.first_name_token.trim();
        let last = record.last_name_token.trim();
        if first.is_empty() || last.is_empty() {
            continue;
        }

        let key = match name_key(&format!("{first} {last}")) {
            Some(key) => key,
            None => continue,
        };
        let Some(employee) = index.employee_by_name(&key) else {
            continue;
        };

        if employee.mentor_first_name.is_some() || employee.mentor_last_name.is_some() {
            continue;
        }
        if !proposed_ids.insert(employee.id.as_str()) {
            continue;
        }

        proposals.push(MentorBackfill {
            employee_id: employee.id.clone(),
            mentor_first_name: first.to_string(),
            mentor_last_name: last.to_string(),
        });
    }

    if !proposals.is_empty() {
        info!(count = proposals.len(), "mentor token backfills proposed");
    }

    proposals
}

pub fn apply_backfills(roster: &mut [EmployeeRecord], backfills: &[MentorBackfill]) -> usize {
    let mut applied = 0;

    for backfill in backfills {
        let Some(employee) = roster
            .iter_mut()
            .find(|employee| employee.id == backfill.employee_id)
        else {
            continue;
        };

        if employee.mentor_first_name.is_none() && employee.mentor_last_name.is_none() {
            employee.mentor_first_name = Some(backfill.mentor_first_name.clone());
            employee.mentor_last_name = Some(backfill.mentor_last_name.clone());
            applied += 1;
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Hours, RiskMetrics, RiskRating};

    fn driver(first: &str, last: &str) -> DriverRecord {
        DriverRecord {
            first_name_token: first.to_string(),
            last_name_token: last.to_string(),
            station: String::new(),
            total_trips: 0.0,
            total_km: 0.0,
            total_hours: Hours::Decimal(0.0),
            overall_rating: String::new(),
            risk_metrics: RiskMetrics {
                acceleration: RiskRating::Unrated,
                braking: RiskRating::Unrated,
                cornering: RiskRating::Unrated,
                speeding: RiskRating::Unrated,
                seatbelt: RiskRating::Unrated,
                following: RiskRating::Unrated,
                distraction: RiskRating::Unrated,
            },
            matched: None,
        }
    }

    fn blank_employee(id: &str, name: &str) -> EmployeeRecord {
        EmployeeRecord {
            id: id.to_string(),
            name: name.to_string(),
            transporter_id: None,
            mentor_first_name: None,
            mentor_last_name: None,
        }
    }

    #[test]
    fn name_match_on_blank_employee_yields_one_proposal() {
        let roster = vec![blank_employee("e1", "John Smith")];
        let records = vec![driver("John", "Smith"), driver("John", "Smith")];

        let proposals =
            propose_mentor_backfills(&records, &roster, CollisionPolicy::default());

        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].employee_id, "e1");
        assert_eq!(proposals[0].mentor_first_name, "John");
        assert_eq!(proposals[0].mentor_last_name, "Smith");
    }

    #[test]
    fn employees_with_mentor_tokens_are_never_proposed() {
        let mut roster = vec![blank_employee("e1", "John Smith")];
        roster[0].mentor_first_name = Some("tok==".to_string());

        let proposals = propose_mentor_backfills(
            &[driver("John", "Smith")],
            &roster,
            CollisionPolicy::default(),
        );

        assert!(proposals.is_empty());
    }

    #[test]
    fn applying_backfills_fills_only_absent_tokens() {
        let mut roster = vec![blank_employee("e1", "John Smith")];
        let backfills = vec![MentorBackfill {
            employee_id: "e1".to_string(),
            mentor_first_name: "John".to_string(),
            mentor_last_name: "Smith".to_string(),
        }];

        assert_eq!(apply_backfills(&mut roster, &backfills), 1);
        assert_eq!(roster[0].mentor_first_name.as_deref(), Some("John"));

        assert_eq!(apply_backfills(&mut roster, &backfills), 0);
    }

    #[test]
    fn in_memory_store_round_trips() {
        let mut store = InMemoryRoster::new(vec![blank_employee("e1", "John Smith")]);

        let mut roster = store.load_roster().unwrap();
        roster[0].transporter_id = Some("TR-1".to_string());
        store.save_roster(&roster).unwrap();

        assert_eq!(
            store.load_roster().unwrap()[0].transporter_id.as_deref(),
            Some("TR-1")
        );
    }
}
