use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::report::{DriverRecord, MatchResult};
use crate::roster::EmployeeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    #[default]
    KeepLast,
    KeepFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    MentorFirstToken,
    MentorTokenStripped,
    MentorLastToken,
    MentorCombined,
    TransporterId,
}

impl MatchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::MentorFirstToken => "mentor_first_token",
            MatchStrategy::MentorTokenStripped => "mentor_token_stripped",
            MatchStrategy::MentorLastToken => "mentor_last_token",
            MatchStrategy::MentorCombined => "mentor_combined",
            MatchStrategy::TransporterId => "transporter_id",
        }
    }
}

#[derive(Debug)]
pub struct RosterIndex<'a> {
    by_mentor_token: HashMap<String, &'a EmployeeRecord>,
    by_name: HashMap<String, &'a EmployeeRecord>,
    by_transporter_id: HashMap<String, &'a EmployeeRecord>,
}

impl<'a> RosterIndex<'a> {
    pub fn build(roster: &'a [EmployeeRecord], policy: CollisionPolicy) -> Self {
        let mut by_mentor_token = HashMap::new();
        let mut by_name = HashMap::new();
        let mut by_transporter_id = HashMap::new();

        for employee in roster {
            for key in mentor_keys(employee) {
                insert_with_policy(&mut by_mentor_token, key, employee, policy);
            }

            if let Some(key) = name_key(&employee.name) {
                insert_with_policy(&mut by_name, key, employee, policy);
            }

            if let Some(transporter_id) = &employee.transporter_id {
                let key = transporter_id.trim().to_lowercase();
                insert_with_policy(&mut by_transporter_id, key, employee, policy);
            }
        }

        debug!(
            mentor_keys = by_mentor_token.len(),
            name_keys = by_name.len(),
            transporter_keys = by_transporter_id.len(),
            "roster index built"
        );

        Self {
            by_mentor_token,
            by_name,
            by_transporter_id,
        }
    }

    pub fn match_driver(&self, record: &DriverRecord) -> Option<MatchResult> {
        let first = record.first_name_token.trim();
        let last = record.last_name_token.trim();

        if let Some(employee) = self.by_mentor_token.get(first) {
            return Some(annotate(employee, MatchStrategy::MentorFirstToken));
        }

        if first.contains('=') {
            let stripped = strip_padding(first);
            if let Some(employee) = self.by_mentor_token.get(stripped.as_str()) {
                return Some(annotate(employee, MatchStrategy::MentorTokenStripped));
            }

            let bare = alphanumeric_only(first);
            if let Some(employee) = self.by_mentor_token.get(bare.as_str()) {
                return Some(annotate(employee, MatchStrategy::MentorTokenStripped));
            }
        }

        if let Some(employee) = self.by_mentor_token.get(last) {
            return Some(annotate(employee, MatchStrategy::MentorLastToken));
        }

        let combined = format!("{first}_{last}");
        if let Some(employee) = self.by_mentor_token.get(combined.as_str()) {
            return Some(annotate(employee, MatchStrategy::MentorCombined));
        }
        if combined.contains('=') {
            let stripped = strip_padding(&combined);
            if let Some(employee) = self.by_mentor_token.get(stripped.as_str()) {
                return Some(annotate(employee, MatchStrategy::MentorCombined));
            }
        }

        if let Some(employee) = self.by_transporter_id.get(first.to_lowercase().as_str()) {
            return Some(annotate(employee, MatchStrategy::TransporterId));
        }

        None
    }

    pub fn employee_by_name(&self, key: &str) -> Option<&'a EmployeeRecord> {
        self.by_name.get(key).copied()
    }
}

fn annotate(employee: &EmployeeRecord, strategy: MatchStrategy) -> MatchResult {
    MatchResult {
        employee_name: Some(employee.name.clone()),
        transporter_id: employee.transporter_id.clone(),
        strategy,
    }
}

fn insert_with_policy<'a>(
    map: &mut HashMap<String, &'a EmployeeRecord>,
    key: String,
    employee: &'a EmployeeRecord,
    policy: CollisionPolicy,
) {
    if key.is_empty() {
        return;
    }

    match policy {
        CollisionPolicy::KeepLast => {
            map.insert(key, employee);
        }
        CollisionPolicy::KeepFirst => {
            map.entry(key).or_insert(employee);
        }
    }
}

fn mentor_keys(employee: &EmployeeRecord) -> Vec<String> {
    let mut keys = Vec::new();

    let first = employee
        .mentor_first_name
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty());
    let last = employee
        .mentor_last_name
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty());

    for token in [first, last].into_iter().flatten() {
        keys.push(token.to_string());
        keys.push(strip_padding(token));
        keys.push(alphanumeric_only(token));
    }

    if let (Some(first), Some(last)) = (first, last) {
        keys.push(format!("{first}_{last}"));
    }

    keys
}

pub(crate) fn name_key(full_name: &str) -> Option<String> {
    let lowered = full_name.trim().to_lowercase();
    let mut parts = lowered.split_whitespace();
    let first = parts.next()?;

    match parts.last() {
        Some(last) => Some(format!("{first}_{last}")),
        None => Some(first.to_string()),
    }
}

fn strip_padding(token: &str) -> String {
    token.trim_end_matches('=').to_string()
}

fn alphanumeric_only(token: &str) -> String {
    token
        .chars()
        .filter(|character| character.is_ascii_alphanumeric())
        .collect()
}
