//! In-memory filtering and summary stats for the member list.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Utc};

use crate::models::{Member, Year};

/// Admin filter criteria. Empty criteria match everything; active ones intersect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    /// Case-insensitive substring over name, email and university
    pub search: String,
    /// Exact university
    pub university: Option<String>,
    /// Exact year value (`1`..`5`, `graduate`)
    pub year: Option<String>,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || member.name.to_lowercase().contains(&needle)
            || member.email.to_lowercase().contains(&needle)
            || member.university.to_lowercase().contains(&needle);

        let matches_university = self
            .university
            .as_deref()
            .map_or(true, |u| member.university == u);
        let matches_year = self.year.as_deref().map_or(true, |y| member.year == y);

        matches_search && matches_university && matches_year
    }

    pub fn apply<'a>(&self, members: &'a [Member]) -> Vec<&'a Member> {
        members.iter().filter(|m| self.matches(m)).collect()
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.university.is_some() || self.year.is_some()
    }
}

/// Distinct universities, sorted. Feeds the university filter options.
pub fn universities(members: &[Member]) -> Vec<String> {
    members
        .iter()
        .map(|m| m.university.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty years, sorted, with display labels.
pub fn years(members: &[Member]) -> Vec<(String, String)> {
    members
        .iter()
        .filter(|m| !m.year.is_empty())
        .map(|m| m.year.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|y| {
            let label = Year::from_str(&y).map_or_else(|| y.clone(), |year| year.label().to_string());
            (y, label)
        })
        .collect()
}

/// Dashboard summary numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberStats {
    pub total: usize,
    pub universities: usize,
    pub joined_this_month: usize,
    pub joined_today: usize,
}

impl MemberStats {
    /// Compute stats relative to `now`. Calendar boundaries are in UTC.
    pub fn compute(members: &[Member], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let joined_this_month = members
            .iter()
            .filter(|m| m.joined_at.year() == now.year() && m.joined_at.month() == now.month())
            .count();
        let joined_today = members
            .iter()
            .filter(|m| m.joined_at.date_naive() == today)
            .count();

        Self {
            total: members.len(),
            universities: universities(members).len(),
            joined_this_month,
            joined_today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, email: &str, university: &str, year: &str, joined: &str) -> Member {
        Member {
            id: format!("member_{}", name),
            name: name.to_string(),
            email: email.to_string(),
            university: university.to_string(),
            course: String::new(),
            year: year.to_string(),
            phone: String::new(),
            motivation: String::new(),
            joined_at: joined.parse().unwrap(),
        }
    }

    fn sample() -> Vec<Member> {
        vec![
            member("Ada", "ada@x.com", "Unilag", "2", "2026-10-19T08:00:00Z"),
            member("Bola", "bola@univ.ng", "Covenant", "2", "2026-10-02T08:00:00Z"),
            member("Chidi", "chidi@x.com", "University of Ibadan", "4", "2026-09-30T23:00:00Z"),
            member("Univ Fan", "fan@x.com", "OAU", "graduate", "2025-10-19T08:00:00Z"),
        ]
    }

    fn names(members: Vec<&Member>) -> Vec<&str> {
        members.into_iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let members = sample();
        assert_eq!(MemberFilter::default().apply(&members).len(), 4);
        assert!(!MemberFilter::default().is_active());
    }

    #[test]
    fn test_search_is_case_insensitive_over_three_fields() {
        let members = sample();
        let filter = MemberFilter {
            search: "UNIV".to_string(),
            ..Default::default()
        };
        assert_eq!(names(filter.apply(&members)), vec!["Bola", "Chidi", "Univ Fan"]);
    }

    #[test]
    fn test_search_and_year_intersect() {
        let members = sample();
        let filter = MemberFilter {
            search: "univ".to_string(),
            year: Some("2".to_string()),
            ..Default::default()
        };
        assert_eq!(names(filter.apply(&members)), vec!["Bola"]);
    }

    #[test]
    fn test_university_is_exact() {
        let members = sample();
        let filter = MemberFilter {
            university: Some("Unilag".to_string()),
            ..Default::default()
        };
        assert_eq!(names(filter.apply(&members)), vec!["Ada"]);

        let filter = MemberFilter {
            university: Some("unilag".to_string()),
            ..Default::default()
        };
        assert!(filter.apply(&members).is_empty());
    }

    #[test]
    fn test_filter_options() {
        let members = sample();
        assert_eq!(
            universities(&members),
            vec!["Covenant", "OAU", "Unilag", "University of Ibadan"]
        );
        let labels: Vec<_> = years(&members).into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["2nd Year", "4th Year", "Graduate"]);
    }

    #[test]
    fn test_stats() {
        let now = "2026-10-19T12:00:00Z".parse().unwrap();
        let stats = MemberStats::compute(&sample(), now);
        assert_eq!(
            stats,
            MemberStats {
                total: 4,
                universities: 4,
                joined_this_month: 2,
                joined_today: 1,
            }
        );
    }
}
