// Path: crates/client/src/intents/view.rs
//! Derived views over loaded proposals.

use ballot_types::app::{Proposal, ProposalResults, ProposalStatus};
use serde::Serialize;
use std::fmt;

/// Number of proposals shown in the dashboard's recent list.
pub const RECENT_LIMIT: usize = 5;

/// List filters. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalFilter {
    /// Case-insensitive substring of the title, description, or category.
    pub search: Option<String>,
    pub status: Option<ProposalStatus>,
    /// Exact category match.
    pub category: Option<String>,
}

impl ProposalFilter {
    pub fn matches(&self, proposal: &Proposal, now: u64) -> bool {
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = [&proposal.title, &proposal.description, &proposal.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        if let Some(status) = self.status {
            if proposal.status_at(now) != status {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &proposal.category != category {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, proposals: &'a [Proposal], now: u64) -> Vec<&'a Proposal> {
        proposals.iter().filter(|p| self.matches(p, now)).collect()
    }
}

/// The leading option of a tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    NoVotes,
    Yes,
    No,
    Tie,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoVotes => "No votes",
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Tie => "Tie",
        })
    }
}

pub fn winning_option(results: &ProposalResults) -> Outcome {
    if results.total_votes == 0 {
        Outcome::NoVotes
    } else if results.yes_votes > results.no_votes {
        Outcome::Yes
    } else if results.no_votes > results.yes_votes {
        Outcome::No
    } else {
        Outcome::Tie
    }
}

/// Landing page aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_proposals: usize,
    pub active_proposals: usize,
    pub active: Vec<Proposal>,
    /// Newest first.
    pub recent: Vec<Proposal>,
}

/// The last `limit` ids, newest first.
pub fn recent_ids(all: &[u64], limit: usize) -> Vec<u64> {
    all.iter().rev().take(limit).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_test_utils::fixtures::{proposal, results, T0};

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut p = proposal(1, T0, T0 + 10);
        p.category = "Treasury".into();
        let filter = ProposalFilter {
            search: Some("TREAS".into()),
            ..Default::default()
        };
        assert!(filter.matches(&p, T0));

        let filter = ProposalFilter {
            search: Some("nothing like this".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&p, T0));
    }

    #[test]
    fn status_and_category_filters_combine() {
        let open = proposal(1, T0, T0 + 100);
        let mut closed = proposal(2, T0 - 100, T0 - 1);
        closed.category = "Technical".into();
        let upcoming = proposal(3, T0 + 50, T0 + 100);
        let all = [open, closed, upcoming];

        let active = ProposalFilter {
            status: Some(ProposalStatus::Active),
            ..Default::default()
        };
        let ids: Vec<u64> = active.apply(&all, T0).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);

        let technical_ended = ProposalFilter {
            status: Some(ProposalStatus::Ended),
            category: Some("Technical".into()),
            ..Default::default()
        };
        let ids: Vec<u64> = technical_ended.apply(&all, T0).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2]);

        assert_eq!(ProposalFilter::default().apply(&all, T0).len(), 3);
    }

    #[test]
    fn winner_is_derived_from_raw_counts() {
        assert_eq!(winning_option(&results(0, 0)), Outcome::NoVotes);
        assert_eq!(winning_option(&results(3, 1)), Outcome::Yes);
        assert_eq!(winning_option(&results(1, 3)), Outcome::No);
        assert_eq!(winning_option(&results(2, 2)), Outcome::Tie);
        assert_eq!(Outcome::NoVotes.to_string(), "No votes");
    }

    #[test]
    fn recent_ids_are_newest_first() {
        assert_eq!(recent_ids(&[1, 2, 3, 4, 5, 6, 7], RECENT_LIMIT), vec![7, 6, 5, 4, 3]);
        assert_eq!(recent_ids(&[1, 2], RECENT_LIMIT), vec![2, 1]);
    }
}
