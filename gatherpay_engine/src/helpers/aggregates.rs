use std::{iter::Sum, ops::Add};

use serde::{Deserialize, Serialize};

use crate::db_types::{Contribution, Money};

/// Collection figures for one event, or for a set of events. Never stored; always recomputed from the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub total_collection: Money,
    pub total_participants: u64,
}

impl Add for Aggregates {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            total_collection: self.total_collection + rhs.total_collection,
            total_participants: self.total_participants + rhs.total_participants,
        }
    }
}

impl Sum for Aggregates {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Sums the amounts and counts the contributions that completed. Pending and failed entries are ignored.
pub fn aggregate(contributions: &[Contribution]) -> Aggregates {
    contributions.iter().filter(|c| c.is_completed()).fold(Aggregates::default(), |acc, c| Aggregates {
        total_collection: acc.total_collection + c.amount,
        total_participants: acc.total_participants + 1,
    })
}
