use std::{fmt::Display, iter::Sum};

use serde::{Deserialize, Serialize};
use sqlx::Type;

use crate::op;

pub const DEFAULT_CURRENCY_CODE: &str = "INR";

const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------        Money        ---------------------------------------------------------
/// An amount of money, held in the currency's smallest unit (paise for INR).
///
/// Holding integer minor units keeps sums exact, and is also the unit the payment gateway expects, so the value can
/// be handed to the gateway without any further conversion.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Money(i64);

op!(arith Money: Add::add, Sub::sub);
op!(assign Money: AddAssign::add_assign, SubAssign::sub_assign);

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / MINOR_UNITS_PER_MAJOR as u64;
        let minor = abs % MINOR_UNITS_PER_MAJOR as u64;
        write!(f, "{sign}₹{major}.{minor:02}")
    }
}

impl Money {
    /// The amount in the currency's smallest unit.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}
