use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// One billing month. Ordering is chronological (year first, then month).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub struct BillingPeriod {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(month: u32, year: i32) -> Self {
        BillingPeriod { year, month }
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        BillingPeriod {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The period one month later.
    pub fn next(self) -> Self {
        self.plus_months(1)
    }

    pub fn plus_months(self, months: u32) -> Self {
        let total = self.year * 12 + (self.month as i32 - 1) + months as i32;
        BillingPeriod {
            year: total.div_euclid(12),
            month: total.rem_euclid(12) as u32 + 1,
        }
    }

    /// Last calendar day of the billing month. Installments fall due on this
    /// date.
    pub fn last_day(self) -> NaiveDate {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|first| first.pred_opt())
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}
