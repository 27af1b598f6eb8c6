//! Budget model
//!
//! A budget caps spending over one period type. The amount actually spent is
//! never stored; [`BudgetReport`] carries it alongside the budget when read.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::storage::Record;

use super::field::{Column, ColumnType, FieldValue, Pk};
use super::money::Money;
use super::period::{DateRange, PeriodType};

/// A spending limit for a day, week or month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum planned spending for the period
    pub limit_amount: Money,

    /// Which period the limit applies to
    pub period_type: PeriodType,

    /// Store-assigned id, 0 until stored
    #[serde(default)]
    pub pk: Pk,
}

impl Budget {
    pub fn new(limit_amount: Money, period_type: PeriodType) -> Self {
        Self {
            limit_amount,
            period_type,
            pk: 0,
        }
    }

    /// Validate the budget
    pub fn validate(&self) -> BookkeeperResult<()> {
        if self.limit_amount.is_negative() {
            return Err(BookkeeperError::Validation(
                "Budget limit cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} limit {}", self.period_type, self.limit_amount)
    }
}

const COLUMNS: &[Column] = &[
    Column::required("limit_amount", ColumnType::Money),
    Column::required("period_type", ColumnType::Text),
];

impl Record for Budget {
    const TABLE: &'static str = "budget";

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn pk(&self) -> Pk {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = pk;
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "limit_amount" => Some(self.limit_amount.into()),
            "period_type" => Some(self.period_type.as_str().into()),
            "pk" => Some(self.pk.into()),
            _ => None,
        }
    }

    fn from_values(pk: Pk, values: &[FieldValue]) -> BookkeeperResult<Self> {
        let [limit_amount, period_type] = values else {
            return Err(BookkeeperError::Storage(format!(
                "budget row has {} columns, expected 2",
                values.len()
            )));
        };
        Ok(Self {
            limit_amount: limit_amount.as_money("limit_amount")?,
            period_type: period_type
                .as_text("period_type")?
                .parse::<PeriodType>()
                .map_err(|e| BookkeeperError::Storage(e.to_string()))?,
            pk,
        })
    }
}

/// A budget together with what was spent during its current period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetReport {
    pub budget: Budget,
    pub range: DateRange,
    pub expenses: Money,
}

impl BudgetReport {
    /// Limit minus spending; negative once the budget is exceeded
    pub fn remaining(&self) -> Money {
        self.budget.limit_amount - self.expenses
    }

    pub fn is_over_limit(&self) -> bool {
        self.expenses > self.budget.limit_amount
    }
}
