//! Financial records: the immutable input rows of the dashboard.

use crate::{
    error::{DashboardError, DashboardResult},
    geography::StateCode,
    types::{Amount, RecordId},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The dataset a record originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Contracts,
    Assistance,
}

/// The relief legislation an obligation was authorized under.
/// Variants are declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmergencyFundingAct {
    #[serde(rename = "CARES Act")]
    CaresAct,
    #[serde(rename = "American Rescue Plan")]
    AmericanRescuePlan,
    #[serde(rename = "COVID-19 Supplemental")]
    Covid19Supplemental,
    #[serde(rename = "Paycheck Protection Program")]
    PaycheckProtectionProgram,
    #[serde(rename = "Families First Coronavirus Response Act")]
    FamiliesFirst,
    #[serde(rename = "Other")]
    Other,
    #[serde(rename = "None")]
    NotDesignated,
}

impl EmergencyFundingAct {
    pub const ALL: [EmergencyFundingAct; 7] = [
        Self::CaresAct,
        Self::AmericanRescuePlan,
        Self::Covid19Supplemental,
        Self::PaycheckProtectionProgram,
        Self::FamiliesFirst,
        Self::Other,
        Self::NotDesignated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CaresAct => "CARES Act",
            Self::AmericanRescuePlan => "American Rescue Plan",
            Self::Covid19Supplemental => "COVID-19 Supplemental",
            Self::PaycheckProtectionProgram => "Paycheck Protection Program",
            Self::FamiliesFirst => "Families First Coronavirus Response Act",
            Self::Other => "Other",
            Self::NotDesignated => "None",
        }
    }

    /// True for every act except the "None" designation.
    pub fn is_emergency(&self) -> bool {
        !matches!(self, Self::NotDesignated)
    }
}

impl fmt::Display for EmergencyFundingAct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How fiscal year and quarter are derived from a calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiscalCalendar {
    /// US federal fiscal year: starts 1 October, Oct–Dec is Q1 of the next year.
    #[default]
    Federal,
    /// Calendar quarters of the calendar year.
    Calendar,
}

impl FiscalCalendar {
    /// Returns `(fiscal_year, fiscal_period)` with the period in 1..=4.
    pub fn fiscal_year_and_period(&self, date: NaiveDate) -> (i32, u8) {
        match self {
            Self::Calendar => (date.year(), (date.month0() / 3 + 1) as u8),
            Self::Federal => {
                let month = date.month();
                if month >= 10 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), ((month + 2) / 3 + 1) as u8)
                }
            }
        }
    }
}

/// A single obligation/outlay row. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: RecordId,
    pub source: RecordSource,
    pub recipient: String,
    pub recipient_state: StateCode,
    pub program: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_class: Option<String>,
    pub emergency_funding: EmergencyFundingAct,
    /// Positive = allocation, negative = deallocation.
    pub obligation_amount: Amount,
    pub outlay: Amount,
    pub date: NaiveDate,
    pub fiscal_year: i32,
    pub fiscal_period: u8,
}

impl FinancialRecord {
    pub fn is_allocation(&self) -> bool {
        self.obligation_amount > 0.0
    }

    pub fn is_deallocation(&self) -> bool {
        self.obligation_amount < 0.0
    }

    /// Positive obligation, or zero.
    pub fn allocation(&self) -> Amount {
        self.obligation_amount.max(0.0)
    }

    /// Magnitude of a negative obligation, or zero.
    pub fn deallocation(&self) -> Amount {
        (-self.obligation_amount).max(0.0)
    }

    /// Check the row invariants. Records deserialized directly, rather
    /// than built through `NewRecord`, must pass this before use.
    pub fn validate(&self) -> DashboardResult<()> {
        let reason = if self.id.trim().is_empty() {
            "empty id"
        } else if !self.obligation_amount.is_finite() {
            "obligation amount is not finite"
        } else if !self.outlay.is_finite() || self.outlay < 0.0 {
            "outlay must be a non-negative amount"
        } else if !(1..=4).contains(&self.fiscal_period) {
            "fiscal period must be within 1..=4"
        } else {
            return Ok(());
        };
        Err(DashboardError::InvalidRecord {
            id: self.id.clone(),
            reason: reason.to_string(),
        })
    }
}

/// A record before its fiscal fields are derived.
/// This is the shape record loaders read; camelCase aliases accept
/// exports from the browser dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub id: RecordId,
    pub source: RecordSource,
    pub recipient: String,
    #[serde(alias = "recipientState")]
    pub recipient_state: StateCode,
    pub program: String,
    #[serde(default, alias = "objectClass")]
    pub object_class: Option<String>,
    #[serde(alias = "emergencyFunding")]
    pub emergency_funding: EmergencyFundingAct,
    #[serde(alias = "obligationAmount")]
    pub obligation_amount: Amount,
    #[serde(default)]
    pub outlay: Amount,
    pub date: NaiveDate,
}

impl NewRecord {
    /// Validate and derive fiscal fields.
    pub fn into_record(self, calendar: FiscalCalendar) -> DashboardResult<FinancialRecord> {
        let (fiscal_year, fiscal_period) = calendar.fiscal_year_and_period(self.date);
        let record = FinancialRecord {
            id: self.id,
            source: self.source,
            recipient: self.recipient,
            recipient_state: self.recipient_state,
            program: self.program,
            object_class: self.object_class,
            emergency_funding: self.emergency_funding,
            obligation_amount: self.obligation_amount,
            outlay: self.outlay,
            date: self.date,
            fiscal_year,
            fiscal_period,
        };
        record.validate()?;
        Ok(record)
    }
}
