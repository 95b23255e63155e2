//! The closed set of US state and territory codes recipients can belong to.
//!
//! RULE: a `StateCode` can only be built from an entry in `STATES`.
//! The table is sorted by code, so the index ordering of `StateCode`
//! is the alphabetical ordering of its code.

use crate::error::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

struct StateEntry {
    code: &'static str,
    name: &'static str,
    territory: bool,
}

const fn state(code: &'static str, name: &'static str) -> StateEntry {
    StateEntry { code, name, territory: false }
}

const fn territory(code: &'static str, name: &'static str) -> StateEntry {
    StateEntry { code, name, territory: true }
}

// Sorted by code. Never insert out of order. Lookups binary-search this table.
const STATES: &[StateEntry] = &[
    state("AK", "Alaska"),
    state("AL", "Alabama"),
    state("AR", "Arkansas"),
    territory("AS", "American Samoa"),
    state("AZ", "Arizona"),
    state("CA", "California"),
    state("CO", "Colorado"),
    state("CT", "Connecticut"),
    state("DC", "District of Columbia"),
    state("DE", "Delaware"),
    state("FL", "Florida"),
    state("GA", "Georgia"),
    territory("GU", "Guam"),
    state("HI", "Hawaii"),
    state("IA", "Iowa"),
    state("ID", "Idaho"),
    state("IL", "Illinois"),
    state("IN", "Indiana"),
    state("KS", "Kansas"),
    state("KY", "Kentucky"),
    state("LA", "Louisiana"),
    state("MA", "Massachusetts"),
    state("MD", "Maryland"),
    state("ME", "Maine"),
    state("MI", "Michigan"),
    state("MN", "Minnesota"),
    state("MO", "Missouri"),
    territory("MP", "Northern Mariana Islands"),
    state("MS", "Mississippi"),
    state("MT", "Montana"),
    state("NC", "North Carolina"),
    state("ND", "North Dakota"),
    state("NE", "Nebraska"),
    state("NH", "New Hampshire"),
    state("NJ", "New Jersey"),
    state("NM", "New Mexico"),
    state("NV", "Nevada"),
    state("NY", "New York"),
    state("OH", "Ohio"),
    state("OK", "Oklahoma"),
    state("OR", "Oregon"),
    state("PA", "Pennsylvania"),
    territory("PR", "Puerto Rico"),
    state("RI", "Rhode Island"),
    state("SC", "South Carolina"),
    state("SD", "South Dakota"),
    state("TN", "Tennessee"),
    state("TX", "Texas"),
    state("UT", "Utah"),
    state("VA", "Virginia"),
    territory("VI", "U.S. Virgin Islands"),
    state("VT", "Vermont"),
    state("WA", "Washington"),
    state("WI", "Wisconsin"),
    state("WV", "West Virginia"),
    state("WY", "Wyoming"),
];

/// A validated two-letter US state or territory code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(u8);

impl StateCode {
    /// Look up a code. Accepts surrounding whitespace and lowercase input.
    pub fn parse(code: &str) -> DashboardResult<Self> {
        let normalized = code.trim().to_ascii_uppercase();
        STATES
            .binary_search_by(|entry| entry.code.cmp(normalized.as_str()))
            .map(|idx| StateCode(idx as u8))
            .map_err(|_| DashboardError::InvalidStateCode(code.to_string()))
    }

    pub fn code(&self) -> &'static str {
        STATES[self.0 as usize].code
    }

    pub fn name(&self) -> &'static str {
        STATES[self.0 as usize].name
    }

    pub fn is_territory(&self) -> bool {
        STATES[self.0 as usize].territory
    }

    /// Every valid code, states and territories, in code order.
    pub fn all() -> impl Iterator<Item = StateCode> + Clone {
        (0..STATES.len()).map(|idx| StateCode(idx as u8))
    }

    /// The 50 states plus DC.
    pub fn states_and_dc() -> impl Iterator<Item = StateCode> + Clone {
        Self::all().filter(|code| !code.is_territory())
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for StateCode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StateCode {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.code().to_string()
    }
}
