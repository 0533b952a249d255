use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Currency amount with two fraction digits.
///
/// Backed by a fixed-point [`Decimal`] so bucket comparisons such as
/// `price <= 50` are exact. Travels as a decimal string (`"89.99"`) both on
/// the wire and in the relational schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(Decimal);

impl Price {
    pub const SCALE: u32 = 2;

    pub fn new(amount: Decimal) -> Result<Self, DomainError> {
        if amount < Decimal::ZERO {
            return Err(DomainError::InvalidPrice(amount.to_string()));
        }

        let mut normalized = amount.normalize();
        if normalized.scale() > Self::SCALE {
            return Err(DomainError::InvalidPrice(amount.to_string()));
        }
        normalized.rescale(Self::SCALE);

        Ok(Self(normalized))
    }

    /// Builds a price from a count of cents; always valid.
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), Self::SCALE))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(raw.trim())
            .map_err(|_| DomainError::InvalidPrice(raw.to_string()))?;
        Self::new(amount)
    }
}

impl TryFrom<String> for Price {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(value: Price) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named price bucket used by catalog filtering.
///
/// Only the lowest bucket includes its lower bound; every other bucket is
/// half-open `(lower, upper]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PriceRange {
    UpToFifty,
    FiftyToHundred,
    HundredToTwoHundred,
    AboveTwoHundred,
}

impl PriceRange {
    pub const ALL: [PriceRange; 4] = [
        PriceRange::UpToFifty,
        PriceRange::FiftyToHundred,
        PriceRange::HundredToTwoHundred,
        PriceRange::AboveTwoHundred,
    ];

    /// Resolves a bucket label. Unknown labels yield `None`, which callers
    /// treat as "no price filtering".
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "0-50" => Some(Self::UpToFifty),
            "50-100" => Some(Self::FiftyToHundred),
            "100-200" => Some(Self::HundredToTwoHundred),
            "200+" => Some(Self::AboveTwoHundred),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::UpToFifty => "0-50",
            Self::FiftyToHundred => "50-100",
            Self::HundredToTwoHundred => "100-200",
            Self::AboveTwoHundred => "200+",
        }
    }

    pub fn contains(&self, price: &Price) -> bool {
        let amount = price.amount();
        match self {
            Self::UpToFifty => amount >= Decimal::ZERO && amount <= Decimal::from(50),
            Self::FiftyToHundred => amount > Decimal::from(50) && amount <= Decimal::from(100),
            Self::HundredToTwoHundred => {
                amount > Decimal::from(100) && amount <= Decimal::from(200)
            }
            Self::AboveTwoHundred => amount > Decimal::from(200),
        }
    }
}
