//! Order assembly: departments, order numbers, pending lines, submission
//! validation and the spreadsheet row layout.

mod draft;
mod number;
mod submission;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use draft::{OrderDraft, OrderLine};
pub use number::generate_order_number;
pub use submission::{
    validate_submission, OrderHeader, ShipTo, SubmissionForm, ValidatedOrder, DEFAULT_COUNTRY,
    SHEET_COLUMNS, SHEET_DATE_FORMAT,
};

/// Total quantity at or above which an order ships through the bulk channel.
pub const BULK_CHANNEL_THRESHOLD: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Marketing,
    Sales,
    Operations,
    Finance,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::Marketing,
        Department::Sales,
        Department::Operations,
        Department::Finance,
    ];

    /// Three-letter prefix used in order numbers.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Department::Marketing => "MKT",
            Department::Sales => "SLS",
            Department::Operations => "OPS",
            Department::Finance => "FIN",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Department::Marketing => "Marketing",
            Department::Sales => "Sales",
            Department::Operations => "Operations",
            Department::Finance => "Finance",
        }
    }

    /// Restricted departments may only order products carrying the
    /// restricted tag.
    #[must_use]
    pub fn is_restricted(self) -> bool {
        matches!(self, Department::Marketing | Department::Sales)
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Department {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Department::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(name) || d.code().eq_ignore_ascii_case(name))
            .ok_or_else(|| OrderError::UnknownDepartment(s.to_string()))
    }
}

/// Fulfillment channel, derived from the total ordered quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    /// Bulk / B2B.
    Bulk,
    /// Direct / D2C.
    Direct,
}

impl Channel {
    #[must_use]
    pub fn for_total_quantity(total: u64) -> Self {
        if total >= BULK_CHANNEL_THRESHOLD {
            Channel::Bulk
        } else {
            Channel::Direct
        }
    }

    #[must_use]
    pub fn sheet_label(self) -> &'static str {
        match self {
            Channel::Bulk => "Influencer B2B",
            Channel::Direct => "Influencer D2C",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShippingMethod {
    FedExGround,
    FedEx2Day,
    FedExStandardOvernight,
}

impl ShippingMethod {
    pub const ALL: [ShippingMethod; 3] = [
        ShippingMethod::FedExGround,
        ShippingMethod::FedEx2Day,
        ShippingMethod::FedExStandardOvernight,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ShippingMethod::FedExGround => "FedEx Ground",
            ShippingMethod::FedEx2Day => "FedEx 2Day",
            ShippingMethod::FedExStandardOvernight => "FedEx Standard Overnight",
        }
    }
}

impl FromStr for ShippingMethod {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShippingMethod::ALL
            .into_iter()
            .find(|m| m.label() == s.trim())
            .ok_or_else(|| OrderError::UnknownShippingMethod(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 2] = [Priority::Medium, Priority::High];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OrderError::UnknownPriority(s.to_string()))
    }
}

/// Order-entry failures. The `Display` text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Ensure product and sku are selected")]
    SelectionMissing,

    #[error("Sku {sku} is not a variant of {title}")]
    UnknownSku { title: String, sku: String },

    #[error("{title} is not available to the {department} department")]
    NotAvailable { title: String, department: Department },

    #[error("Enter a whole-number quantity greater than zero")]
    InvalidQuantity(String),

    #[error("Product out of stock: {sku} allows at most {max} per order (requested {requested})")]
    OutOfStock {
        sku: String,
        requested: u64,
        max: u64,
    },

    #[error("No pending item at position {0}")]
    NoSuchLine(usize),

    #[error("Ensure all mandatory fields are filled (missing: {})", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),

    #[error("Ensure state is abbreviated")]
    StateNotAbbreviated,

    #[error("Add at least one item before submitting")]
    NoItems,

    #[error("Ship-by date must be a calendar date (YYYY-MM-DD)")]
    InvalidShipByDate(String),

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("Unknown shipping method: {0}")]
    UnknownShippingMethod(String),

    #[error("Unknown priority: {0}")]
    UnknownPriority(String),
}
