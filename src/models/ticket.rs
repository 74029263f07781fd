use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Due,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Due => "due",
            PaymentStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeOfPayment {
    Upi,
    Cash,
}

impl ModeOfPayment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeOfPayment::Upi => "upi",
            ModeOfPayment::Cash => "cash",
        }
    }
}

/// Raised when a stored enum column holds a value outside its allowed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value '{value}'")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "due" => Ok(PaymentStatus::Due),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(UnknownVariant {
                field: "payment_status",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for ModeOfPayment {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upi" => Ok(ModeOfPayment::Upi),
            "cash" => Ok(ModeOfPayment::Cash),
            other => Err(UnknownVariant {
                field: "mode_of_payment",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ModeOfPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single raffle sale, keyed by its ticket number.
///
/// The same shape is accepted by the create endpoint and returned by the list
/// endpoint. Dates serialize as `YYYY-MM-DD`; a missing `date_of_payment` is `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_number: u32,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub seller_name: String,
    pub payment_status: PaymentStatus,
    pub mode_of_payment: ModeOfPayment,
    pub date_sold: NaiveDate,
    #[serde(default)]
    pub date_of_payment: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: String,
}

impl Ticket {
    /// Checks the rules serde cannot express. Enum membership and field presence
    /// are already enforced by deserialization.
    pub fn validate(&self) -> Result<(), String> {
        if self.ticket_number == 0 {
            return Err("ticket_number must be at least 1".to_string());
        }
        if self.buyer_name.trim().is_empty() {
            return Err("buyer_name is required".to_string());
        }
        Ok(())
    }

    /// Applies the mark-paid transition in place.
    pub fn mark_paid(&mut self, on: NaiveDate) {
        self.payment_status = PaymentStatus::Paid;
        self.date_of_payment = Some(on);
    }
}

/// Search term for the list endpoint.
///
/// An all-digit term matches a ticket number exactly, whatever its length; one
/// too large for a ticket number (`Number(None)`) matches nothing. Anything else
/// is a case-insensitive substring match on buyer name, seller name or buyer phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketSearch {
    Number(Option<u32>),
    Text(String),
}

impl TicketSearch {
    /// Returns `None` for a blank term.
    pub fn parse(raw: &str) -> Option<Self> {
        let term = raw.trim();
        if term.is_empty() {
            return None;
        }
        if term.bytes().all(|b| b.is_ascii_digit()) {
            return Some(TicketSearch::Number(term.parse().ok()));
        }
        Some(TicketSearch::Text(term.to_lowercase()))
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            TicketSearch::Number(n) => *n == Some(ticket.ticket_number),
            TicketSearch::Text(needle) => {
                ticket.buyer_name.to_lowercase().contains(needle.as_str())
                    || ticket.seller_name.to_lowercase().contains(needle.as_str())
                    || ticket.buyer_phone.to_lowercase().contains(needle.as_str())
            }
        }
    }
}
