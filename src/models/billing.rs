//! Billing model
//!
//! One bill per appointment: the billed total, what has been paid so far and
//! the collection state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{EntityKind, TableRow};
use super::ids::{AppointmentId, BillingId};
use super::money::Money;
use crate::query::Record;

/// Collection state of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [Self::Paid, Self::Pending, Self::Overdue];
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Pending => write!(f, "Pending"),
            Self::Overdue => write!(f, "Overdue"),
        }
    }
}

/// A bill raised for an appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    pub id: BillingId,
    pub appointment_id: AppointmentId,
    pub total_amount: Money,
    #[serde(default)]
    pub amount_paid: Money,
    pub payment_status: PaymentStatus,
}

impl Billing {
    /// Create a bill; a `Paid` bill is recorded as fully paid
    pub fn new(
        id: i64,
        appointment_id: AppointmentId,
        total_amount: Money,
        payment_status: PaymentStatus,
    ) -> Self {
        let amount_paid = match payment_status {
            PaymentStatus::Paid => total_amount,
            _ => Money::zero(),
        };
        Self {
            id: BillingId::new(id),
            appointment_id,
            total_amount,
            amount_paid,
            payment_status,
        }
    }

    /// Override the paid amount (partial payments)
    pub fn with_amount_paid(mut self, amount_paid: Money) -> Self {
        self.amount_paid = amount_paid;
        self
    }

    /// Amount still owed
    pub fn outstanding(&self) -> Money {
        Money::from_cents(self.total_amount.cents() - self.amount_paid.cents())
    }
}

impl TableRow for Billing {
    const KIND: EntityKind = EntityKind::Billing;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id.get())
            .with("appointment_id", self.appointment_id.get())
            .with("total_amount", self.total_amount)
            .with("amount_paid", self.amount_paid)
            .with("payment_status", self.payment_status.to_string())
    }
}
