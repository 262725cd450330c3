// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};

use crate::models::TransactionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Clock,
    CheckCircle,
    Activity,
    CalendarClock,
    X,
    AlertCircle,
    CreditCard,
    RefreshCcw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: Icon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Requested,
    Confirmed,
    InProgress,
    Completed,
    Rescheduled,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 6] = [
        AppointmentStatus::Requested,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Rescheduled,
        AppointmentStatus::Cancelled,
    ];

    pub fn badge(self) -> Badge {
        match self {
            AppointmentStatus::Requested => Badge {
                label: "Solicitado",
                color: "purple",
                icon: Icon::Clock,
            },
            AppointmentStatus::Confirmed => Badge {
                label: "Confirmado",
                color: "green",
                icon: Icon::CheckCircle,
            },
            AppointmentStatus::InProgress => Badge {
                label: "Em Atendimento",
                color: "blue",
                icon: Icon::Activity,
            },
            AppointmentStatus::Completed => Badge {
                label: "Concluído",
                color: "gray",
                icon: Icon::CheckCircle,
            },
            AppointmentStatus::Rescheduled => Badge {
                label: "Reagendado",
                color: "amber",
                icon: Icon::CalendarClock,
            },
            AppointmentStatus::Cancelled => Badge {
                label: "Cancelado",
                color: "red",
                icon: Icon::X,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Confirmed,
        PaymentStatus::Refunded,
    ];

    pub fn badge(self) -> Badge {
        match self {
            PaymentStatus::Pending => Badge {
                label: "Pagamento Pendente",
                color: "yellow",
                icon: Icon::AlertCircle,
            },
            PaymentStatus::Confirmed => Badge {
                label: "Pagamento Confirmado",
                color: "emerald",
                icon: Icon::CreditCard,
            },
            PaymentStatus::Refunded => Badge {
                label: "Reembolsado",
                color: "orange",
                icon: Icon::RefreshCcw,
            },
        }
    }
}

impl TransactionStatus {
    pub fn badge(self) -> Badge {
        match self {
            TransactionStatus::Completed => Badge {
                label: "Concluído",
                color: "green",
                icon: Icon::CheckCircle,
            },
            TransactionStatus::Pending => Badge {
                label: "Pendente",
                color: "yellow",
                icon: Icon::Clock,
            },
            TransactionStatus::Cancelled => Badge {
                label: "Cancelado",
                color: "red",
                icon: Icon::X,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_appointment_status_has_a_distinct_label() {
        let mut labels: Vec<_> = AppointmentStatus::ALL
            .iter()
            .map(|s| s.badge().label)
            .collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), AppointmentStatus::ALL.len());
    }

    #[test]
    fn in_progress_serializes_snake_case() {
        let v = serde_json::to_value(AppointmentStatus::InProgress).unwrap();
        assert_eq!(v, "in_progress");
    }

    #[test]
    fn cancelled_transaction_is_red() {
        assert_eq!(TransactionStatus::Cancelled.badge().color, "red");
    }
}
