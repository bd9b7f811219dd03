//! Row, insert and change-set types for the CRM tables.
//!
//! Rows mirror the hosted tables column for column. Insert payloads (`New*`)
//! leave out the server-generated columns, and change sets (`*Changes`) only
//! serialize the columns that are being written.

pub mod activity;
pub mod contact;
pub mod deal;
pub mod invoice;
pub mod profile;
pub mod reminder;
pub mod ticket;

pub use activity::{Activity, ActivityType, NewActivity};
pub use contact::{Contact, ContactChanges, ContactSummary, NewContact};
pub use deal::{Deal, DealChanges, DealStatus, NewDeal};
pub use invoice::{Invoice, InvoiceChanges, InvoiceItem, InvoiceStatus, NewInvoice};
pub use profile::{Profile, ProfileChanges};
pub use reminder::{NewReminder, Reminder, ReminderChanges, ReminderPriority};
pub use ticket::{
    NewTicket, NewTicketMessage, Ticket, TicketCategory, TicketChanges, TicketMessage,
    TicketPriority, TicketStatus,
};

use serde::{Deserialize, Deserializer};

/// A model stored in a backend table.
pub trait Table {
    /// Table name under `/rest/v1/`.
    const NAME: &'static str;
}

/// Error returned when a string is not one of an enum's values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl From<UnknownVariant> for crate::error::CrmApiError {
    fn from(err: UnknownVariant) -> Self {
        crate::error::CrmApiError::InvalidRequest(err.to_string())
    }
}

/// Declares a snake_case string enum with `ALL`, `as_str`, `label`,
/// case-insensitive `FromStr` and `Display`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($value:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every value, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value stored in the backend column.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            /// Human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.trim().to_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == lowered)
                    .ok_or_else(|| $crate::models::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use string_enum;

/// Treat a JSON `null` as the type's default (PostgREST sends `null` for
/// empty arrays and unset booleans on older rows).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
