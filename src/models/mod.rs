/// Declares a backend enum together with its wire spelling.
///
/// Values the backend adds later deserialize as `Unknown` instead of failing
/// the whole response.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
            #[serde(other)]
            Unknown,
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown => "UNKNOWN",
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().replace('-', "_").as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}

pub mod asset;
pub mod category;
pub mod conversation;
pub mod location;
pub mod payment;
pub mod report;
pub mod tax;
pub mod user;
pub mod withdrawal;

pub use asset::{Asset, AssetStatus};
pub use category::Category;
pub use conversation::{Conversation, Message};
pub use location::{District, Province, Ward};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use report::{Report, ReportStatus, ReportType};
pub use tax::TaxInfo;
pub use user::{Role, User, UserSummary};
pub use withdrawal::{Withdrawal, WithdrawalStatus};
