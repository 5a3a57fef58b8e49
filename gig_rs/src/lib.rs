use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod algorithm;
mod date_key;
mod error;
pub mod http;
mod instrument;
mod roster;
pub mod store;
pub mod workspace;

pub use date_key::DateKey;
pub use error::{Error, Result};
pub use instrument::{group_by_category, resolve_names, Instrument, OTHER_CATEGORY};
pub use roster::{Band, Member, Role, Roster, RosterEntry};

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            value: String,
        }

        impl $name {
            /// ランダムな識別子を発行します
            pub fn generate() -> Self {
                Self {
                    value: Uuid::new_v4().to_string(),
                }
            }

            pub fn as_str(&self) -> &str {
                &self.value
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self {
                    value: value.to_string(),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self { value }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.value
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.value)
            }
        }
    };
}

string_id!(InstrumentId);
string_id!(MemberId);
string_id!(BandId);
string_id!(EventId);
