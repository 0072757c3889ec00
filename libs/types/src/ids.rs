//! Identifier types for back-office entities
//!
//! All identifiers are opaque strings on the wire (CUSIPs, trade ids,
//! inquiry ids). Newtypes keep them from being mixed up across services.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// Product identifier (a CUSIP for Treasuries, a sector name for buckets)
    ProductId
);

string_id!(
    /// Trade identifier, either read from trades.txt or derived from an execution
    TradeId
);

string_id!(
    /// Execution order identifier
    OrderId
);

string_id!(
    /// Customer inquiry identifier (`INQ`-prefixed)
    InquiryId
);
