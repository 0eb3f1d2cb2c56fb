//! Enumerated attribute domains
//!
//! Each enumeration is declared once here; the registry tables use the
//! generated `LITERALS` slices as attribute domains and the typed views parse
//! stored literals back into these enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A literal outside an enumerated domain.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {domain} literal: {value}")]
pub struct UnknownLiteral {
    pub domain: &'static str,
    pub value: String,
}

macro_rules! schema_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $name {
            /// Literal set accepted by the document format.
            pub const LITERALS: &'static [&'static str] = &[$($literal),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $literal,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLiteral;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok($name::$variant),)+
                    _ => Err(UnknownLiteral { domain: stringify!($name), value: s.to_string() }),
                }
            }
        }
    };
}

schema_enum! {
    /// Schema version of the configuration document.
    ConfigVersion {
        V1 => "1.0",
    }
}

schema_enum! {
    /// Direction(s) an endpoint may be used in.
    EndpointType {
        SenderAndReceiver => "senderAndReceiver",
        Receiver => "receiver",
        Sender => "sender",
    }
}

schema_enum! {
    /// Connector lookup policy when an endpoint is bound.
    CreateConnector {
        AlwaysCreate => "ALWAYS_CREATE",
        GetOrCreate => "GET_OR_CREATE",
    }
}

schema_enum! {
    /// Behaviour of a thread pool once every worker is busy.
    PoolExhaustedAction {
        Wait => "WAIT",
        Discard => "DISCARD",
        DiscardOldest => "DISCARD_OLDEST",
        Abort => "ABORT",
        Run => "RUN",
    }
}

schema_enum! {
    /// Behaviour of an object pool once every instance is checked out.
    ExhaustedAction {
        Grow => "GROW",
        Wait => "WAIT",
        Fail => "FAIL",
    }
}

schema_enum! {
    /// How many pooled instances are created when a pool starts.
    InitialisationPolicy {
        InitialiseNone => "INITIALISE_NONE",
        InitialiseFirst => "INITIALISE_FIRST",
        InitialiseAll => "INITIALISE_ALL",
    }
}

schema_enum! {
    /// Lifecycle state a component enters at startup.
    InitialState {
        Started => "started",
        Stopped => "stopped",
    }
}

schema_enum! {
    /// Transaction demarcation applied by an endpoint or router.
    TransactionAction {
        None => "NONE",
        AlwaysBegin => "ALWAYS_BEGIN",
        BeginOrJoin => "BEGIN_OR_JOIN",
        AlwaysJoin => "ALWAYS_JOIN",
        JoinIfPossible => "JOIN_IF_POSSIBLE",
    }
}

schema_enum! {
    /// When an outbound router stamps correlation information.
    EnableCorrelation {
        Always => "ALWAYS",
        Never => "NEVER",
        IfNotSet => "IF_NOT_SET",
    }
}

schema_enum! {
    /// Which pool a threading profile configures.
    ThreadingProfileId {
        Default => "default",
        Receiver => "receiver",
        Dispatcher => "dispatcher",
        Component => "component",
    }
}
