//! Type-safe identifiers for transit entities.
//!
//! Entities reference each other only through these identifiers, never
//! through direct links. All identifiers are plain integers, so they are
//! `Copy` and serialize as bare JSON numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self::new(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

impl_identifier!(BusIdentifier);
impl_identifier!(StopIdentifier);
impl_identifier!(SectionIdentifier);
impl_identifier!(RouteIdentifier);
impl_identifier!(RideIdentifier);
