use std::convert::Infallible;

use derive_more::IsVariant;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, IsVariant)]
pub enum EnumError {
    #[error("integer value {int} is already in use")]
    DuplicateValue { int: i64 },
    #[error("string value {label:?} is already in use")]
    DuplicateLabel { label: String },
    #[error("member {name} is defined more than once")]
    DuplicateMember { name: String },
    #[error("no member named {name}")]
    UnknownMember { name: String },
    #[error("cannot cast to {target:?}, expected int or str")]
    InvalidCastType { target: String },
}

// Lets `cast_enum` take a `CastType` directly, whose `TryInto` cannot fail.
impl From<Infallible> for EnumError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
