mod email;
mod flag;
mod hash;
mod ip;
mod key;
mod name;
mod port;
mod salt;
mod stamp;

pub use email::Email;
pub use flag::ActiveFlag;
pub use hash::PasswordHash;
pub use ip::Ip;
pub use key::PrimaryKey;
pub use name::PersonName;
pub use port::Port;
pub use salt::Salt;
pub use stamp::Timestamp;

use crate::core::Value;

/// A self-validating value object wrapping one scalar domain value.
///
/// A constructed attribute is always valid: invalid input fails construction,
/// it never produces a broken instance. `representation` is the primitive
/// form written to storage and used for comparisons.
pub trait Attribute {
    fn representation(&self) -> Value;
}
