//! 20-byte account and token address.

use core::fmt;
use core::str::FromStr;

use crate::error::AmmError;

/// An account or token address on the host ledger.
///
/// Wraps a fixed-size `[u8; 20]` array; every byte sequence is a valid
/// address. Displays and parses as `0x`-prefixed lowercase hex.
///
/// # Examples
///
/// ```
/// use datatoken_pool::domain::Address;
///
/// let addr = Address::repeat_byte(0xab);
/// let parsed: Address = addr.to_string().parse().unwrap_or(Address::ZERO);
/// assert_eq!(parsed, addr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// An address with every byte set to `byte`.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Returns `true` for the all-zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const MALFORMED: AmmError =
            AmmError::InvalidConfiguration("address must be 0x followed by 40 hex digits");

        let hex = s.strip_prefix("0x").ok_or(MALFORMED)?;
        if hex.len() != 40 || !hex.is_ascii() {
            return Err(MALFORMED);
        }
        let mut bytes = [0u8; 20];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = hex.get(2 * i..2 * i + 2).ok_or(MALFORMED)?;
            *byte = u8::from_str_radix(pair, 16).map_err(|_| MALFORMED)?;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AmmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}
