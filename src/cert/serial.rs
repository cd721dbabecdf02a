use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// A certificate serial number, kept as the base-16 string form the client
/// supplied. Normalization is limited to stripping colons and lowercasing;
/// leading zeros are preserved, so two numerically equal serials can still
/// be distinct keys.
#[derive(Debug, Clone, Eq)]
pub struct SerialNumber {
    hex: String,
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerialNumberParseError {
    #[error("Invalid hex character: {0}")]
    InvalidHexCharacter(char),

    #[error("Empty string provided")]
    EmptyString,
}

pub type Result<T> = std::result::Result<T, SerialNumberParseError>;

impl SerialNumber {
    /// Create a new SerialNumber from a hex string (with or without
    /// colons). The input is not validated; serials headed for the store
    /// must come from [`SerialNumber::parse`], since deserialization on
    /// reload rejects non-hex values.
    pub fn new(hex_string: &str) -> Self {
        let hex = hex_string.replace(':', "").to_lowercase();
        Self { hex }
    }

    /// Parse an identifier, confirming it is a base-16 serial number.
    /// Odd-length strings are accepted; a serial is an integer, not an
    /// octet string.
    pub fn parse(identifier: &str) -> Result<Self> {
        if identifier.is_empty() {
            return Err(SerialNumberParseError::EmptyString);
        }

        let cleaned = identifier.replace(':', "").to_lowercase();

        for ch in cleaned.chars() {
            if !ch.is_ascii_hexdigit() {
                return Err(SerialNumberParseError::InvalidHexCharacter(ch));
            }
        }

        Ok(Self { hex: cleaned })
    }

    /// Get the raw hex format (no colons)
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// Big-endian integer bytes of the serial with leading zero bytes
    /// stripped. Two serials are numerically equal exactly when these
    /// byte strings are equal, regardless of casing or zero padding.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let padded = if self.hex.len() % 2 == 0 {
            self.hex.clone()
        } else {
            format!("0{}", self.hex)
        };
        // parse() guarantees hex digits; new() does not, so an invalid
        // value yields an empty byte string rather than a panic.
        let bytes = hex::decode(&padded).unwrap_or_default();
        let first_nonzero = bytes.iter().position(|b| *b != 0);
        match first_nonzero {
            Some(idx) => bytes[idx..].to_vec(),
            None => Vec::new(),
        }
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}

impl From<&str> for SerialNumber {
    fn from(hex_string: &str) -> Self {
        Self::new(hex_string)
    }
}

impl From<String> for SerialNumber {
    fn from(hex_string: String) -> Self {
        Self::new(&hex_string)
    }
}

impl FromStr for SerialNumber {
    type Err = SerialNumberParseError;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Hash for SerialNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hex.hash(state);
    }
}

impl PartialEq for SerialNumber {
    fn eq(&self, other: &Self) -> bool {
        self.hex == other.hex
    }
}

impl Serialize for SerialNumber {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_hex())
    }
}

impl<'de> Deserialize<'de> for SerialNumber {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SerialNumber::parse(&s).map_err(serde::de::Error::custom)
    }
}
