//! Network prefixes.

use std::fmt;
use std::str::FromStr;

use super::AddressError;
use crate::config::{MAINNET_PREFIX, TESTNET_PREFIX};

/// The address namespace a textual address is rendered under.
///
/// The binary form of an address carries no network; it only appears in the
/// leading character of the string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// `f` addresses.
    #[default]
    Mainnet,
    /// `t` addresses.
    Testnet,
}

impl Network {
    /// The leading character of addresses on this network.
    pub fn prefix(self) -> char {
        match self {
            Self::Mainnet => MAINNET_PREFIX,
            Self::Testnet => TESTNET_PREFIX,
        }
    }

    pub fn from_prefix(prefix: char) -> Result<Self, AddressError> {
        match prefix {
            MAINNET_PREFIX => Ok(Self::Mainnet),
            TESTNET_PREFIX => Ok(Self::Testnet),
            other => Err(AddressError::UnknownNetwork(other)),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

/// Accepts `mainnet` / `testnet` (any case) or the bare prefix character.
impl FromStr for Network {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "f" => Ok(Self::Mainnet),
            "testnet" | "t" => Ok(Self::Testnet),
            _ => Err(AddressError::UnknownNetworkName(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_is_default() {
        assert_eq!(Network::default(), Network::Mainnet);
    }

    #[test]
    fn prefixes() {
        assert_eq!(Network::Mainnet.prefix(), 'f');
        assert_eq!(Network::Testnet.prefix(), 't');
        assert_eq!(Network::from_prefix('t').unwrap(), Network::Testnet);
        assert!(Network::from_prefix('x').is_err());
    }

    #[test]
    fn parse_names() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("t".parse::<Network>().unwrap(), Network::Testnet);
        assert!("calibnet".parse::<Network>().is_err());
    }
}
