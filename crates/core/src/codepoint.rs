use std::{fmt, str::FromStr};

use crate::Error;

/// A Unicode codepoint as given on the command line.
///
/// Parsed as hexadecimal when prefixed with `0x`, decimal otherwise. A sign
/// is only allowed in front of a decimal value. No upper bound is enforced;
/// a value no cmap can map is simply absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codepoint(u32);

impl Codepoint {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

impl FromStr for Codepoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.strip_prefix("0x") {
            Some(hex) if hex.starts_with(['+', '-']) => {
                return Err(Error::InvalidCodepoint(s.to_owned()));
            }
            Some(hex) => u32::from_str_radix(hex, 16),
            None => s.parse(),
        };
        parsed.map(Self).map_err(|_| Error::InvalidCodepoint(s.to_owned()))
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:X})", self.0, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("0x2AF8".parse::<Codepoint>().unwrap(), Codepoint::new(11000));
        assert_eq!("0x2af8".parse::<Codepoint>().unwrap(), Codepoint::new(11000));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!("11000".parse::<Codepoint>().unwrap(), Codepoint::new(11000));
        assert_eq!("0".parse::<Codepoint>().unwrap(), Codepoint::new(0));
        assert_eq!("+65".parse::<Codepoint>().unwrap(), Codepoint::new(65));
    }

    #[test]
    fn test_parse_invalid() {
        for input in [
            "zz", "", "0x", "0xZZ", "0X2AF8", "-1", "2AF8", "1.5", "0x+2AF8", "0x-1", " 65", "1_0",
        ] {
            let err = input.parse::<Codepoint>().unwrap_err();
            assert!(
                matches!(&err, Error::InvalidCodepoint(s) if s == input),
                "unexpected result for {input:?}: {err}"
            );
        }
    }

    #[test]
    fn test_no_upper_bound() {
        assert_eq!("0x110000".parse::<Codepoint>().unwrap().to_u32(), 0x11_0000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Codepoint::new(11000).to_string(), "11000 (0x2AF8)");
    }
}
