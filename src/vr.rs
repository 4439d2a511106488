//! Value representations and the storage-related queries
//! used by the value container.

use std::fmt;
use std::str::{from_utf8, FromStr};

/// An enum type for a DICOM value representation.
///
/// Besides the standard representations, two meta representations
/// are provided for dictionary entries whose concrete representation
/// depends on the data: [`OX`] resolves to OB or OW and [`XS`]
/// resolves to SS or US once a value is constructed.
///
/// [`OX`]: #variant.OX
/// [`XS`]: #variant.XS
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Float
    OF,
    /// Other Word
    OW,
    /// Other Byte or Other Word, resolved by the source element width
    OX,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Time
    TM,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
    /// Signed Short or Unsigned Short, resolved by the source signedness
    XS,
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        from_utf8(chars.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    pub fn to_string(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OF => "OF",
            OW => "OW",
            OX => "OX",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            TM => "TM",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            US => "US",
            UT => "UT",
            XS => "XS",
        }
    }

    /// Retrieve a copy of this VR's byte representation.
    /// The function returns two alphabetic characters in upper case.
    pub fn to_bytes(self) -> [u8; 2] {
        let bytes = self.to_string().as_bytes();
        [bytes[0], bytes[1]]
    }

    /// Whether values of this representation are stored as text bytes,
    /// with multiple values packed into one backslash-separated string.
    pub fn is_text(self) -> bool {
        use VR::*;
        matches!(
            self,
            AE | AS | CS | DA | DS | DT | IS | LO | LT | PN | SH | ST | TM | UI | UT
        )
    }

    /// Whether values of this representation are affected by the
    /// Specific Character Set of the enclosing data set.
    pub fn has_specific_character_set(self) -> bool {
        use VR::*;
        matches!(self, LO | LT | PN | SH | ST | UT)
    }

    /// Whether this is one of the unrestricted text representations
    /// (ST, LT or UT), which hold exactly one value: backslashes are
    /// ordinary characters and never act as a value separator.
    pub fn is_long_text(self) -> bool {
        use VR::*;
        matches!(self, ST | LT | UT)
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two UTF-8 encoded alphabetic characters
/// in upper case, otherwise no match is made.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "OB" => Ok(OB),
            "OF" => Ok(OF),
            "OW" => Ok(OW),
            "OX" => Ok(OX),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "TM" => Ok(TM),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "US" => Ok(US),
            "UT" => Ok(UT),
            "XS" => Ok(XS),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        assert_eq!(VR::from_str("DS"), Ok(VR::DS));
        assert_eq!(VR::from_binary(*b"OW"), Some(VR::OW));
        assert_eq!(VR::from_binary(*b"ox"), None);
        assert_eq!(VR::AT.to_string(), "AT");
        assert_eq!(VR::UI.to_bytes(), *b"UI");
        assert_eq!(format!("{}", VR::SQ), "SQ");
    }

    #[test]
    fn storage_queries() {
        assert!(VR::CS.is_text());
        assert!(VR::UI.is_text());
        assert!(VR::UT.is_text());
        assert!(!VR::OB.is_text());
        assert!(!VR::AT.is_text());

        assert!(VR::PN.has_specific_character_set());
        assert!(VR::LO.has_specific_character_set());
        assert!(!VR::CS.has_specific_character_set());
        assert!(!VR::UI.has_specific_character_set());

        assert!(VR::ST.is_long_text());
        assert!(VR::LT.is_long_text());
        assert!(VR::UT.is_long_text());
        assert!(!VR::LO.is_long_text());
    }
}
