//! X-ray line designations in IUPAC or Siegbahn notation.

use std::fmt;
use std::str::FromStr;

use crate::error::{HmsaError, Result};

/// Notation of an X-ray line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    /// IUPAC notation, e.g. `K-L3`
    Iupac,
    /// Siegbahn notation, e.g. `Ka1`
    Siegbahn,
}

impl Notation {
    /// Name used in the `Notation` attribute.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Notation::Iupac => "IUPAC",
            Notation::Siegbahn => "Siegbahn",
        }
    }

    /// The other notation.
    pub const fn other(&self) -> Notation {
        match self {
            Notation::Iupac => Notation::Siegbahn,
            Notation::Siegbahn => Notation::Iupac,
        }
    }
}

impl FromStr for Notation {
    type Err = HmsaError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("IUPAC") {
            Ok(Notation::Iupac)
        } else if s.eq_ignore_ascii_case("Siegbahn") {
            Ok(Notation::Siegbahn)
        } else {
            Err(HmsaError::validation(format!("Unknown X-ray line notation: {}", s)))
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An X-ray line with its notation and an optional designation in the
/// other notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XRayLine {
    line: String,
    notation: Notation,
    alternative: Option<String>,
}

impl XRayLine {
    /// Create an X-ray line.
    pub fn new(line: impl Into<String>, notation: Notation) -> Result<Self> {
        let line = line.into();
        if line.trim().is_empty() {
            return Err(HmsaError::validation("X-ray line cannot be empty"));
        }
        Ok(Self {
            line,
            notation,
            alternative: None,
        })
    }

    /// Attach the designation in the other notation.
    pub fn with_alternative(mut self, alternative: impl Into<String>) -> Result<Self> {
        let alternative = alternative.into();
        if alternative.trim().is_empty() {
            return Err(HmsaError::validation("X-ray line alternative cannot be empty"));
        }
        self.alternative = Some(alternative);
        Ok(self)
    }

    /// Line label, e.g. `Ka1` or `K-L3`.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Notation of the label.
    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Designation in the other notation, if known.
    pub fn alternative(&self) -> Option<&str> {
        self.alternative.as_deref()
    }

    /// Designation in the requested notation, if known.
    pub fn in_notation(&self, notation: Notation) -> Option<&str> {
        if notation == self.notation {
            Some(&self.line)
        } else {
            self.alternative()
        }
    }
}

impl fmt::Display for XRayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)?;
        if let Some(alternative) = &self.alternative {
            write!(f, " ({})", alternative)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notation_lookup() {
        let line = XRayLine::new("K-L3", Notation::Iupac)
            .unwrap()
            .with_alternative("Ka1")
            .unwrap();
        assert_eq!(line.in_notation(Notation::Iupac), Some("K-L3"));
        assert_eq!(line.in_notation(Notation::Siegbahn), Some("Ka1"));
        assert_eq!(line.to_string(), "K-L3 (Ka1)");
    }

    #[test]
    fn test_parse_notation() {
        assert_eq!("iupac".parse::<Notation>().unwrap(), Notation::Iupac);
        assert_eq!("Siegbahn".parse::<Notation>().unwrap(), Notation::Siegbahn);
        assert!("Moseley".parse::<Notation>().is_err());
        assert_eq!(Notation::Iupac.other(), Notation::Siegbahn);
    }

    #[test]
    fn test_empty_line_rejected() {
        assert!(XRayLine::new("  ", Notation::Iupac).is_err());
    }
}
