use serde::{Serialize, Serializer};
use std::fmt;

/// Education form after normalization.
///
/// The four known forms get their own counters and marker colors. Anything
/// else is kept verbatim (upper-cased) in `Other` so it never opens a new
/// aggregate bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EducationForm {
    Sd,
    Smp,
    Mi,
    Mts,
    Other(String),
}

/// The fixed vocabulary, in display order
pub const KNOWN_FORMS: [EducationForm; 4] = [
    EducationForm::Sd,
    EducationForm::Smp,
    EducationForm::Mi,
    EducationForm::Mts,
];

/// Case-fold and trim a raw form label, canonicalizing the `MTS` alias.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    if upper == "MTS" {
        "MTs".to_string()
    } else {
        upper
    }
}

impl EducationForm {
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "SD" => EducationForm::Sd,
            "SMP" => EducationForm::Smp,
            "MI" => EducationForm::Mi,
            "MTs" => EducationForm::Mts,
            _ => EducationForm::Other(normalize(raw)),
        }
    }

    /// Parse a user-supplied form name, accepting only the fixed vocabulary
    pub fn parse_known(raw: &str) -> Option<Self> {
        match Self::parse(raw) {
            EducationForm::Other(_) => None,
            form => Some(form),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EducationForm::Sd => "SD",
            EducationForm::Smp => "SMP",
            EducationForm::Mi => "MI",
            EducationForm::Mts => "MTs",
            EducationForm::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EducationForm::Other(_))
    }

    pub fn color(&self) -> MarkerColor {
        match self {
            EducationForm::Sd => MarkerColor::Blue,
            EducationForm::Smp => MarkerColor::Green,
            EducationForm::Mi => MarkerColor::Orange,
            EducationForm::Mts => MarkerColor::Red,
            EducationForm::Other(_) => MarkerColor::Gray,
        }
    }
}

impl Default for EducationForm {
    fn default() -> Self {
        EducationForm::Other(String::new())
    }
}

impl fmt::Display for EducationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for EducationForm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Map marker color per education form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Blue,
    Green,
    Orange,
    Red,
    Gray,
}

impl MarkerColor {
    pub fn css_name(self) -> &'static str {
        match self {
            MarkerColor::Blue => "blue",
            MarkerColor::Green => "green",
            MarkerColor::Orange => "orange",
            MarkerColor::Red => "red",
            MarkerColor::Gray => "gray",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mts_alias() {
        assert_eq!(normalize("mts"), "MTs");
        assert_eq!(normalize(" MTS "), "MTs");
        assert_eq!(normalize("MTS"), "MTs");
        assert_eq!(EducationForm::parse("mts"), EducationForm::Mts);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["sd", " Smp", "MTs", "mts", "sma ", "", "SLB"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_unknown_form_is_other() {
        assert_eq!(
            EducationForm::parse(" sma "),
            EducationForm::Other("SMA".to_string())
        );
        assert_eq!(EducationForm::parse_known("SMA"), None);
        assert_eq!(EducationForm::parse_known("smp"), Some(EducationForm::Smp));
    }

    #[test]
    fn test_colors() {
        assert_eq!(EducationForm::Sd.color().css_name(), "blue");
        assert_eq!(EducationForm::Smp.color().css_name(), "green");
        assert_eq!(EducationForm::Mi.color().css_name(), "orange");
        assert_eq!(EducationForm::Mts.color().css_name(), "red");
        assert_eq!(EducationForm::parse("SLB").color().css_name(), "gray");
    }
}
