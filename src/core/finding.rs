//! Classification labels and retained findings

use std::fmt;
use std::str::FromStr;

/// Classification label for an analysis unit.
///
/// Line scanning draws from the credential categories; function scanning
/// uses the Vulnerable/NotVulnerable pair. Benign outcomes exist as labels
/// (classifiers must return something for every input) but are never
/// persisted as findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Password,
    GenericSecret,
    PrivateKey,
    GenericToken,
    PredefinedPattern,
    AuthKeyToken,
    SeedSaltNonce,
    Other,
    Benign,
    Vulnerable,
    NotVulnerable,
}

impl Label {
    /// Benign outcomes are suppressed from results and never cached
    pub fn is_benign(&self) -> bool {
        matches!(self, Label::Benign | Label::NotVulnerable)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Label::Password => "Password",
            Label::GenericSecret => "Generic Secret",
            Label::PrivateKey => "Private Key",
            Label::GenericToken => "Generic Token",
            Label::PredefinedPattern => "Predefined Pattern",
            Label::AuthKeyToken => "Auth Key Token",
            Label::SeedSaltNonce => "Seed Salt Nonce",
            Label::Other => "Other",
            Label::Benign => "Benign",
            Label::Vulnerable => "Vulnerable",
            Label::NotVulnerable => "Not Vulnerable",
        };
        f.write_str(s)
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Password" => Ok(Label::Password),
            "Generic Secret" => Ok(Label::GenericSecret),
            "Private Key" => Ok(Label::PrivateKey),
            "Generic Token" => Ok(Label::GenericToken),
            "Predefined Pattern" => Ok(Label::PredefinedPattern),
            "Auth Key Token" => Ok(Label::AuthKeyToken),
            "Seed Salt Nonce" => Ok(Label::SeedSaltNonce),
            "Other" => Ok(Label::Other),
            "Benign" => Ok(Label::Benign),
            "Vulnerable" => Ok(Label::Vulnerable),
            "Not Vulnerable" => Ok(Label::NotVulnerable),
            _ => Err(format!("unknown label '{}'", s)),
        }
    }
}

/// A non-benign classification result retained for a unit.
///
/// The normalized content is kept alongside the label so results can be
/// displayed on later runs without re-reading the unit from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub label: Label,
    pub content: String,
}

impl Finding {
    pub fn new(label: Label, content: String) -> Self {
        Self { label, content }
    }
}
