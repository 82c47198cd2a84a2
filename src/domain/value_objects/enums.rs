//! # Domain Enums
//!
//! Enumeration types for exchange listings:
//!
//! - [`TypeObjet`] - product or service
//! - [`EtatObjet`] - physical condition of an offered item
//! - [`ModeEchange`] - how the exchange is carried out
//! - [`ActorRole`] - role of whoever performed a lifecycle transition
//!
//! All enums serialize with their snake_case wire names and implement
//! `Display` and `FromStr` with the same spelling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nature of what is offered or searched.
///
/// # Examples
///
/// ```
/// use echange_core::domain::value_objects::enums::TypeObjet;
///
/// assert_eq!(TypeObjet::Service.to_string(), "service");
/// assert_eq!("produit".parse::<TypeObjet>().unwrap(), TypeObjet::Produit);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TypeObjet {
    /// A physical good.
    #[default]
    Produit,
    /// A service rendered by the holder.
    Service,
}

impl TypeObjet {
    /// All variants, in declaration order.
    pub const ALL: [Self; 2] = [Self::Produit, Self::Service];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Produit => "produit",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for TypeObjet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeObjet {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "produit" => Ok(Self::Produit),
            "service" => Ok(Self::Service),
            _ => Err(ParseEnumError::InvalidValue("TypeObjet", s.to_string())),
        }
    }
}

/// Condition of an offered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtatObjet {
    /// Never used.
    Neuf,
    /// Used but indistinguishable from new.
    CommeNeuf,
    /// Light signs of use.
    TresBon,
    /// Normal wear.
    #[default]
    Bon,
    /// Visible wear, fully functional.
    Correct,
    /// Needs repair.
    ARenover,
}

impl EtatObjet {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neuf => "neuf",
            Self::CommeNeuf => "comme_neuf",
            Self::TresBon => "tres_bon",
            Self::Bon => "bon",
            Self::Correct => "correct",
            Self::ARenover => "a_renover",
        }
    }
}

impl fmt::Display for EtatObjet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EtatObjet {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neuf" => Ok(Self::Neuf),
            "comme_neuf" => Ok(Self::CommeNeuf),
            "tres_bon" => Ok(Self::TresBon),
            "bon" => Ok(Self::Bon),
            "correct" => Ok(Self::Correct),
            "a_renover" => Ok(Self::ARenover),
            _ => Err(ParseEnumError::InvalidValue("EtatObjet", s.to_string())),
        }
    }
}

/// Exchange mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeEchange {
    /// One-shot swap of both items.
    #[default]
    Direct,
    /// Staged hand-over.
    Progressive,
    /// Swap balanced with a monetary top-up.
    AvecComplement,
}

impl ModeEchange {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Progressive => "progressive",
            Self::AvecComplement => "avec_complement",
        }
    }

    /// Returns true if a monetary complement is part of the deal.
    #[inline]
    #[must_use]
    pub const fn allows_complement(&self) -> bool {
        matches!(self, Self::AvecComplement)
    }
}

impl fmt::Display for ModeEchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeEchange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "progressive" => Ok(Self::Progressive),
            "avec_complement" => Ok(Self::AvecComplement),
            _ => Err(ParseEnumError::InvalidValue("ModeEchange", s.to_string())),
        }
    }
}

/// Role an actor held when performing a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// The exchange's creator.
    Createur,
    /// A counterparty acting through a proposition.
    Contrepartie,
    /// A platform moderator.
    Moderateur,
}

impl ActorRole {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Createur => "createur",
            Self::Contrepartie => "contrepartie",
            Self::Moderateur => "moderateur",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The value is not a known variant of the named enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
