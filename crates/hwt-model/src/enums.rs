//! Type-safe enumerations for wait-time submissions.
//!
//! These enums give compile-time safety to concepts that arrive as strings
//! in the reported XML. Display values are the canonical Portuguese-language
//! vocabulary used by the reporting institutions; membership checks against
//! them are case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three supported submission document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Emergency,
    Consultation,
    Surgery,
}

impl DocumentKind {
    /// Root element expected for this kind.
    pub fn root_element(&self) -> &'static str {
        match self {
            DocumentKind::Emergency => "EmergencyReport",
            DocumentKind::Consultation => "ConsultationReport",
            DocumentKind::Surgery => "SurgeryReport",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Emergency => "emergency",
            DocumentKind::Consultation => "consultation",
            DocumentKind::Surgery => "surgery",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emergency" => Ok(DocumentKind::Emergency),
            "consultation" => Ok(DocumentKind::Consultation),
            "surgery" => Ok(DocumentKind::Surgery),
            _ => Err(format!("unknown document kind: {s}")),
        }
    }
}

/// Manchester triage category.
///
/// The five categories are a closed set: every `EmergencyWaitRecord` carries
/// an entry for each of them, defaulting to zero rather than omitting keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TriageCategory {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
}

impl TriageCategory {
    /// All five categories in severity order.
    pub const ALL: [TriageCategory; 5] = [
        TriageCategory::Red,
        TriageCategory::Orange,
        TriageCategory::Yellow,
        TriageCategory::Green,
        TriageCategory::Blue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriageCategory::Red => "Red",
            TriageCategory::Orange => "Orange",
            TriageCategory::Yellow => "Yellow",
            TriageCategory::Green => "Green",
            TriageCategory::Blue => "Blue",
        }
    }

    /// Canonical Portuguese display name as reported in submissions.
    pub fn display_name(&self) -> &'static str {
        match self {
            TriageCategory::Red => "Vermelho",
            TriageCategory::Orange => "Laranja",
            TriageCategory::Yellow => "Amarelo",
            TriageCategory::Green => "Verde",
            TriageCategory::Blue => "Azul",
        }
    }

    /// Reverse lookup from the Portuguese display name (case-sensitive).
    pub fn from_display_name(name: &str) -> Option<TriageCategory> {
        TriageCategory::ALL
            .into_iter()
            .find(|category| category.display_name() == name)
    }
}

impl fmt::Display for TriageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operating state of an emergency unit at report time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitState {
    Open,
    Closed,
}

impl UnitState {
    /// Canonical reported value (feminine agreement with "urgência").
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitState::Open => "Aberta",
            UnitState::Closed => "Fechada",
        }
    }

    pub fn from_display_name(name: &str) -> Option<UnitState> {
        match name {
            "Aberta" => Some(UnitState::Open),
            "Fechada" => Some(UnitState::Closed),
            _ => None,
        }
    }
}

/// Target population tag on consultation specialty entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPopulation {
    Adult,
    Pediatric,
    All,
}

impl TargetPopulation {
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetPopulation::Adult => "Adulto",
            TargetPopulation::Pediatric => "Pediátrico",
            TargetPopulation::All => "Todos",
        }
    }

    pub fn from_display_name(name: &str) -> Option<TargetPopulation> {
        match name {
            "Adulto" => Some(TargetPopulation::Adult),
            "Pediátrico" => Some(TargetPopulation::Pediatric),
            "Todos" => Some(TargetPopulation::All),
            _ => None,
        }
    }
}

/// List-type tag distinguishing general from oncological waiting lists.
///
/// Surgery reports carry this explicitly per specialty entry; the oncological
/// classification of a record comes from this tag, never from matching the
/// specialty text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListType {
    General,
    Oncological,
}

impl ListType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ListType::General => "Geral",
            ListType::Oncological => "Oncológica",
        }
    }

    pub fn from_display_name(name: &str) -> Option<ListType> {
        match name {
            "Geral" => Some(ListType::General),
            "Oncológica" => Some(ListType::Oncological),
            _ => None,
        }
    }

    pub fn is_oncological(&self) -> bool {
        matches!(self, ListType::Oncological)
    }
}

/// Canonical emergency typology vocabulary.
///
/// Reported typologies must match one of these values exactly.
pub const EMERGENCY_TYPOLOGIES: [&str; 5] = [
    "Urgência Geral",
    "Urgência Pediátrica",
    "Urgência Obstétrica",
    "Urgência Psiquiátrica",
    "Urgência Polivalente",
];

/// Response-time priority tier for consultations and surgeries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    Expedited,
    Priority,
    Normal,
}

impl Priority {
    /// Short code persisted on the service reference row.
    pub fn code(&self) -> &'static str {
        match self {
            Priority::Expedited => "MP",
            Priority::Priority => "P",
            Priority::Normal => "N",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Priority::Expedited => "Muito Prioritário",
            Priority::Priority => "Prioritário",
            Priority::Normal => "Normal",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Service type distinguishing the three report families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Emergency,
    Consultation,
    Surgery,
}

impl ServiceType {
    /// Short code persisted on the service reference row.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceType::Emergency => "U",
            ServiceType::Consultation => "C",
            ServiceType::Surgery => "S",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ServiceType::Emergency => "Urgência",
            ServiceType::Consultation => "Consulta",
            ServiceType::Surgery => "Cirurgia",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Calendar month, 1-indexed as reported in `YYYY-MM` periods.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Look up a month by its 1-indexed number. Fails for 0 or anything
    /// above 12.
    pub fn from_number(number: u32) -> Option<Month> {
        match number {
            1..=12 => Some(Month::ALL[(number - 1) as usize]),
            _ => None,
        }
    }

    pub fn number(&self) -> u32 {
        Month::ALL.iter().position(|m| m == self).unwrap_or(0) as u32 + 1
    }

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
