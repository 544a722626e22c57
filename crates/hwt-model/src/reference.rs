//! Reference entities: hospitals and services.
//!
//! Both are shared read-mostly data owned by the reference resolver. Hospitals
//! are upserted by id and never deleted; services are allocated lazily, one
//! integer key per distinct (specialty, priority, type) tuple.

use serde::{Deserialize, Serialize};

use crate::enums::{Priority, ServiceType};

/// Three-level region hierarchy (NUTS I/II/III descriptions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionHierarchy {
    pub nuts1: Option<String>,
    pub nuts2: Option<String>,
    pub nuts3: Option<String>,
}

/// Hospital reference entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub district: Option<String>,
    pub regions: RegionHierarchy,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Hospital {
    /// Region used for grouping in regional reports (NUTS II, falling back
    /// to the district when the hierarchy is incomplete).
    pub fn region(&self) -> Option<&str> {
        self.regions
            .nuts2
            .as_deref()
            .or(self.district.as_deref())
    }
}

/// Service reference entity.
///
/// The (specialty, priority code, type code) tuple maps to exactly one key;
/// keys are monotonically increasing integers allocated on first sight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub key: u32,
    pub specialty: String,
    pub priority: Priority,
    pub service_type: ServiceType,
    /// Oncological classification, computed once at ingestion from the
    /// list-type tag (or specialty description for consultations).
    pub oncological: bool,
}

/// The lookup identity of a service: what the resolver matches on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServiceIdentity {
    pub specialty: String,
    pub priority_code: String,
    pub type_code: String,
}

impl Service {
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity {
            specialty: self.specialty.clone(),
            priority_code: self.priority.code().to_string(),
            type_code: self.service_type.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_falls_back_to_district() {
        let hospital = Hospital {
            id: "101".to_string(),
            name: "Hospital de Santa Maria".to_string(),
            district: Some("Lisboa".to_string()),
            ..Hospital::default()
        };
        assert_eq!(hospital.region(), Some("Lisboa"));

        let with_nuts = Hospital {
            regions: RegionHierarchy {
                nuts2: Some("Área Metropolitana de Lisboa".to_string()),
                ..RegionHierarchy::default()
            },
            ..hospital
        };
        assert_eq!(with_nuts.region(), Some("Área Metropolitana de Lisboa"));
    }

    #[test]
    fn service_identity_uses_codes() {
        let service = Service {
            key: 7,
            specialty: "Cardiologia".to_string(),
            priority: Priority::Normal,
            service_type: ServiceType::Consultation,
            oncological: false,
        };
        let identity = service.identity();
        assert_eq!(identity.priority_code, "N");
        assert_eq!(identity.type_code, "C");
    }
}
