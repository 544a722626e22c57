pub mod enums;
pub mod error;
pub mod records;
pub mod reference;

pub use enums::{
    DocumentKind, EMERGENCY_TYPOLOGIES, ListType, Month, Priority, ServiceType,
    TargetPopulation, TriageCategory, UnitState,
};
pub use error::{ErrorKind, IntegrationError, PipelineError, RuleViolation};
pub use records::{
    ConsultationSurgeryRecord, EmergencyType, EmergencyWaitRecord, OutputRecord,
    ProvisionalRecord, ReferencePeriod, TriageBreakdown, TriageEntry,
};
pub use reference::{Hospital, RegionHierarchy, Service, ServiceIdentity};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_error_serializes() {
        let error = IntegrationError {
            id: 1,
            kind: ErrorKind::Validation,
            message: "State: not a canonical value".to_string(),
            offending_fields: vec!["State".to_string()],
            raw_payload: "<EmergencyReport/>".to_string(),
            occurred_at: chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            resolved: false,
            resolution_notes: None,
        };
        let json = serde_json::to_string(&error).expect("serialize error");
        let round: IntegrationError = serde_json::from_str(&json).expect("deserialize error");
        assert_eq!(round, error);
    }
}
