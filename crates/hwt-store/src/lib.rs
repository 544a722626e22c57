//! Persistence gateway for wait-time records and reference data.
//!
//! [`WaitTimeStore`] is the seam between the pipeline and durable storage:
//! every collection gets a typed accessor, so nothing resolves models by
//! name at runtime. The store handle is constructed once at startup and
//! passed explicitly to every component that needs it.
//!
//! [`MemoryStore`] is the in-process implementation used by the CLI and the
//! test suites. A database-backed implementation must honor the same
//! contracts, in particular the atomicity of service-key allocation (unique
//! index + upsert, or compare-and-swap with bounded retries).

pub mod memory;
pub mod quarantine;

use thiserror::Error;

use hwt_model::{
    ConsultationSurgeryRecord, EmergencyWaitRecord, ErrorKind, Hospital, IntegrationError,
    Priority, Service, ServiceType,
};

pub use memory::{MemoryStore, StoreSnapshot};
pub use quarantine::QuarantinedHospital;

/// Storage failures surfaced by gateway implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("integration error {0} not found")]
    ErrorNotFound(u64),
}

/// Typed access to the persisted collections.
pub trait WaitTimeStore: Send + Sync {
    // Hospital reference data. Upsert keyed on id; never deleted.
    fn upsert_hospital(&self, hospital: Hospital) -> Result<(), StoreError>;
    fn hospital(&self, id: &str) -> Result<Option<Hospital>, StoreError>;

    /// Best-effort denormalization: the stored name when the hospital is
    /// known, otherwise the id itself. Never blocks the write path.
    fn resolve_hospital_name(&self, id: &str) -> Result<String, StoreError> {
        Ok(self
            .hospital(id)?
            .map_or_else(|| id.to_string(), |hospital| hospital.name))
    }

    /// Return the key for the (specialty, priority, type) tuple, allocating
    /// the next integer key on first sight.
    ///
    /// Must be atomic: N concurrent calls for the same new tuple allocate
    /// exactly one key.
    fn resolve_or_create_service_key(
        &self,
        specialty: &str,
        priority: Priority,
        service_type: ServiceType,
        oncological: bool,
    ) -> Result<u32, StoreError>;
    fn service(&self, key: u32) -> Result<Option<Service>, StoreError>;
    fn services(&self) -> Result<Vec<Service>, StoreError>;

    // Fact records. Inserted by the pipeline, immutable afterwards.
    fn insert_emergency_records(
        &self,
        records: Vec<EmergencyWaitRecord>,
    ) -> Result<(), StoreError>;
    fn insert_consultation_surgery_records(
        &self,
        records: Vec<ConsultationSurgeryRecord>,
    ) -> Result<(), StoreError>;
    fn emergency_records(&self) -> Result<Vec<EmergencyWaitRecord>, StoreError>;
    fn consultation_surgery_records(&self)
    -> Result<Vec<ConsultationSurgeryRecord>, StoreError>;

    // Quarantine.
    fn record_integration_error(
        &self,
        kind: ErrorKind,
        message: String,
        offending_fields: Vec<String>,
        raw_payload: String,
    ) -> Result<u64, StoreError>;
    fn integration_errors(&self, only_unresolved: bool)
    -> Result<Vec<IntegrationError>, StoreError>;
    fn resolve_integration_error(&self, id: u64, notes: &str) -> Result<(), StoreError>;

    fn quarantine_hospital(&self, row: QuarantinedHospital) -> Result<(), StoreError>;
    fn quarantined_hospitals(&self) -> Result<Vec<QuarantinedHospital>, StoreError>;
}
