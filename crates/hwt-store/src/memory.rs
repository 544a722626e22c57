//! In-memory implementation of the persistence gateway.
//!
//! Collections live behind per-collection `RwLock`s; read-only report
//! queries take read guards and run fully in parallel with each other.
//! Service-key allocation holds a single write guard across lookup and
//! insert, which is the insert-if-absent primitive the trait demands.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use hwt_model::{
    ConsultationSurgeryRecord, EmergencyWaitRecord, ErrorKind, Hospital, IntegrationError,
    Priority, Service, ServiceIdentity, ServiceType,
};

use crate::quarantine::QuarantinedHospital;
use crate::{StoreError, WaitTimeStore};

#[derive(Debug, Default)]
struct ServiceTable {
    by_identity: BTreeMap<ServiceIdentity, u32>,
    by_key: BTreeMap<u32, Service>,
}

/// In-memory store; cheap to construct, safe to share across threads.
#[derive(Debug)]
pub struct MemoryStore {
    hospitals: RwLock<BTreeMap<String, Hospital>>,
    services: RwLock<ServiceTable>,
    emergency: RwLock<Vec<EmergencyWaitRecord>>,
    consultation_surgery: RwLock<Vec<ConsultationSurgeryRecord>>,
    errors: RwLock<Vec<IntegrationError>>,
    next_error_id: AtomicU64,
    hospital_quarantine: RwLock<Vec<QuarantinedHospital>>,
}

/// Serializable snapshot of every collection, used by the CLI to persist
/// state between invocations.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub hospitals: Vec<Hospital>,
    pub services: Vec<Service>,
    pub emergency_records: Vec<EmergencyWaitRecord>,
    pub consultation_surgery_records: Vec<ConsultationSurgeryRecord>,
    pub integration_errors: Vec<IntegrationError>,
    pub quarantined_hospitals: Vec<QuarantinedHospital>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("collection lock poisoned".to_string())
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            hospitals: RwLock::default(),
            services: RwLock::default(),
            emergency: RwLock::default(),
            consultation_surgery: RwLock::default(),
            errors: RwLock::default(),
            next_error_id: AtomicU64::new(1),
            hospital_quarantine: RwLock::default(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = MemoryStore::new();
        {
            let mut hospitals = store.hospitals.write().expect("fresh lock");
            for hospital in snapshot.hospitals {
                hospitals.insert(hospital.id.clone(), hospital);
            }
            let mut services = store.services.write().expect("fresh lock");
            for service in snapshot.services {
                services.by_identity.insert(service.identity(), service.key);
                services.by_key.insert(service.key, service);
            }
            *store.emergency.write().expect("fresh lock") = snapshot.emergency_records;
            *store.consultation_surgery.write().expect("fresh lock") =
                snapshot.consultation_surgery_records;
            let next_id = snapshot
                .integration_errors
                .iter()
                .map(|e| e.id + 1)
                .max()
                .unwrap_or(1);
            store.next_error_id.store(next_id, Ordering::Relaxed);
            *store.errors.write().expect("fresh lock") = snapshot.integration_errors;
            *store.hospital_quarantine.write().expect("fresh lock") =
                snapshot.quarantined_hospitals;
        }
        store
    }

    /// Capture the current contents of every collection.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        Ok(StoreSnapshot {
            hospitals: self
                .hospitals
                .read()
                .map_err(poisoned)?
                .values()
                .cloned()
                .collect(),
            services: self.services()?,
            emergency_records: self.emergency_records()?,
            consultation_surgery_records: self.consultation_surgery_records()?,
            integration_errors: self.errors.read().map_err(poisoned)?.clone(),
            quarantined_hospitals: self.quarantined_hospitals()?,
        })
    }
}

impl WaitTimeStore for MemoryStore {
    fn upsert_hospital(&self, hospital: Hospital) -> Result<(), StoreError> {
        let mut hospitals = self.hospitals.write().map_err(poisoned)?;
        hospitals.insert(hospital.id.clone(), hospital);
        Ok(())
    }

    fn hospital(&self, id: &str) -> Result<Option<Hospital>, StoreError> {
        Ok(self.hospitals.read().map_err(poisoned)?.get(id).cloned())
    }

    fn resolve_or_create_service_key(
        &self,
        specialty: &str,
        priority: Priority,
        service_type: ServiceType,
        oncological: bool,
    ) -> Result<u32, StoreError> {
        let identity = ServiceIdentity {
            specialty: specialty.to_string(),
            priority_code: priority.code().to_string(),
            type_code: service_type.code().to_string(),
        };

        // Lookup and allocation happen under one write guard: the
        // insert-if-absent primitive that makes allocation race-free.
        let mut services = self.services.write().map_err(poisoned)?;
        if let Some(&key) = services.by_identity.get(&identity) {
            return Ok(key);
        }

        let key = services.by_key.keys().max().copied().unwrap_or(0) + 1;
        let service = Service {
            key,
            specialty: specialty.to_string(),
            priority,
            service_type,
            oncological,
        };
        services.by_identity.insert(identity, key);
        services.by_key.insert(key, service);
        tracing::debug!(key, specialty, "allocated service key");
        Ok(key)
    }

    fn service(&self, key: u32) -> Result<Option<Service>, StoreError> {
        Ok(self
            .services
            .read()
            .map_err(poisoned)?
            .by_key
            .get(&key)
            .cloned())
    }

    fn services(&self) -> Result<Vec<Service>, StoreError> {
        Ok(self
            .services
            .read()
            .map_err(poisoned)?
            .by_key
            .values()
            .cloned()
            .collect())
    }

    fn insert_emergency_records(
        &self,
        records: Vec<EmergencyWaitRecord>,
    ) -> Result<(), StoreError> {
        self.emergency.write().map_err(poisoned)?.extend(records);
        Ok(())
    }

    fn insert_consultation_surgery_records(
        &self,
        records: Vec<ConsultationSurgeryRecord>,
    ) -> Result<(), StoreError> {
        self.consultation_surgery
            .write()
            .map_err(poisoned)?
            .extend(records);
        Ok(())
    }

    fn emergency_records(&self) -> Result<Vec<EmergencyWaitRecord>, StoreError> {
        Ok(self.emergency.read().map_err(poisoned)?.clone())
    }

    fn consultation_surgery_records(
        &self,
    ) -> Result<Vec<ConsultationSurgeryRecord>, StoreError> {
        Ok(self.consultation_surgery.read().map_err(poisoned)?.clone())
    }

    fn record_integration_error(
        &self,
        kind: ErrorKind,
        message: String,
        offending_fields: Vec<String>,
        raw_payload: String,
    ) -> Result<u64, StoreError> {
        let id = self.next_error_id.fetch_add(1, Ordering::Relaxed);
        let error = IntegrationError {
            id,
            kind,
            message,
            offending_fields,
            raw_payload,
            occurred_at: Utc::now().naive_utc(),
            resolved: false,
            resolution_notes: None,
        };
        self.errors.write().map_err(poisoned)?.push(error);
        Ok(id)
    }

    fn integration_errors(
        &self,
        only_unresolved: bool,
    ) -> Result<Vec<IntegrationError>, StoreError> {
        let errors = self.errors.read().map_err(poisoned)?;
        Ok(errors
            .iter()
            .filter(|e| !only_unresolved || !e.resolved)
            .cloned()
            .collect())
    }

    fn resolve_integration_error(&self, id: u64, notes: &str) -> Result<(), StoreError> {
        let mut errors = self.errors.write().map_err(poisoned)?;
        let error = errors
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::ErrorNotFound(id))?;
        error.resolved = true;
        error.resolution_notes = Some(notes.to_string());
        Ok(())
    }

    fn quarantine_hospital(&self, row: QuarantinedHospital) -> Result<(), StoreError> {
        self.hospital_quarantine.write().map_err(poisoned)?.push(row);
        Ok(())
    }

    fn quarantined_hospitals(&self) -> Result<Vec<QuarantinedHospital>, StoreError> {
        Ok(self.hospital_quarantine.read().map_err(poisoned)?.clone())
    }
}
