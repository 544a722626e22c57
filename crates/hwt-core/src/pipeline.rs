//! The ingestion pipeline: parse → validate → transform → resolve → persist.
//!
//! Each submission is processed independently and atomically from the
//! caller's view: records are buffered while references resolve and written
//! only when the whole document succeeded, so a rejection never leaves a
//! partial write behind. Every failure is classified once, quarantined as an
//! [`IntegrationError`] with the raw payload, and surfaced to the caller as
//! a [`SubmissionRejection`].

use serde::Serialize;
use thiserror::Error;

use hwt_ingest::{IngestError, parse_document};
use hwt_model::{
    ConsultationSurgeryRecord, DocumentKind, ErrorKind, OutputRecord, PipelineError,
};
use hwt_store::{StoreError, WaitTimeStore};
use hwt_transform::transform;
use hwt_validate::validate;

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub kind: DocumentKind,
    pub records_written: usize,
}

/// Outcome of a rejected submission: one classified cause, quarantined.
#[derive(Debug, Error)]
#[error("{kind} rejection: {message}")]
pub struct SubmissionRejection {
    pub kind: ErrorKind,
    pub message: String,
    /// Id of the quarantined `IntegrationError`, when recording it succeeded.
    pub error_id: Option<u64>,
}

/// Ingestion pipeline bound to a persistence gateway.
///
/// The gateway handle is constructed once at startup and injected here;
/// the pipeline itself is stateless.
pub struct Pipeline<'a> {
    store: &'a dyn WaitTimeStore,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a dyn WaitTimeStore) -> Self {
        Self { store }
    }

    /// Run one raw submission through all stages.
    pub fn submit(
        &self,
        raw: &str,
        kind: DocumentKind,
    ) -> Result<SubmissionReceipt, SubmissionRejection> {
        match self.run_stages(raw, kind) {
            Ok(receipt) => {
                tracing::info!(
                    kind = %kind,
                    records = receipt.records_written,
                    "submission accepted"
                );
                Ok(receipt)
            }
            Err(error) => Err(self.quarantine(raw, error)),
        }
    }

    fn run_stages(
        &self,
        raw: &str,
        kind: DocumentKind,
    ) -> Result<SubmissionReceipt, PipelineError> {
        let root = parse_document(raw).map_err(|error| match error {
            IngestError::Malformed { position, message } => {
                PipelineError::Malformed { position, message }
            }
            other => PipelineError::Malformed {
                position: 0,
                message: other.to_string(),
            },
        })?;

        validate(&root, kind).map_err(PipelineError::Validation)?;

        let records =
            transform(&root, kind).map_err(|error| PipelineError::Transformation(error.0))?;

        // Resolve references first, buffering the resolved records; nothing
        // is written until the whole document resolved.
        let mut emergency = Vec::new();
        let mut consultation_surgery = Vec::new();
        for record in records {
            match record {
                OutputRecord::Emergency(record) => emergency.push(record),
                OutputRecord::ConsultationSurgery(provisional) => {
                    let service_key = self
                        .store
                        .resolve_or_create_service_key(
                            &provisional.specialty,
                            provisional.priority,
                            provisional.service_type,
                            provisional.oncological(),
                        )
                        .map_err(|error| PipelineError::Reference(error.to_string()))?;
                    let hospital_name = self
                        .store
                        .resolve_hospital_name(&provisional.institution_id)
                        .map_err(|error| PipelineError::Reference(error.to_string()))?;
                    consultation_surgery.push(ConsultationSurgeryRecord {
                        hospital_name,
                        service_key,
                        avg_wait_days: provisional.avg_wait_days,
                        period: provisional.period,
                        patient_count: provisional.patient_count,
                    });
                }
            }
        }

        let records_written = emergency.len() + consultation_surgery.len();
        if !emergency.is_empty() {
            self.store
                .insert_emergency_records(emergency)
                .map_err(persistence)?;
        }
        if !consultation_surgery.is_empty() {
            self.store
                .insert_consultation_surgery_records(consultation_surgery)
                .map_err(persistence)?;
        }

        Ok(SubmissionReceipt {
            kind,
            records_written,
        })
    }

    /// Classify a stage failure and quarantine it with the raw payload.
    fn quarantine(&self, raw: &str, error: PipelineError) -> SubmissionRejection {
        let kind = error.kind();
        let message = error.to_string();
        let offending_fields = error.offending_fields();
        tracing::warn!(kind = %kind, message, "submission rejected");

        let error_id = match self.store.record_integration_error(
            kind,
            message.clone(),
            offending_fields,
            raw.to_string(),
        ) {
            Ok(id) => Some(id),
            Err(store_error) => {
                // The rejection still reaches the caller even when the
                // quarantine write itself fails.
                tracing::error!(error = %store_error, "failed to quarantine rejection");
                None
            }
        };

        SubmissionRejection {
            kind,
            message,
            error_id,
        }
    }
}

fn persistence(error: StoreError) -> PipelineError {
    PipelineError::Persistence(error.to_string())
}
