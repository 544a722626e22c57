//! End-to-end pipeline tests against the in-memory store.

use hwt_core::{Pipeline, load_hospitals};
use hwt_ingest::{HospitalCsvRow, read_hospital_rows};
use hwt_model::{DocumentKind, ErrorKind, Hospital};
use hwt_store::{MemoryStore, WaitTimeStore};

const EMERGENCY_XML: &str = "<EmergencyReport>\
  <Header><InstitutionId>101</InstitutionId><Timestamp>2025-03-01T12:30:00</Timestamp></Header>\
  <Typology>Urgência Pediátrica</Typology>\
  <State>Aberta</State>\
  <WaitingList>\
    <Item><TriageColor>Vermelho</TriageColor><PatientCount>2</PatientCount><WaitMinutes>10</WaitMinutes></Item>\
    <Item><TriageColor>Verde</TriageColor><PatientCount>5</PatientCount><WaitMinutes>3</WaitMinutes></Item>\
  </WaitingList>\
</EmergencyReport>";

const CONSULTATION_XML: &str = "<ConsultationReport>\
  <Header><InstitutionId>101</InstitutionId><Period>2025-03</Period></Header>\
  <SpecialtyList>\
    <Specialty>\
      <Name>Cardiologia</Name>\
      <ResponseTime><Expedited>5</Expedited><Normal>30</Normal></ResponseTime>\
      <PatientCount>12</PatientCount>\
    </Specialty>\
  </SpecialtyList>\
</ConsultationReport>";

#[test]
fn emergency_submission_persists_one_record() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store);

    let receipt = pipeline
        .submit(EMERGENCY_XML, DocumentKind::Emergency)
        .unwrap();
    assert_eq!(receipt.records_written, 1);

    let records = store.emergency_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].triage.total_queue_length(), 7);
    assert!(store.integration_errors(false).unwrap().is_empty());
}

#[test]
fn consultation_submission_resolves_services_and_hospital_name() {
    let store = MemoryStore::new();
    store
        .upsert_hospital(Hospital {
            id: "101".to_string(),
            name: "Hospital de Santa Maria".to_string(),
            ..Hospital::default()
        })
        .unwrap();
    let pipeline = Pipeline::new(&store);

    let receipt = pipeline
        .submit(CONSULTATION_XML, DocumentKind::Consultation)
        .unwrap();
    assert_eq!(receipt.records_written, 2);

    let records = store.consultation_surgery_records().unwrap();
    assert_eq!(records.len(), 2);
    assert!(
        records
            .iter()
            .all(|r| r.hospital_name == "Hospital de Santa Maria")
    );
    // One service per (specialty, tier) tuple; same tuple resolves once.
    assert_eq!(store.services().unwrap().len(), 2);

    // Re-submitting reuses the existing keys.
    pipeline
        .submit(CONSULTATION_XML, DocumentKind::Consultation)
        .unwrap();
    assert_eq!(store.services().unwrap().len(), 2);
}

#[test]
fn unknown_hospital_falls_back_to_id() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store);
    pipeline
        .submit(CONSULTATION_XML, DocumentKind::Consultation)
        .unwrap();
    let records = store.consultation_surgery_records().unwrap();
    assert!(records.iter().all(|r| r.hospital_name == "101"));
}

#[test]
fn malformed_input_is_classified_and_quarantined() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store);

    let rejection = pipeline
        .submit("<EmergencyReport><Header>", DocumentKind::Emergency)
        .unwrap_err();
    assert_eq!(rejection.kind, ErrorKind::Malformed);
    assert!(rejection.error_id.is_some());

    let errors = store.integration_errors(true).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Malformed);
    assert_eq!(errors[0].raw_payload, "<EmergencyReport><Header>");
    assert!(store.emergency_records().unwrap().is_empty());
}

#[test]
fn validation_rejection_carries_offending_fields() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store);

    let bad = "<EmergencyReport>\
      <Typology>Urgência Geral</Typology>\
      <State>aberta</State>\
    </EmergencyReport>";
    let rejection = pipeline.submit(bad, DocumentKind::Emergency).unwrap_err();
    assert_eq!(rejection.kind, ErrorKind::Validation);

    let errors = store.integration_errors(true).unwrap();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0]
            .offending_fields
            .contains(&"Header/InstitutionId".to_string())
    );
    assert!(errors[0].offending_fields.contains(&"State".to_string()));
}

#[test]
fn transformation_rejection_never_writes_partially() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store);

    // Valid per rule set only until transformation notices the empty list.
    let empty = "<ConsultationReport>\
      <Header><InstitutionId>101</InstitutionId><Period>2025-03</Period></Header>\
      <SpecialtyList/>\
    </ConsultationReport>";
    let rejection = pipeline
        .submit(empty, DocumentKind::Consultation)
        .unwrap_err();
    assert_eq!(rejection.kind, ErrorKind::Transformation);
    assert!(store.consultation_surgery_records().unwrap().is_empty());
}

#[test]
fn bulk_load_quarantines_defective_rows_field_by_field() {
    let store = MemoryStore::new();
    let csv = "\
HospitalID;HospitalName;Address;District;NUTSIDescription;NUTSIIDescription;NUTSIIIDescription;Latitude;Longitude;PhoneNum;Email
101;Hospital de Santa Maria;Av. Prof. Egas Moniz;Lisboa;Continente;Área Metropolitana de Lisboa;Grande Lisboa;38.748;-9.160;217805000;geral@hsm.pt
;Hospital Sem Código;;Porto;;Norte;;41.182;-8.602;;
205;Hospital de São João;;Porto;;Norte;;north;-8.602;;
";
    let rows: Vec<HospitalCsvRow> = read_hospital_rows(csv.as_bytes()).unwrap();
    let summary = load_hospitals(&store, rows).unwrap();

    assert_eq!(summary.loaded, 1);
    assert_eq!(summary.quarantined, 2);
    assert!(store.hospital("101").unwrap().is_some());
    assert!(store.hospital("205").unwrap().is_none());

    let quarantined = store.quarantined_hospitals().unwrap();
    assert_eq!(quarantined.len(), 2);
    assert_eq!(quarantined[0].offending_fields, vec!["HospitalID"]);
    assert_eq!(quarantined[1].offending_fields, vec!["Latitude"]);
    // The quarantined row keeps the fields that did parse.
    assert_eq!(quarantined[1].hospital.name, "Hospital de São João");
}
