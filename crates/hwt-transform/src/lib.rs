//! Transformation of validated document trees into canonical records.
//!
//! One input document yields one or more output records: an emergency report
//! maps to exactly one [`EmergencyWaitRecord`]; consultation and surgery
//! reports fan out to one provisional record per (specialty, priority tier)
//! or per specialty entry respectively. A validated document that still
//! yields zero records is a transformation failure, never a silent success.
//!
//! The transformer assumes validation already ran: required fields are
//! present and enumerated values are canonical. Anything violating that
//! assumption surfaces as a [`TransformError`] rather than a panic.

use chrono::NaiveDateTime;
use thiserror::Error;

use hwt_ingest::Element;
use hwt_model::{
    DocumentKind, EmergencyType, EmergencyWaitRecord, ListType, OutputRecord, Priority,
    ProvisionalRecord, ReferencePeriod, ServiceType, TargetPopulation, TriageBreakdown,
    TriageCategory, UnitState,
};

/// Structurally valid input that cannot be mapped to records.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransformError(pub String);

/// Transform a validated element tree into canonical records.
///
/// Never returns an empty vec: structurally empty input fails instead.
pub fn transform(root: &Element, kind: DocumentKind) -> Result<Vec<OutputRecord>, TransformError> {
    let records = match kind {
        DocumentKind::Emergency => vec![OutputRecord::Emergency(transform_emergency(root)?)],
        DocumentKind::Consultation => transform_consultation(root)?
            .into_iter()
            .map(OutputRecord::ConsultationSurgery)
            .collect(),
        DocumentKind::Surgery => transform_surgery(root)?
            .into_iter()
            .map(OutputRecord::ConsultationSurgery)
            .collect(),
    };
    if records.is_empty() {
        return Err(TransformError(format!(
            "{kind} document produced no records"
        )));
    }
    tracing::debug!(kind = %kind, records = records.len(), "transformed document");
    Ok(records)
}

fn transform_emergency(root: &Element) -> Result<EmergencyWaitRecord, TransformError> {
    let institution_id = required_text(root, &["Header", "InstitutionId"])?;
    let raw_timestamp = required_text(root, &["Header", "Timestamp"])?;
    let recorded_at = NaiveDateTime::parse_from_str(raw_timestamp, "%Y-%m-%dT%H:%M:%S")
        .map_err(|error| TransformError(format!("unparsable timestamp: {error}")))?;

    let description = required_text(root, &["Typology"])?;
    let code = root.child_text("TypologyCode").map(str::to_string);

    let state = root
        .child_text("State")
        .and_then(UnitState::from_display_name)
        .ok_or_else(|| TransformError("missing or non-canonical unit state".to_string()))?;

    let mut triage = TriageBreakdown::default();
    if let Some(waiting) = root.child("WaitingList") {
        for item in waiting.children_named("Item") {
            let category = triage_category(item)?;
            let entry = triage.entry_mut(category);
            // Later entries for the same color overwrite earlier ones.
            entry.queue_length = count_or_zero(item, "PatientCount")?;
            entry.wait_minutes = count_or_zero(item, "WaitMinutes")?;
        }
    }

    let mut observation = TriageBreakdown::default();
    if let Some(list) = root.child("ObservationList") {
        for item in list.children_named("Item") {
            let category = triage_category(item)?;
            observation.entry_mut(category).queue_length = count_or_zero(item, "PatientCount")?;
        }
    }

    Ok(EmergencyWaitRecord {
        institution_id: institution_id.to_string(),
        recorded_at,
        emergency_type: EmergencyType {
            code,
            description: description.to_string(),
        },
        state,
        triage,
        observation,
    })
}

fn transform_consultation(root: &Element) -> Result<Vec<ProvisionalRecord>, TransformError> {
    let institution_id = required_text(root, &["Header", "InstitutionId"])?.to_string();
    let period = parse_period(root)?;

    let mut records = Vec::new();
    let Some(list) = root.child("SpecialtyList") else {
        return Ok(records);
    };
    for specialty in list.children_named("Specialty") {
        let name = required_text(specialty, &["Name"])?.to_string();
        let target_population = specialty
            .child_text("TargetPopulation")
            .and_then(TargetPopulation::from_display_name);
        let list_type = specialty
            .child_text("ListType")
            .and_then(ListType::from_display_name)
            .unwrap_or(ListType::General);
        let patient_count = count_or_zero(specialty, "PatientCount")?;

        let response = specialty.child("ResponseTime");
        for (tier, tag) in [
            (Priority::Expedited, "Expedited"),
            (Priority::Priority, "Priority"),
            (Priority::Normal, "Normal"),
        ] {
            // One record per tier the report actually carries.
            let Some(raw) = response.and_then(|r| r.child_text(tag)) else {
                continue;
            };
            let avg_wait_days = parse_wait_days(raw)?;
            records.push(ProvisionalRecord {
                institution_id: institution_id.clone(),
                specialty: name.clone(),
                priority: tier,
                service_type: ServiceType::Consultation,
                list_type,
                target_population,
                avg_wait_days,
                period,
                patient_count,
            });
        }
    }
    Ok(records)
}

fn transform_surgery(root: &Element) -> Result<Vec<ProvisionalRecord>, TransformError> {
    let institution_id = required_text(root, &["Header", "InstitutionId"])?.to_string();
    let period = parse_period(root)?;

    let mut records = Vec::new();
    let Some(list) = root.child("SpecialtyList") else {
        return Ok(records);
    };
    for specialty in list.children_named("Specialty") {
        let name = required_text(specialty, &["Name"])?.to_string();
        // General vs oncological is the explicit tag, never inferred.
        let list_type = specialty
            .child_text("ListType")
            .and_then(ListType::from_display_name)
            .ok_or_else(|| {
                TransformError("surgery specialty entry without a list-type tag".to_string())
            })?;
        let avg_wait_days = match specialty.child_text("WaitDays") {
            Some(raw) => parse_wait_days(raw)?,
            None => 0.0,
        };
        records.push(ProvisionalRecord {
            institution_id: institution_id.clone(),
            specialty: name,
            priority: Priority::Normal,
            service_type: ServiceType::Surgery,
            list_type,
            target_population: None,
            avg_wait_days,
            period,
            patient_count: count_or_zero(specialty, "PatientCount")?,
        });
    }
    Ok(records)
}

fn required_text<'a>(root: &'a Element, path: &[&str]) -> Result<&'a str, TransformError> {
    root.path(path)
        .and_then(Element::text)
        .ok_or_else(|| TransformError(format!("missing required field {}", path.join("/"))))
}

fn parse_period(root: &Element) -> Result<ReferencePeriod, TransformError> {
    let raw = required_text(root, &["Header", "Period"])?;
    ReferencePeriod::parse(raw)
        .ok_or_else(|| TransformError(format!("'{raw}' is not a valid YYYY-MM period")))
}

fn triage_category(item: &Element) -> Result<TriageCategory, TransformError> {
    let name = required_text(item, &["TriageColor"])?;
    TriageCategory::from_display_name(name)
        .ok_or_else(|| TransformError(format!("unknown triage color '{name}'")))
}

/// Missing optional numeric → 0; present but unparsable is a failure.
fn count_or_zero(element: &Element, name: &str) -> Result<u32, TransformError> {
    match element.child_text(name) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| TransformError(format!("'{raw}' is not a non-negative integer"))),
        None => Ok(0),
    }
}

fn parse_wait_days(raw: &str) -> Result<f64, TransformError> {
    match raw.parse::<f64>() {
        Ok(value) if value >= 0.0 => Ok(value),
        _ => Err(TransformError(format!(
            "'{raw}' is not a non-negative number of days"
        ))),
    }
}
