//! Command implementations.

use std::fs;
use std::slice;

use anyhow::{Context, Result};
use comfy_table::Cell;
use serde::Serialize;

use hwt_core::{Pipeline, load_hospitals};
use hwt_ingest::read_hospital_file;
use hwt_report::{
    DateRange, DiscrepancyParams, EvolutionParams, MeanWaitingParams, OncologyDifferenceParams,
    PediatricRegionParams, SurgeryWaitParams, TopHospitalsParams, TriageDistributionParams,
    consultation_surgery_discrepancy, mean_waiting_by_typology, oncology_response_difference,
    pediatric_mean_wait_by_region, scheduled_surgery_wait, time_of_day_evolution,
    top_hospitals_pediatric, triage_percentage_distribution,
};
use hwt_store::WaitTimeStore;

use crate::cli::{
    ErrorsListArgs, ErrorsResolveArgs, LoadHospitalsArgs, OutputArg, RangeArgs, ReportCommand,
    SubmitArgs,
};
use crate::tables::{optional_cell, right_cell, styled_table};

impl RangeArgs {
    fn to_range(&self) -> DateRange {
        DateRange::new(self.from, self.to)
    }
}

/// Submit one XML file. Returns the process exit code; a rejection is a
/// reported outcome, not a hard failure, and still mutates the quarantine.
pub fn run_submit(store: &dyn WaitTimeStore, args: &SubmitArgs) -> Result<i32> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("read submission {}", args.file.display()))?;
    let pipeline = Pipeline::new(store);
    match pipeline.submit(&raw, args.kind.into()) {
        Ok(receipt) => {
            println!(
                "accepted: {} record(s) written from {} submission",
                receipt.records_written, receipt.kind
            );
            Ok(0)
        }
        Err(rejection) => {
            match rejection.error_id {
                Some(id) => println!(
                    "rejected ({}): {} [integration error #{id}]",
                    rejection.kind, rejection.message
                ),
                None => println!("rejected ({}): {}", rejection.kind, rejection.message),
            }
            Ok(1)
        }
    }
}

pub fn run_load_hospitals(store: &dyn WaitTimeStore, args: &LoadHospitalsArgs) -> Result<i32> {
    let rows = read_hospital_file(&args.file)
        .with_context(|| format!("read hospital csv {}", args.file.display()))?;
    let summary = load_hospitals(store, rows).context("load hospitals")?;
    println!(
        "loaded {} hospital(s), quarantined {}",
        summary.loaded, summary.quarantined
    );
    Ok(0)
}

pub fn run_report(
    store: &dyn WaitTimeStore,
    command: &ReportCommand,
    output: OutputArg,
) -> Result<i32> {
    match command {
        ReportCommand::MeanWaiting(args) => {
            let rows = mean_waiting_by_typology(
                store,
                &MeanWaitingParams {
                    range: args.range.to_range(),
                    typology: args.typology.clone(),
                },
            )?;
            emit(output, &rows, &["Typology", "Category", "Mean waiting"], |row| {
                vec![
                    right_cell(&row.typology),
                    right_cell(row.category.display_name()),
                    right_cell(row.mean_queue_length),
                ]
            })?;
        }
        ReportCommand::TriageDistribution(args) => {
            let rows = triage_percentage_distribution(
                store,
                &TriageDistributionParams {
                    range: args.range.to_range(),
                    granularity: args.granularity.into(),
                    hospital_id: args.hospital.clone(),
                },
            )?;
            emit(
                output,
                &rows,
                &["Bucket", "Day period", "Category", "Patients", "%"],
                |row| {
                    vec![
                        right_cell(&row.bucket),
                        right_cell(row.day_period),
                        right_cell(row.category.display_name()),
                        right_cell(row.patient_count),
                        right_cell(row.percentage),
                    ]
                },
            )?;
        }
        ReportCommand::PediatricRegions(args) => {
            let rows = pediatric_mean_wait_by_region(
                store,
                &PediatricRegionParams {
                    range: args.to_range(),
                },
            )?;
            emit(output, &rows, &["Region", "Mean wait (min)", "Hospitals"], |row| {
                vec![
                    right_cell(row.region.as_deref().unwrap_or("-")),
                    right_cell(row.mean_wait_minutes),
                    right_cell(row.hospital_count),
                ]
            })?;
        }
        ReportCommand::OncologyDifference(args) => {
            let row = oncology_response_difference(
                store,
                &OncologyDifferenceParams {
                    range: args.range.to_range(),
                    specialty: args.specialty.clone(),
                },
            )?;
            emit(
                output,
                slice::from_ref(&row),
                &["Oncology mean", "Non-oncology mean", "Difference"],
                |row| {
                    vec![
                        optional_cell(row.oncology_mean),
                        optional_cell(row.non_oncology_mean),
                        optional_cell(row.difference),
                    ]
                },
            )?;
        }
        ReportCommand::SurgeryWait(args) => {
            let rows = scheduled_surgery_wait(
                store,
                &SurgeryWaitParams {
                    range: args.range.to_range(),
                    specialty: args.specialty.clone(),
                },
            )?;
            emit(
                output,
                &rows,
                &["List type", "Mean wait (days)", "Patients", "Records"],
                |row| {
                    vec![
                        right_cell(row.list_type.display_name()),
                        right_cell(row.mean_wait_days),
                        right_cell(row.total_patients),
                        right_cell(row.record_count),
                    ]
                },
            )?;
        }
        ReportCommand::Discrepancy(args) => {
            let rows = consultation_surgery_discrepancy(
                store,
                &DiscrepancyParams {
                    range: args.range.to_range(),
                    granularity: args.granularity.into(),
                },
            )?;
            emit(
                output,
                &rows,
                &["Bucket", "Consultation mean", "Surgery mean", "Discrepancy"],
                |row| {
                    vec![
                        right_cell(&row.bucket),
                        right_cell(row.consultation_mean),
                        right_cell(row.surgery_mean),
                        right_cell(row.discrepancy),
                    ]
                },
            )?;
        }
        ReportCommand::TopHospitals(args) => {
            let rows = top_hospitals_pediatric(
                store,
                &TopHospitalsParams {
                    range: args.range.to_range(),
                    limit: args.limit,
                },
            )?;
            emit(
                output,
                &rows,
                &["Hospital", "Name", "Region", "Mean wait (min)", "Records"],
                |row| {
                    vec![
                        right_cell(&row.hospital_id),
                        right_cell(&row.hospital_name),
                        right_cell(row.region.as_deref().unwrap_or("-")),
                        right_cell(row.mean_wait_minutes),
                        right_cell(row.record_count),
                    ]
                },
            )?;
        }
        ReportCommand::Evolution(args) => {
            let rows = time_of_day_evolution(
                store,
                &EvolutionParams {
                    day: args.date,
                    hospital_id: args.hospital.clone(),
                },
            )?;
            emit(
                output,
                &rows,
                &["Interval", "Attendance", "Mean wait (min)", "Records", "Peak"],
                |row| {
                    vec![
                        right_cell(&row.bucket),
                        right_cell(row.total_attendance),
                        right_cell(row.mean_wait_minutes),
                        right_cell(row.record_count),
                        right_cell(if row.peak { "yes" } else { "" }),
                    ]
                },
            )?;
        }
    }
    Ok(0)
}

/// Render report rows either as a styled table or as pretty-printed JSON.
fn emit<T: Serialize>(
    output: OutputArg,
    rows: &[T],
    headers: &[&str],
    cells: impl Fn(&T) -> Vec<Cell>,
) -> Result<()> {
    match output {
        OutputArg::Json => {
            let json = serde_json::to_string_pretty(rows).context("serialize report rows")?;
            println!("{json}");
        }
        OutputArg::Table => {
            let mut table = styled_table(headers);
            for row in rows {
                table.add_row(cells(row));
            }
            println!("{table}");
        }
    }
    Ok(())
}

pub fn run_errors_list(store: &dyn WaitTimeStore, args: &ErrorsListArgs) -> Result<i32> {
    let errors = store
        .integration_errors(args.unresolved)
        .context("list integration errors")?;
    let mut table = styled_table(&["Id", "Kind", "Occurred", "Resolved", "Message"]);
    for error in errors {
        table.add_row(vec![
            right_cell(error.id),
            right_cell(error.kind),
            right_cell(error.occurred_at.format("%Y-%m-%d %H:%M:%S")),
            right_cell(if error.resolved { "yes" } else { "no" }),
            right_cell(&error.message),
        ]);
    }
    println!("{table}");
    Ok(0)
}

pub fn run_errors_resolve(store: &dyn WaitTimeStore, args: &ErrorsResolveArgs) -> Result<i32> {
    store
        .resolve_integration_error(args.id, &args.notes)
        .with_context(|| format!("resolve integration error {}", args.id))?;
    println!("integration error #{} marked resolved", args.id);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;
    use hwt_store::MemoryStore;

    use crate::cli::KindArg;

    use super::*;

    const EMERGENCY_XML: &str = "<EmergencyReport>\
      <Header><InstitutionId>101</InstitutionId><Timestamp>2025-03-01T12:30:00</Timestamp></Header>\
      <Typology>Urgência Geral</Typology>\
      <State>Aberta</State>\
      <WaitingList>\
        <Item><TriageColor>Vermelho</TriageColor><PatientCount>2</PatientCount><WaitMinutes>10</WaitMinutes></Item>\
      </WaitingList>\
    </EmergencyReport>";

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn submit_reports_acceptance_and_rejection_exit_codes() {
        let store = MemoryStore::new();
        let valid = temp_file(EMERGENCY_XML);
        let code = run_submit(
            &store,
            &SubmitArgs {
                kind: KindArg::Emergency,
                file: valid.path().to_path_buf(),
            },
        )
        .unwrap();
        assert_eq!(code, 0);
        assert_eq!(store.emergency_records().unwrap().len(), 1);

        let broken = temp_file("<EmergencyReport><Header>");
        let code = run_submit(
            &store,
            &SubmitArgs {
                kind: KindArg::Emergency,
                file: broken.path().to_path_buf(),
            },
        )
        .unwrap();
        assert_eq!(code, 1);
        assert_eq!(store.integration_errors(true).unwrap().len(), 1);
    }

    #[test]
    fn load_hospitals_counts_rows() {
        let store = MemoryStore::new();
        let csv = temp_file(
            "HospitalID;HospitalName;Address;District;NUTSIDescription;NUTSIIDescription;NUTSIIIDescription;Latitude;Longitude;PhoneNum;Email\n\
             101;Hospital de Santa Maria;;Lisboa;;;;38.748;-9.160;;\n",
        );
        let code = run_load_hospitals(
            &store,
            &LoadHospitalsArgs {
                file: csv.path().to_path_buf(),
            },
        )
        .unwrap();
        assert_eq!(code, 0);
        assert!(store.hospital("101").unwrap().is_some());
    }

    fn march() -> RangeArgs {
        RangeArgs {
            from: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        }
    }

    #[test]
    fn report_runs_against_an_empty_store() {
        let store = MemoryStore::new();
        let command = ReportCommand::PediatricRegions(march());
        let code = run_report(&store, &command, OutputArg::Table).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn report_renders_rows_as_json() {
        let store = MemoryStore::new();
        let valid = temp_file(EMERGENCY_XML);
        run_submit(
            &store,
            &SubmitArgs {
                kind: KindArg::Emergency,
                file: valid.path().to_path_buf(),
            },
        )
        .unwrap();

        let command = ReportCommand::MeanWaiting(crate::cli::MeanWaitingArgs {
            range: march(),
            typology: None,
        });
        let code = run_report(&store, &command, OutputArg::Json).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn errors_resolve_clears_the_unresolved_flag() {
        let store = MemoryStore::new();
        let id = store
            .record_integration_error(
                hwt_model::ErrorKind::Malformed,
                "unexpected end of input".to_string(),
                Vec::new(),
                "<EmergencyReport>".to_string(),
            )
            .unwrap();

        let code = run_errors_resolve(
            &store,
            &ErrorsResolveArgs {
                id,
                notes: "resubmitted by the hospital".to_string(),
            },
        )
        .unwrap();
        assert_eq!(code, 0);
        assert!(store.integration_errors(true).unwrap().is_empty());
    }
}
