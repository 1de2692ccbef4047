use tabular_clean::{CaseMode, CleanError, Dataset, TabularCleaner, Value};

fn five_customers() -> Dataset {
    Dataset::from_csv_str(
        "\
Index,First Name,Email,Country
1,Sheryl,zunigavanessa@smith.info,Chile
2,Preston,vmata@colon.com,Djibouti
3,Roy,,Antigua and Barbuda
4,Linda,kaitlin13@hernandez.com,Dominican Republic
5,Joanna,dariusbenton@yahoo.com,Slovakia (Slovak Republic)
",
    )
    .unwrap()
}

#[test]
fn test_empty_email_row_is_dropped() {
    let result = TabularCleaner::new(five_customers())
        .drop_rows_with_missing(&["Email"])
        .unwrap()
        .finish();

    assert_eq!(result.dataset.len(), 4);
    assert!(result
        .dataset
        .column("Email")
        .unwrap()
        .iter()
        .all(|v| !v.is_missing()));
    assert_eq!(result.report.steps[0].rows_before, 5);
    assert_eq!(result.report.steps[0].rows_after, 4);
}

#[test]
fn test_country_variants_normalize_to_upper() {
    let raw = Dataset::from_csv_str("Country\nchile\n Chile \nCHILE\n").unwrap();
    let result = TabularCleaner::new(raw)
        .normalize_case("Country", CaseMode::Upper)
        .unwrap()
        .finish();

    let countries: Vec<&str> = result
        .dataset
        .column("Country")
        .unwrap()
        .into_iter()
        .filter_map(Value::as_text)
        .collect();
    assert_eq!(countries, vec!["CHILE", "CHILE", "CHILE"]);
}

#[test]
fn test_identical_records_keep_first_occurrence() {
    let raw = Dataset::from_csv_str(
        "Index,Email\n7,a@x.io\n8,b@x.io\n7,a@x.io\n9,c@x.io\n",
    )
    .unwrap();
    let result = TabularCleaner::new(raw).deduplicate().unwrap().finish();

    let order: Vec<String> = result
        .dataset
        .column("Email")
        .unwrap()
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(order, vec!["a@x.io", "b@x.io", "c@x.io"]);
}

#[test]
fn test_bad_date_becomes_missing_and_run_completes() {
    let raw = Dataset::from_csv_str(
        "Email,Subscription Date\na@x.io,not-a-date\nb@x.io,2021-07-26\n",
    )
    .unwrap();
    let result = TabularCleaner::new(raw)
        .parse_dates("Subscription Date")
        .unwrap()
        .deduplicate()
        .unwrap()
        .finish();

    assert_eq!(
        result.dataset.value(0, "Subscription Date").unwrap(),
        Some(&Value::Missing)
    );
    assert_eq!(result.report.warnings.len(), 1);
    assert_eq!(result.report.warnings[0].column, "Subscription Date");
    assert_eq!(result.report.steps.len(), 2);
}

#[test]
fn test_missing_column_aborts_with_schema_error() {
    let err = TabularCleaner::new(five_customers())
        .trim_column_names()
        .unwrap()
        .normalize_case("Nation", CaseMode::Lower)
        .unwrap_err();

    match err {
        CleanError::SchemaError { column, operation } => {
            assert_eq!(column, "Nation");
            assert_eq!(operation, "normalize_case");
        }
        other => panic!("expected schema error, got {other}"),
    }
}

#[test]
fn test_fill_then_drop_keeps_everything() {
    let result = TabularCleaner::new(five_customers())
        .fill_missing("Email", "unknown@example.com")
        .unwrap()
        .drop_rows_with_missing(&["Email"])
        .unwrap()
        .rename_column("First Name", "first_name")
        .unwrap()
        .finish();

    assert_eq!(result.dataset.len(), 5);
    assert_eq!(result.report.rows_removed(), 0);
    assert_eq!(result.dataset.columns()[1], "first_name");
    assert_eq!(
        result.dataset.value(2, "Email").unwrap(),
        Some(&Value::Text("unknown@example.com".into()))
    );
}
