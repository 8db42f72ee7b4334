use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use resell_dashboard::DashboardError;
use resell_dashboard::api::{
    ChartBinding, ChartId, DashboardConfig, RefreshOutcome, RefreshScheduler,
};
use resell_dashboard::core::{MarginPolicy, Row};
use resell_dashboard::render::NullRenderer;
use resell_dashboard::source::{DataSource, JsonFileSource, MemorySource};
use serde_json::json;

fn build_scheduler<S: DataSource>(
    source: S,
    config: DashboardConfig,
) -> RefreshScheduler<S, NullRenderer> {
    let binding = ChartBinding::new(NullRenderer::default(), config).expect("binding init");
    RefreshScheduler::new(source, binding)
}

fn stock() -> Vec<Row> {
    vec![
        Row::new("Lamp", 10.0, 15.0, 3.0, 5.0),
        Row::new("Chair", 40.0, 70.0, 6.0, 10.0),
    ]
}

#[test]
fn tick_fetches_derives_and_rebinds() {
    let mut scheduler = build_scheduler(MemorySource::from_rows(&stock()), DashboardConfig::default());

    let report = match scheduler.tick() {
        RefreshOutcome::Refreshed(report) => report,
        other => panic!("expected refresh, got {other:?}"),
    };
    assert_eq!(report.rows, 2);
    assert_eq!(scheduler.binding().generation(), 1);
    assert_eq!(scheduler.binding().renderer().last_row_count, 2);
    assert_eq!(scheduler.stats().successes, 1);
    assert!(scheduler.stats().last_success_at.is_some());
}

#[test]
fn failed_fetch_keeps_previous_state_and_recovers() {
    let mut source = MemorySource::from_rows(&stock());
    source.push_failure("spreadsheet unavailable");
    source.push_rows(&stock()[..1]);
    let mut scheduler = build_scheduler(source, DashboardConfig::default());

    assert!(scheduler.tick().is_refreshed());
    let before = scheduler.binding().snapshot();

    let outcome = scheduler.tick();
    assert!(matches!(outcome, RefreshOutcome::Failed(ref err) if err.is_transient()));
    assert_eq!(scheduler.binding().snapshot(), before);
    assert_eq!(scheduler.stats().failures, 1);
    assert!(
        scheduler
            .stats()
            .last_error
            .as_deref()
            .is_some_and(|error| error.contains("spreadsheet unavailable"))
    );

    assert!(scheduler.tick().is_refreshed());
    assert_eq!(scheduler.binding().order().len(), 1);
    assert_eq!(scheduler.stats().last_error, None);
    assert_eq!(scheduler.stats().attempts, 3);
}

#[test]
fn schema_error_is_fatal_to_the_cycle_only() {
    let mut source = MemorySource::from_rows(&stock());
    let mut record = Row::new("Desk", 1.0, 2.0, 3.0, 4.0).to_record();
    record.shift_remove("Selling Price");
    source.push_records(vec![record]);
    let mut scheduler = build_scheduler(source, DashboardConfig::default());

    assert!(scheduler.tick().is_refreshed());
    let before = scheduler.binding().snapshot();

    let outcome = scheduler.tick();
    assert!(matches!(
        outcome,
        RefreshOutcome::Failed(DashboardError::MissingColumn { ref column, row: 0 }) if column == "Selling Price"
    ));
    assert_eq!(scheduler.binding().snapshot(), before);
    assert_eq!(scheduler.binding().generation(), 1);
}

#[test]
fn overflowing_axis_fails_the_cycle_without_committing() {
    let mut source = MemorySource::from_rows(&stock());
    source.push_rows(&[Row::new("Yacht", 1.0, 1.7e308, 1.0, 0.0)]);
    let mut scheduler = build_scheduler(source, DashboardConfig::default());

    assert!(scheduler.tick().is_refreshed());
    let before = scheduler.binding().snapshot();

    let outcome = scheduler.tick();
    assert!(matches!(outcome, RefreshOutcome::Failed(DashboardError::InvalidData(_))));
    assert_eq!(scheduler.binding().snapshot(), before);
    assert_eq!(scheduler.binding().generation(), 1);
    assert_eq!(scheduler.binding().order().len(), 2);
}

#[test]
fn reject_policy_config_fails_zero_price_cycles() {
    let mut rows = stock();
    rows.push(Row::new("Giveaway", 5.0, 0.0, 1.0, 1.0));
    let config = DashboardConfig::default().with_margin_policy(MarginPolicy::RejectRow);
    let mut scheduler = build_scheduler(MemorySource::from_rows(&rows), config);

    let outcome = scheduler.tick();
    assert!(matches!(
        outcome,
        RefreshOutcome::Failed(DashboardError::ZeroSellingPrice { .. })
    ));
    assert_eq!(scheduler.binding().generation(), 0);
}

#[test]
fn view_state_edits_between_ticks_survive_refresh() {
    let mut scheduler = build_scheduler(MemorySource::from_rows(&stock()), DashboardConfig::default());
    assert!(scheduler.tick().is_refreshed());
    scheduler
        .binding_mut()
        .toggle_legend(ChartId::Revenue, resell_dashboard::core::Column::Revenue)
        .expect("toggle");
    assert!(scheduler.tick().is_refreshed());
    assert!(
        scheduler
            .binding()
            .chart(ChartId::Revenue)
            .view()
            .is_hidden(resell_dashboard::core::Column::Revenue)
    );
}

#[test]
fn interval_comes_from_config() {
    let config = DashboardConfig::default().with_refresh_interval(Duration::from_secs(5));
    let scheduler = build_scheduler(MemorySource::new(), config);
    assert_eq!(scheduler.interval(), Duration::from_secs(5));
}

fn temp_json(name: &str, payload: &serde_json::Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "resell-dashboard-{}-{name}.json",
        std::process::id()
    ));
    fs::write(&path, payload.to_string()).expect("write temp json");
    path
}

#[test]
fn json_file_source_feeds_the_pipeline() {
    let path = temp_json(
        "sheet",
        &json!({
            "values": [
                ["Item", "Base Price", "Selling Price", "Units Sold", "People Interested"],
                ["Lamp", "10", "15", "3", "5"],
                ["Chair", 40, 70, 6, 10]
            ]
        }),
    );
    let mut scheduler = build_scheduler(JsonFileSource::new(&path), DashboardConfig::default());

    let outcome = scheduler.tick();
    let _ = fs::remove_file(&path);
    let report = match outcome {
        RefreshOutcome::Refreshed(report) => report,
        other => panic!("expected refresh, got {other:?}"),
    };
    assert_eq!(report.plan(ChartId::Revenue).max_value, 750.0);
    assert_eq!(
        scheduler.binding().order().to_vec(),
        vec!["Lamp".to_owned(), "Chair".to_owned()]
    );
}

#[test]
fn missing_json_file_is_a_transient_failure() {
    let path = std::env::temp_dir().join("resell-dashboard-does-not-exist.json");
    let mut scheduler = build_scheduler(JsonFileSource::new(&path), DashboardConfig::default());
    let outcome = scheduler.tick();
    assert!(matches!(outcome, RefreshOutcome::Failed(ref err) if err.is_transient()));
}
