//! CLI presentation: text formatting for `pregen run`.

use crate::host::server::{Channel, Delivery};
use crate::job::JobId;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use std::time::Duration;

/// What a `pregen run` invocation observed.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub id: JobId,
    pub world: String,
    pub region: String,
    pub total_tiles: u64,
    pub invocations: u64,
    pub ticks: u64,
    pub elapsed: Duration,
    pub finished: bool,
    pub deliveries: Vec<Delivery>,
}

/// Delivered messages, one per line, followed by a summary table.
pub fn format_run_report(report: &RunReport) -> String {
    let mut out = String::new();
    for delivery in &report.deliveries {
        out.push_str(&format_delivery(delivery));
        out.push('\n');
    }
    if !report.deliveries.is_empty() {
        out.push('\n');
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec![
        "Task",
        "World",
        "Region",
        "Chunks",
        "Invocations",
        "Ticks",
        "Elapsed",
        "State",
    ]);
    table.add_row(vec![
        report.id.to_string(),
        report.world.clone(),
        report.region.clone(),
        report.total_tiles.to_string(),
        report.invocations.to_string(),
        report.ticks.to_string(),
        format!("{:.3}s", report.elapsed.as_secs_f64()),
        if report.finished { "finished" } else { "running" }.to_string(),
    ]);
    out.push_str(&table.to_string());
    out
}

fn format_delivery(delivery: &Delivery) -> String {
    match &delivery.channel {
        Channel::Direct(name) => format!("-> {}: {}", name, delivery.notice),
        Channel::Admin => format!("(admin) {}", delivery.notice),
    }
}
