use serde::Serialize;
use sla_core::sync::SyncReport;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn summary_line(report: &SyncReport) -> String {
    if report.dry_run {
        format!("SLA would be updated for {} pages (dry run)", report.updated)
    } else {
        format!("SLA updated for {} pages", report.updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_updated_count() {
        let report = SyncReport {
            scanned: 10,
            updated: 4,
            ..SyncReport::default()
        };
        assert_eq!(summary_line(&report), "SLA updated for 4 pages");
    }

    #[test]
    fn summary_flags_dry_run() {
        let report = SyncReport {
            updated: 2,
            dry_run: true,
            ..SyncReport::default()
        };
        assert_eq!(summary_line(&report), "SLA would be updated for 2 pages (dry run)");
    }
}
