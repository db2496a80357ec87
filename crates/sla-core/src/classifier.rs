use crate::config::Config;
use crate::record::{Due, Record};
use crate::types::SlaLabel;
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Work due within this many hours of now is at risk.
pub const AT_RISK_WINDOW_HOURS: i64 = 48;

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Maps `(status, due, now)` to a target label. Never looks at the stored SLA.
#[derive(Debug, Clone)]
pub struct Classifier {
    done_status: String,
    time_zone: Tz,
}

impl Classifier {
    pub fn new(done_status: impl Into<String>, time_zone: Tz) -> Self {
        Self {
            done_status: done_status.into(),
            time_zone,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.done_status.clone(), config.time_zone)
    }

    /// `None` means the record needs no SLA tracking and must be left alone.
    pub fn classify(
        &self,
        status: Option<&str>,
        due: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<SlaLabel> {
        if status == Some(self.done_status.as_str()) {
            return None;
        }

        let Some(raw) = due else {
            return Some(SlaLabel::AtRisk);
        };

        match Due::parse(raw) {
            Some(due) => Some(self.classify_due(due, now)),
            None => {
                warn!(due = raw, "unparseable due date, treating as unscheduled");
                Some(SlaLabel::AtRisk)
            }
        }
    }

    pub fn classify_record(&self, record: &Record, now: DateTime<Utc>) -> Option<SlaLabel> {
        self.classify(record.status.as_deref(), record.due.as_deref(), now)
    }

    fn classify_due(&self, due: Due, now: DateTime<Utc>) -> SlaLabel {
        let now = now.with_timezone(&self.time_zone);
        let due = self.resolve(due);
        let start_of_today = localize(&self.time_zone, now.date_naive().and_time(NaiveTime::MIN));

        if due < start_of_today {
            SlaLabel::Breached
        } else if due.signed_duration_since(now) <= Duration::hours(AT_RISK_WINDOW_HOURS) {
            SlaLabel::AtRisk
        } else {
            SlaLabel::OnTime
        }
    }

    fn resolve(&self, due: Due) -> DateTime<Tz> {
        match due {
            Due::Date(date) => localize(&self.time_zone, date.and_time(NaiveTime::MIN)),
            Due::Local(naive) => localize(&self.time_zone, naive),
            Due::Instant(dt) => dt.with_timezone(&self.time_zone),
        }
    }
}

/// Wall-clock time in `tz`. Ambiguous times take the earlier instant. Times
/// skipped by a DST jump move forward by the size of the gap, so a missing
/// midnight becomes the first instant of that day.
fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Offset in force just before the gap.
            let before = tz
                .offset_from_utc_datetime(&(naive - Duration::days(1)))
                .fix()
                .local_minus_utc();
            tz.from_utc_datetime(&(naive - Duration::seconds(i64::from(before))))
        }
    }
}
