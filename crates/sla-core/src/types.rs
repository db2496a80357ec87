use std::fmt;

// ---------------------------------------------------------------------------
// SlaLabel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlaLabel {
    OnTime,
    AtRisk,
    Breached,
}

impl SlaLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SlaLabel::OnTime => "On Time",
            SlaLabel::AtRisk => "At Risk",
            SlaLabel::Breached => "Breached",
        }
    }
}

impl fmt::Display for SlaLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LabelNames
// ---------------------------------------------------------------------------

/// Select option names used in the remote SLA property for each label.
///
/// Databases are often localized (`Zamanında` / `Riskte` / `İhlal`), so the
/// written name is decoupled from [`SlaLabel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelNames {
    pub on_time: String,
    pub at_risk: String,
    pub breached: String,
}

impl LabelNames {
    pub fn name(&self, label: SlaLabel) -> &str {
        match label {
            SlaLabel::OnTime => &self.on_time,
            SlaLabel::AtRisk => &self.at_risk,
            SlaLabel::Breached => &self.breached,
        }
    }
}

impl Default for LabelNames {
    fn default() -> Self {
        Self {
            on_time: SlaLabel::OnTime.as_str().to_string(),
            at_risk: SlaLabel::AtRisk.as_str().to_string(),
            breached: SlaLabel::Breached.as_str().to_string(),
        }
    }
}
