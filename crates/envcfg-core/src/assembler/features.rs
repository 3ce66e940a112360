//! Optional services toggled by `<feature>_enabled`

use super::record::parse_flag;
use super::{AssembleError, Fields, FlatRecord, Fragment, Section};

/// Optional service that can be switched on in the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Prometheus,
    Grafana,
    Https,
    Backup,
}

impl Feature {
    /// Merge order
    pub const ALL: [Feature; 4] = [Self::Prometheus, Self::Grafana, Self::Https, Self::Backup];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Prometheus => "prometheus",
            Self::Grafana => "grafana",
            Self::Https => "https",
            Self::Backup => "backup",
        }
    }

    /// Record key switching the feature on, e.g. `grafana_enabled`
    pub fn flag_key(&self) -> String {
        format!("{}_enabled", self.name())
    }

    /// Whether the record enables this feature. Absent means disabled.
    pub fn is_enabled(&self, record: &FlatRecord) -> Result<bool, AssembleError> {
        let key = self.flag_key();
        match record.discriminant(&key)? {
            None => Ok(false),
            Some(value) => parse_flag(&value).ok_or(AssembleError::UnknownVariant {
                discriminant: key,
                value,
            }),
        }
    }

    fn fields(&self, record: &FlatRecord) -> Result<Fields, AssembleError> {
        let mut fields = Fields::new();
        match self {
            Self::Prometheus => {
                fields.set(
                    "scrape_interval_in_secs",
                    record.int("prometheus_scrape_interval_in_secs")?,
                );
            }
            Self::Grafana => {
                fields
                    .set("admin_user", record.text("grafana_admin_user")?)
                    .set("admin_password", record.text("grafana_admin_password")?);
            }
            Self::Https => {
                fields
                    .set("admin_email", record.text("https_admin_email")?)
                    .set("use_staging", record.bool("https_use_staging")?);
            }
            Self::Backup => {
                fields
                    .set("schedule", record.text("backup_schedule")?)
                    .set("retention_days", record.int("backup_retention_days")?);
            }
        }
        Ok(fields)
    }
}

/// One optional feature; emits `{}` at its name when enabled with no fields.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSection(pub Feature);

impl Section for FeatureSection {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn fragments(&self, record: &FlatRecord) -> Result<Vec<Fragment>, AssembleError> {
        if !self.0.is_enabled(record)? {
            return Ok(Vec::new());
        }
        let fields = self.0.fields(record)?;
        Ok(vec![Fragment::new(&[self.0.name()], fields.into_value())])
    }
}
