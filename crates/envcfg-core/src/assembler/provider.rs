//! Infrastructure provider selection

use envcfg_content::ConfigValue;

use super::{AssembleError, Fields, FlatRecord, Fragment, Section};

/// Where the deployment's virtual machine runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    /// Local LXD virtual machine
    Lxd { profile_name: Option<String> },
    /// Hetzner Cloud server
    Hetzner {
        api_token: Option<String>,
        server_type: Option<String>,
        location: Option<String>,
        image: Option<String>,
    },
}

impl Provider {
    /// Record key selecting the variant
    pub const DISCRIMINANT: &'static str = "provider";

    /// Read the variant named by [`Provider::DISCRIMINANT`] and its fields.
    pub fn from_record(record: &FlatRecord) -> Result<Self, AssembleError> {
        let kind = record
            .discriminant(Self::DISCRIMINANT)?
            .ok_or_else(|| AssembleError::MissingDiscriminant {
                discriminant: Self::DISCRIMINANT.to_string(),
            })?;

        match kind.as_str() {
            "lxd" => Ok(Self::Lxd {
                profile_name: record.text("lxd_profile_name")?,
            }),
            "hetzner" => Ok(Self::Hetzner {
                api_token: record.text("hetzner_api_token")?,
                server_type: record.text("hetzner_server_type")?,
                location: record.text("hetzner_location")?,
                image: record.text("hetzner_image")?,
            }),
            _ => Err(AssembleError::UnknownVariant {
                discriminant: Self::DISCRIMINANT.to_string(),
                value: kind,
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lxd { .. } => "lxd",
            Self::Hetzner { .. } => "hetzner",
        }
    }

    /// The `provider` object, tagged with its kind.
    pub fn to_value(&self) -> ConfigValue {
        let mut fields = Fields::tagged("provider", self.kind());
        match self {
            Self::Lxd { profile_name } => {
                fields.set("profile_name", profile_name.clone());
            }
            Self::Hetzner {
                api_token,
                server_type,
                location,
                image,
            } => {
                fields
                    .set("api_token", api_token.clone())
                    .set("server_type", server_type.clone())
                    .set("location", location.clone())
                    .set("image", image.clone());
            }
        }
        fields.into_value()
    }
}

/// `provider` <- discriminant `provider`
#[derive(Debug, Clone, Copy)]
pub struct ProviderSection;

impl Section for ProviderSection {
    fn name(&self) -> &'static str {
        "provider"
    }

    fn fragments(&self, record: &FlatRecord) -> Result<Vec<Fragment>, AssembleError> {
        let provider = Provider::from_record(record)?;
        Ok(vec![Fragment::new(&["provider"], provider.to_value())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(json: &str) -> FlatRecord {
        FlatRecord::from_json(json).unwrap()
    }

    #[test]
    fn hetzner_fields_are_read() {
        let provider = Provider::from_record(&record(
            r#"{"provider": "Hetzner", "hetzner_api_token": "tok", "hetzner_server_type": "cx22",
                "hetzner_location": "nbg1", "hetzner_image": "ubuntu-24.04", "lxd_profile_name": "ignored"}"#,
        ))
        .unwrap();
        assert_eq!(
            provider.to_value(),
            ConfigValue::parse(
                r#"{"provider": "hetzner", "api_token": "tok", "server_type": "cx22",
                    "location": "nbg1", "image": "ubuntu-24.04"}"#
            )
            .unwrap()
        );
    }

    #[test]
    fn lxd_without_profile_is_just_the_tag() {
        let provider = Provider::from_record(&record(r#"{"provider": "lxd"}"#)).unwrap();
        assert_eq!(provider, Provider::Lxd { profile_name: None });
        assert_eq!(provider.to_value(), ConfigValue::parse(r#"{"provider": "lxd"}"#).unwrap());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = Provider::from_record(&record(r#"{"provider": "aws"}"#)).unwrap_err();
        assert_eq!(err.to_string(), "Unknown provider 'aws'");
    }

    #[test]
    fn missing_provider_is_rejected() {
        let err = Provider::from_record(&record(r#"{"provider": ""}"#)).unwrap_err();
        assert!(matches!(err, AssembleError::MissingDiscriminant { .. }));
    }
}
