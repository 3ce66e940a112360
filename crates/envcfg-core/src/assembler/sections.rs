//! Sections without a discriminant

use envcfg_content::{ConfigValue, Object};

use super::{AssembleError, Fields, FlatRecord, Fragment, Section};

/// `environment` <- `environment_name`, `instance_name`
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentSection;

impl Section for EnvironmentSection {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn fragments(&self, record: &FlatRecord) -> Result<Vec<Fragment>, AssembleError> {
        let mut fields = Fields::new();
        fields
            .set("name", record.text("environment_name")?)
            .set("instance_name", record.text("instance_name")?);
        Ok(fields.into_fragment(&["environment"]).into_iter().collect())
    }
}

/// `ssh_credentials` <- `ssh_*`
#[derive(Debug, Clone, Copy)]
pub struct SshSection;

impl Section for SshSection {
    fn name(&self) -> &'static str {
        "ssh_credentials"
    }

    fn fragments(&self, record: &FlatRecord) -> Result<Vec<Fragment>, AssembleError> {
        let mut fields = Fields::new();
        fields
            .set("private_key_path", record.text("ssh_private_key_path")?)
            .set("public_key_path", record.text("ssh_public_key_path")?)
            .set("username", record.text("ssh_username")?)
            .set("port", record.int("ssh_port")?);
        Ok(fields.into_fragment(&["ssh_credentials"]).into_iter().collect())
    }
}

/// `tracker.*` apart from the database
#[derive(Debug, Clone, Copy)]
pub struct TrackerSection;

impl Section for TrackerSection {
    fn name(&self) -> &'static str {
        "tracker"
    }

    fn fragments(&self, record: &FlatRecord) -> Result<Vec<Fragment>, AssembleError> {
        let mut fragments = Vec::new();

        if let Some(private) = record.bool("tracker_private")? {
            fragments.push(Fragment::new(&["tracker", "core", "private"], private));
        }
        if let Some(addresses) = record.list("udp_tracker_bind_addresses")? {
            fragments.push(Fragment::new(&["tracker", "udp_trackers"], bind_list(addresses)));
        }
        if let Some(addresses) = record.list("http_tracker_bind_addresses")? {
            fragments.push(Fragment::new(&["tracker", "http_trackers"], bind_list(addresses)));
        }

        let mut http_api = Fields::new();
        http_api
            .set("bind_address", record.text("http_api_bind_address")?)
            .set("admin_token", record.text("http_api_admin_token")?);
        fragments.extend(http_api.into_fragment(&["tracker", "http_api"]));

        let mut health = Fields::new();
        health.set("bind_address", record.text("health_check_api_bind_address")?);
        fragments.extend(health.into_fragment(&["tracker", "health_check_api"]));

        Ok(fragments)
    }
}

/// `["a", "b"]` -> `[{bind_address = "a"}, {bind_address = "b"}]`
fn bind_list(addresses: Vec<String>) -> ConfigValue {
    addresses
        .into_iter()
        .map(|address| {
            let mut entry = Object::new();
            entry.insert("bind_address".to_string(), ConfigValue::Text(address));
            ConfigValue::Object(entry)
        })
        .collect::<Vec<_>>()
        .into()
}
