//! Behavioural tests for the five renderers

use envcfg_content::{ConfigValue, Error, RenderFormat, RenderOptions, render, render_with};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn doc(json: &str) -> ConfigValue {
    ConfigValue::parse(json).unwrap()
}

const DEPLOYMENT: &str = r#"{
    "log_level": "info",
    "environment": {"name": "dev"},
    "provider": {"provider": "lxd", "profile_name": "torrust-profile-dev"},
    "tracker": {
        "core": {
            "database": {"driver": "sqlite3", "database_name": "tracker.db"},
            "private": false
        },
        "udp_trackers": [{"bind_address": "0.0.0.0:6969"}, {"bind_address": "0.0.0.0:6868"}],
        "http_trackers": [{"bind_address": "0.0.0.0:7070"}],
        "http_api": {"bind_address": "0.0.0.0:1212", "admin_token": "MyAccessToken"}
    }
}"#;

#[test]
fn test_toml_full_deployment_document() {
    let text = render(&doc(DEPLOYMENT), RenderFormat::Toml).unwrap();

    assert_eq!(
        text,
        r#"log_level = "info"

[environment]
name = "dev"

[provider]
provider = "lxd"
profile_name = "torrust-profile-dev"

[tracker.core]
private = false

[tracker.core.database]
driver = "sqlite3"
database_name = "tracker.db"

[[tracker.udp_trackers]]
bind_address = "0.0.0.0:6969"

[[tracker.udp_trackers]]
bind_address = "0.0.0.0:6868"

[[tracker.http_trackers]]
bind_address = "0.0.0.0:7070"

[tracker.http_api]
bind_address = "0.0.0.0:1212"
admin_token = "MyAccessToken"
"#
    );
}

#[test]
fn test_toml_output_parses_back() {
    let text = render(&doc(DEPLOYMENT), RenderFormat::Toml).unwrap();
    let parsed: toml::Value = toml::from_str(&text).unwrap();

    assert_eq!(
        parsed["tracker"]["udp_trackers"][1]["bind_address"].as_str(),
        Some("0.0.0.0:6868")
    );
    assert_eq!(parsed["tracker"]["core"]["private"].as_bool(), Some(false));
}

#[test]
fn test_toml_array_of_tables() {
    let text = render(
        &doc(r#"{"udp_trackers": [{"bind_address": "0.0.0.0:6969"}]}"#),
        RenderFormat::Toml,
    )
    .unwrap();

    assert_eq!(text, "[[udp_trackers]]\nbind_address = \"0.0.0.0:6969\"\n");
}

#[test]
fn test_toml_heterogeneous_list_fails() {
    let err = render(&doc(r#"{"x": [1, {"a": 2}]}"#), RenderFormat::Toml).unwrap_err();

    match err {
        Error::HeterogeneousList { path } => assert_eq!(path.to_string(), "x"),
        other => panic!("expected HeterogeneousList, got {other}"),
    }
}

#[test]
fn test_toml_nested_array_of_tables_fails() {
    let err = render(
        &doc(r#"{"servers": [{"name": "a", "listeners": [{"port": 1}]}]}"#),
        RenderFormat::Toml,
    )
    .unwrap_err();

    match err {
        Error::UnsupportedNesting { path } => {
            assert_eq!(path.to_string(), "servers[0].listeners")
        }
        other => panic!("expected UnsupportedNesting, got {other}"),
    }
}

#[test]
fn test_toml_sub_table_inside_array_of_tables() {
    let text = render(
        &doc(r#"{"http_trackers": [{"bind_address": "0.0.0.0:7070", "tls": {"domain": "t.example.com"}}]}"#),
        RenderFormat::Toml,
    )
    .unwrap();

    assert_eq!(
        text,
        "[[http_trackers]]\nbind_address = \"0.0.0.0:7070\"\n\n[http_trackers.tls]\ndomain = \"t.example.com\"\n"
    );
}

#[test]
fn test_toml_string_escaping() {
    let text = render(&doc(r#"{"s": "a\\b \"q\"\nline\r"}"#), RenderFormat::Toml).unwrap();
    assert_eq!(text, "s = \"a\\\\b \\\"q\\\"\\nline\\r\"\n");
}

#[test]
fn test_env_nested_object_fails() {
    let err = render(&doc(r#"{"a": {"b": 1}}"#), RenderFormat::Env).unwrap_err();

    match err {
        Error::NestedObjectNotSupported { path } => assert_eq!(path.to_string(), "a"),
        other => panic!("expected NestedObjectNotSupported, got {other}"),
    }
}

#[test]
fn test_env_ignores_insertion_order() {
    let a = render(&doc(r#"{"B": "2", "A": "1", "C": [1, 2]}"#), RenderFormat::Env).unwrap();
    let b = render(&doc(r#"{"C": [1, 2], "A": "1", "B": "2"}"#), RenderFormat::Env).unwrap();

    assert_eq!(a, b);
    assert_eq!(a, "A=1\nB=2\nC=1,2\n");
}

#[test]
fn test_hcl_deployment_variables() {
    let text = render(
        &doc(r#"{"instance_name": "torrust-vm-dev", "ssh": {"port": 22, "keys": ["a.pub"]}, "private": false}"#),
        RenderFormat::Hcl,
    )
    .unwrap();

    assert_eq!(
        text,
        "instance_name = \"torrust-vm-dev\"\nssh = { port = 22, keys = [\"a.pub\"] }\nprivate = false\n"
    );
}

#[rstest]
#[case(RenderFormat::Json, "{}\n")]
#[case(RenderFormat::Yaml, "{}\n")]
#[case(RenderFormat::Toml, "")]
#[case(RenderFormat::Hcl, "")]
#[case(RenderFormat::Env, "")]
fn test_empty_object_root(#[case] format: RenderFormat, #[case] expected: &str) {
    assert_eq!(render(&ConfigValue::object(), format).unwrap(), expected);
}

#[rstest]
#[case(RenderFormat::Yaml)]
#[case(RenderFormat::Toml)]
#[case(RenderFormat::Hcl)]
#[case(RenderFormat::Env)]
fn test_non_object_root_rejected(#[case] format: RenderFormat) {
    for root in [
        ConfigValue::List(vec![ConfigValue::Int(1)]),
        ConfigValue::Text("x".into()),
        ConfigValue::Null,
    ] {
        let err = render(&root, format).unwrap_err();
        assert!(matches!(err, Error::RootMustBeObject { .. }), "{format}: {err}");
    }
}

#[test]
fn test_json_accepts_list_root() {
    let text = render(&doc("[1, {\"a\": 2}]"), RenderFormat::Json).unwrap();
    assert_eq!(doc(&text), doc("[1, {\"a\": 2}]"));
}

#[test]
fn test_compact_json_option() {
    let text = render_with(
        &doc(r#"{"a": {"b": [1, 2]}}"#),
        RenderFormat::Json,
        RenderOptions { compact_json: true },
    )
    .unwrap();
    assert_eq!(text, "{\"a\":{\"b\":[1,2]}}\n");
}

#[test]
fn test_error_messages_name_the_key_path() {
    let err = render(&doc(r#"{"tracker": {"x": [{"a": 1}, 2]}}"#), RenderFormat::Toml).unwrap_err();
    assert!(err.to_string().contains("tracker.x"), "got: {err}");
    assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("tracker.x"));
}
