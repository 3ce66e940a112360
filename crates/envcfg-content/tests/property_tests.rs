use envcfg_content::{ConfigValue, Object, RenderFormat, render};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        Just(ConfigValue::Null),
        any::<bool>().prop_map(ConfigValue::Bool),
        any::<i64>().prop_map(ConfigValue::Int),
        // Quarter steps are exact in binary, so text round-trips are lossless
        (-4000i32..4000).prop_map(|n| ConfigValue::Float(f64::from(n) / 4.0)),
        "[a-z0-9 ]{0,8}".prop_map(ConfigValue::Text),
    ]
}

fn tree() -> impl Strategy<Value = ConfigValue> {
    scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ConfigValue::List),
            prop::collection::vec(("[a-z_]{1,6}", inner), 0..4)
                .prop_map(|entries| ConfigValue::Object(entries.into_iter().collect())),
        ]
    })
}

fn object_tree() -> impl Strategy<Value = ConfigValue> {
    prop::collection::vec(("[a-z_]{1,6}", tree()), 0..5)
        .prop_map(|entries| ConfigValue::Object(entries.into_iter().collect()))
}

proptest! {
    #[test]
    fn test_json_round_trip_preserves_tree(value in tree()) {
        let text = render(&value, RenderFormat::Json).unwrap();
        let parsed = ConfigValue::parse(&text).unwrap();
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn test_render_is_deterministic(value in object_tree()) {
        for format in RenderFormat::ALL {
            let first = render(&value, format).ok();
            let second = render(&value, format).ok();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn test_env_independent_of_insertion_order(
        entries in prop::collection::btree_map("[A-Z_]{1,6}", scalar(), 0..8)
    ) {
        let forward: Object = entries.clone().into_iter().collect();
        let backward: Object = entries.into_iter().rev().collect();

        let a = render(&ConfigValue::Object(forward), RenderFormat::Env).unwrap();
        let b = render(&ConfigValue::Object(backward), RenderFormat::Env).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_toml_output_is_valid_toml(value in object_tree()) {
        if let Ok(text) = render(&value, RenderFormat::Toml) {
            prop_assert!(toml::from_str::<toml::Table>(&text).is_ok(), "invalid TOML:\n{}", text);
        }
    }

    #[test]
    fn test_yaml_round_trip_preserves_tree(value in object_tree()) {
        let text = render(&value, RenderFormat::Yaml).unwrap();
        let parsed: ConfigValue = serde_yaml::from_str(&text).unwrap();
        prop_assert_eq!(parsed, value);
    }
}
