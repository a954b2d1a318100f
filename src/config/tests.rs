use config::{FileFormat, Map};

use super::*;

use crate::domain::types::SortOrder;

fn file_layer(toml: &str) -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(toml, FileFormat::Toml))
}

fn env_layer(vars: &[(&str, &str)]) -> Environment {
    let vars: Map<String, String> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    environment().source(Some(vars))
}

const FILE_LAYER: &str = "[search]\ndebounce_ms = 800\n\n[provider]\nlist_delay_ms = 20\n";

#[test]
fn env_vars_override_the_config_file() {
    let env = env_layer(&[
        ("QUIRE__SEARCH__DEBOUNCE_MS", "150"),
        ("QUIRE__STORE__REFETCH", "once"),
        ("QUIRE__LOGGING__JSON", "true"),
    ]);

    let settings = resolve(file_layer(FILE_LAYER), env, &SettingsOverrides::default())
        .expect("valid settings");

    assert_eq!(settings.search.debounce, Duration::from_millis(150));
    assert_eq!(settings.provider.list_delay, Duration::from_millis(20));
    assert_eq!(settings.store.refetch, RefetchPolicy::Once);
    assert!(matches!(settings.logging.format, LogFormat::Json));
    assert_eq!(settings.detail.min_display, Duration::from_millis(500));
}

#[test]
fn cli_flags_override_env_vars() {
    let env = env_layer(&[
        ("QUIRE__SEARCH__DEBOUNCE_MS", "150"),
        ("QUIRE__STORE__REFETCH", "once"),
    ]);
    let overrides = SettingsOverrides {
        search_debounce_ms: Some(75),
        ..Default::default()
    };

    let settings = resolve(file_layer(FILE_LAYER), env, &overrides).expect("valid settings");

    assert_eq!(settings.search.debounce, Duration::from_millis(75));
    assert_eq!(settings.store.refetch, RefetchPolicy::Once);
}

#[test]
fn env_vars_go_through_validation() {
    let env = env_layer(&[("QUIRE__SEARCH__DEBOUNCE_MS", "600000")]);

    let err = resolve(file_layer(""), env, &SettingsOverrides::default())
        .expect_err("over the delay cap");

    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "search.debounce_ms",
            ..
        }
    ));
}

#[test]
fn unprefixed_env_vars_are_ignored() {
    let env = env_layer(&[("SEARCH__DEBOUNCE_MS", "150"), ("OTHER__STORE__REFETCH", "once")]);

    let settings =
        resolve(file_layer(FILE_LAYER), env, &SettingsOverrides::default()).expect("valid settings");

    assert_eq!(settings.search.debounce, Duration::from_millis(800));
    assert_eq!(settings.store.refetch, RefetchPolicy::Always);
}

#[test]
fn defaults_match_reference_timings() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(settings.provider.list_delay, Duration::from_millis(1000));
    assert_eq!(settings.provider.detail_delay, Duration::from_millis(500));
    assert_eq!(settings.search.debounce, Duration::from_millis(300));
    assert_eq!(settings.store.refetch, RefetchPolicy::Always);
    assert_eq!(settings.detail.min_display, Duration::from_millis(500));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.search.debounce_ms = Some(800);
    raw.logging.level = Some("info".to_string());

    let overrides = SettingsOverrides {
        search_debounce_ms: Some(150),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.search.debounce, Duration::from_millis(150));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = SettingsOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_delays_are_accepted() {
    let mut raw = RawSettings::default();
    raw.provider.list_delay_ms = Some(0);
    raw.search.debounce_ms = Some(0);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.provider.list_delay, Duration::ZERO);
    assert_eq!(settings.search.debounce, Duration::ZERO);
}

#[test]
fn oversized_debounce_is_rejected() {
    let mut raw = RawSettings::default();
    raw.search.debounce_ms = Some(MAX_DELAY_MS + 1);

    let err = Settings::from_raw(raw).expect_err("debounce too large");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "search.debounce_ms",
            ..
        }
    ));
}

#[test]
fn unknown_refetch_policy_is_rejected() {
    let mut raw = RawSettings::default();
    raw.store.refetch = Some("sometimes".to_string());

    let err = Settings::from_raw(raw).expect_err("bad policy");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "store.refetch",
            ..
        }
    ));
}

#[test]
fn refetch_once_can_be_selected_via_cli() {
    let args = CliArgs::parse_from(["quire", "--store-refetch", "once", "browse"]);
    let mut raw = RawSettings::default();
    raw.apply_overrides(&args.overrides);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.store.refetch, RefetchPolicy::Once);
    assert!(matches!(args.command, Some(Command::Browse)));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let err = Settings::from_raw(raw).expect_err("bad level");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn default_to_list_command() {
    let args = CliArgs::parse_from(["quire"]);
    let command = args
        .command
        .unwrap_or(Command::List(ListArgs::default()));
    assert!(matches!(command, Command::List(_)));
}

#[test]
fn parse_list_arguments() {
    let args = CliArgs::parse_from([
        "quire", "list", "--search", "react", "--sort", "desc", "--json",
    ]);

    match args.command.expect("list command") {
        Command::List(list) => {
            assert_eq!(list.search.as_deref(), Some("react"));
            assert_eq!(list.sort, SortOrder::Descending);
            assert!(list.json);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_list_rejects_unknown_sort() {
    let result = CliArgs::try_parse_from(["quire", "list", "--sort", "sideways"]);
    assert!(result.is_err());
}

#[test]
fn parse_show_keeps_raw_id() {
    let args = CliArgs::parse_from(["quire", "show", "abc"]);

    match args.command.expect("show command") {
        Command::Show(show) => {
            assert_eq!(show.id, "abc");
            assert!(!show.json);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn global_overrides_parse_after_subcommand() {
    let args = CliArgs::parse_from([
        "quire",
        "show",
        "3",
        "--provider-detail-delay-ms",
        "0",
        "--log-json=true",
    ]);

    assert_eq!(args.overrides.provider_detail_delay_ms, Some(0));
    assert_eq!(args.overrides.log_json, Some(true));
}
