use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_without_file_or_env() {
    let settings = resolve_settings(None, env_from(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
    assert!(settings.credentials().is_err());
}

#[test]
fn reads_flat_toml_keys() {
    let settings = resolve_settings(
        Some(
            r#"
            supabase_url = "https://abc.supabase.co"
            supabase_anon_key = "file-key"
            question_bank = "data/perguntas.json"
            "#,
        ),
        env_from(&[]),
    )
    .expect("settings");

    assert_eq!(
        settings.credentials().expect("credentials"),
        ("https://abc.supabase.co", "file-key")
    );
    assert_eq!(settings.question_bank_path, PathBuf::from("data/perguntas.json"));
}

#[test]
fn environment_overrides_file_and_app_prefix_wins() {
    let settings = resolve_settings(
        Some(r#"supabase_url = "https://file.supabase.co""#),
        env_from(&[
            ("VITE_SUPABASE_URL", "https://vite.supabase.co"),
            ("SUPABASE_URL", "https://plain.supabase.co"),
            ("VITE_SUPABASE_ANON_KEY", "vite-key"),
            ("APP__QUESTION_BANK", "/etc/dto/bank.json"),
        ]),
    )
    .expect("settings");
    assert_eq!(
        settings.supabase_url.as_deref(),
        Some("https://plain.supabase.co")
    );
    assert_eq!(settings.supabase_anon_key.as_deref(), Some("vite-key"));
    assert_eq!(settings.question_bank_path, PathBuf::from("/etc/dto/bank.json"));

    let settings = resolve_settings(
        None,
        env_from(&[
            ("SUPABASE_URL", "https://plain.supabase.co"),
            ("APP__SUPABASE_URL", "https://app.supabase.co"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.supabase_url.as_deref(), Some("https://app.supabase.co"));
}

#[test]
fn blank_credentials_are_missing() {
    let settings = resolve_settings(
        None,
        env_from(&[("SUPABASE_URL", "https://abc.supabase.co"), ("SUPABASE_ANON_KEY", " ")]),
    )
    .expect("settings");
    let err = settings.credentials().expect_err("must fail");
    assert!(err.to_string().contains("SUPABASE_ANON_KEY"));
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(resolve_settings(Some("supabase_url = "), env_from(&[])).is_err());
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("dto_cli_missing_{suffix}.toml"));

    let err = load_settings(Some(&missing)).expect_err("must fail");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn workspace_config_points_at_sample_question_bank() {
    let settings = resolve_settings(
        Some(include_str!("../../../../dto_form.toml")),
        env_from(&[]),
    )
    .expect("settings");

    assert_eq!(
        settings.question_bank_path,
        PathBuf::from("demos/question_bank.json")
    );
    assert!(settings.credentials().is_err());

    let bank_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(&settings.question_bank_path);
    let raw = fs::read_to_string(&bank_path).expect("sample question bank");
    let bank = shared::QuestionBank::from_json_str(&raw).expect("valid question bank");
    assert!(!bank.is_empty());
}
