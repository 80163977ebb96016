//! Configuration files written and read back through the service layer.

use std::path::PathBuf;

use wf_app::{AnalysisConfig, AppError, LayoutConfig, load_config, load_json, load_yaml, save_yaml};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wf-app-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn yaml_roundtrip_preserves_config() {
    let mut config = AnalysisConfig::default();
    config.layout = LayoutConfig::Explicit {
        x: vec![0.0, 560.0, 1120.0, 0.0],
        y: vec![0.0, 0.0, 0.0, 560.0],
    };
    config.sweep.parallel = true;
    config.site.profile.turbulence_intensity = 0.1;

    let path = scratch("roundtrip.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(load_config(&path).unwrap(), config);
}

#[test]
fn json_config_is_loaded_by_extension() {
    let path = scratch("config.json");
    std::fs::write(
        &path,
        r#"{ "layout": { "kind": "row", "turbine_count": 5, "spacing_m": 600.0 } }"#,
    )
    .unwrap();

    let config = load_json(&path).unwrap();
    assert_eq!(
        config.layout,
        LayoutConfig::Row {
            turbine_count: 5,
            spacing_m: 600.0
        }
    );
    assert_eq!(load_config(&path).unwrap(), config);
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let path = scratch("invalid.yaml");
    std::fs::write(&path, "simulation:\n  turbulence: 1.5\n").unwrap();
    assert!(matches!(load_yaml(&path), Err(AppError::Validation(_))));

    let path = scratch("garbage.yaml");
    std::fs::write(&path, "layout: [unterminated").unwrap();
    assert!(matches!(load_yaml(&path), Err(AppError::Parse(_))));

    let missing = scratch("does-not-exist.yaml");
    assert!(matches!(
        load_yaml(&missing),
        Err(AppError::ConfigFileRead { .. })
    ));
}
