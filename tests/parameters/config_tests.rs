use crate::test_helpers::{double_fixed, double_model};
use lensparams_rs::parameters::{Param, ParamConfig, ParamValue};
use lensparams_rs::LensParamError;

const CONFIG: &str = r#"{
    "model": {
        "lens_model_list": ["SPEP"],
        "source_light_model_list": ["GAUSSIAN"],
        "point_source_model_list": ["LENSED_POSITION"],
        "num_point_source_list": [2]
    },
    "fixed": {
        "lens": [{"gamma": 1.9}],
        "source": [{"sigma_x": 0.1, "sigma_y": 0.1, "center_x": 0.0, "center_y": 0.0}],
        "point_source": [{"ra_image": [-1.0, 1.0], "dec_image": [-1.0, 1.0]}]
    },
    "linear_solver": false
}"#;

#[test]
fn test_config_from_json() {
    let config = ParamConfig::from_json(CONFIG).unwrap();
    assert_eq!(config.model, double_model());
    assert_eq!(config.fixed, double_fixed());
    assert!(!config.linear_solver);
    assert_eq!(
        config.fixed.point_source[0]["ra_image"],
        ParamValue::Array(vec![-1.0, 1.0])
    );

    let param = Param::from_config(&config).unwrap();
    assert_eq!(param.num_param().0, 8);
}

#[test]
fn test_config_file_round_trip() {
    let config = ParamConfig::from_json(CONFIG).unwrap();
    let path = std::env::temp_dir().join(format!(
        "lensparams_config_{}.json",
        std::process::id()
    ));

    config.save_json(&path).unwrap();
    let loaded = ParamConfig::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_config_errors() {
    assert!(matches!(
        ParamConfig::from_json("{\"model\": 3}"),
        Err(LensParamError::JsonError(_))
    ));
    assert!(matches!(
        ParamConfig::load_json("/nonexistent/lensparams/config.json"),
        Err(LensParamError::IoError(_))
    ));
}
