use crate::test_helpers::{approx_eq, double_fixed, double_model, double_scene, double_sigma};
use lensparams_rs::kwargs;
use lensparams_rs::parameters::{
    Family, FixedConfig, ModelConfig, Param, ParamValue, SceneKwargs, LINEAR_SENTINEL,
};
use lensparams_rs::LensParamError;

#[test]
fn test_free_count_linear_and_nonlinear() {
    let nonlinear = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let (num, labels) = nonlinear.num_param();
    assert_eq!(num, 8);
    assert_eq!(labels[0], "theta_E");
    assert_eq!(
        labels,
        vec!["theta_E", "e1", "e2", "center_x", "center_y", "amp", "point_amp", "point_amp"]
    );

    let linear = Param::new(&double_model(), &double_fixed(), true).unwrap();
    let (num, labels) = linear.num_param();
    assert_eq!(num, 6);
    assert_eq!(labels[0], "theta_E");
    assert_eq!(linear.num_param_linear(), 2);
    assert_eq!(nonlinear.num_param_linear(), 2);
}

#[test]
fn test_scene_round_trip() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let scene = double_scene();

    let args = param.set_params(&scene).unwrap();
    assert_eq!(args, vec![1.1, 0.05, -0.02, 0.01, -0.01, 12.0, 3.0, 2.5]);

    let unpacked = param.get_params(&args).unwrap();
    assert_eq!(unpacked, scene);
}

#[test]
fn test_linear_mode_substitutes_amplitudes() {
    let param = Param::new(&double_model(), &double_fixed(), true).unwrap();
    let args = param.set_params(&double_scene()).unwrap();
    assert_eq!(args.len(), 6);

    let unpacked = param.get_params(&args).unwrap();
    assert_eq!(
        unpacked.point_source[0]["point_amp"],
        ParamValue::Scalar(LINEAR_SENTINEL)
    );
    assert_eq!(
        unpacked.point_source[0]["ra_image"],
        ParamValue::Array(vec![-1.0, 1.0])
    );
    // the source amplitude is not solved linearly
    assert_eq!(unpacked.source[0]["amp"], ParamValue::Scalar(12.0));
}

#[test]
fn test_fixed_values_ignore_flat_vector() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let mut scene = double_scene();
    scene.lens[0].insert("gamma".to_string(), ParamValue::Scalar(2.3));

    let args = param.set_params(&scene).unwrap();
    let unpacked = param.get_params(&args).unwrap();
    assert_eq!(unpacked.lens[0]["gamma"], ParamValue::Scalar(1.9));
}

#[test]
fn test_get_params_rejects_wrong_length() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();

    assert!(matches!(
        param.get_params(&[0.0; 7]),
        Err(LensParamError::CursorMismatch {
            expected: 8,
            actual: 7
        })
    ));
    assert!(matches!(
        param.get_params(&[0.0; 9]),
        Err(LensParamError::CursorMismatch {
            expected: 8,
            actual: 9
        })
    ));
}

#[test]
fn test_set_params_missing_free_value() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let mut scene = double_scene();
    scene.lens[0].remove("e2");

    match param.set_params(&scene) {
        Err(LensParamError::MissingParameter { param, instance }) => {
            assert_eq!(param, "e2");
            assert_eq!(instance, 0);
        }
        other => panic!("expected MissingParameter, got {:?}", other),
    }
}

#[test]
fn test_param_init_means_and_widths() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let (mean, sigma) = param.param_init(&double_sigma()).unwrap();

    assert_eq!(mean, param.set_params(&double_scene()).unwrap());
    assert_eq!(sigma, vec![0.1, 0.05, 0.05, 0.02, 0.02, 1.0, 0.3, 0.2]);
}

#[test]
fn test_param_init_missing_width() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let mut means = double_sigma();
    means.lens[0].remove("ellipse_sigma");

    assert!(matches!(
        param.param_init(&means),
        Err(LensParamError::MissingSigmaField { .. })
    ));
}

#[test]
fn test_unknown_variant_is_rejected() {
    let model = ModelConfig {
        lens_model_list: vec!["SPEP".to_string(), "NOT_A_PROFILE".to_string()],
        ..Default::default()
    };
    match Param::new(&model, &FixedConfig::default(), true) {
        Err(LensParamError::UnknownModel { family, variant }) => {
            assert_eq!(family, Family::Lens.name());
            assert_eq!(variant, "NOT_A_PROFILE");
        }
        other => panic!("expected UnknownModel, got {:?}", other),
    }
}

#[test]
fn test_empty_scene() {
    let param = Param::new(&ModelConfig::default(), &FixedConfig::default(), true).unwrap();
    assert_eq!(param.num_param(), (0, vec![]));
    assert_eq!(param.set_params(&SceneKwargs::new()).unwrap(), Vec::<f64>::new());
    assert_eq!(param.get_params(&[]).unwrap(), SceneKwargs::new());
}

#[test]
fn test_cosmology_sits_last() {
    let model = ModelConfig {
        lens_model_list: vec!["SIS".to_string()],
        cosmo_type: Some("D_dt".to_string()),
        ..Default::default()
    };
    let param = Param::new(&model, &FixedConfig::default(), true).unwrap();
    let (num, labels) = param.num_param();
    assert_eq!(num, 4);
    assert_eq!(labels.last().map(String::as_str), Some("D_dt"));

    let scene = param.get_params(&[1.0, 0.0, 0.0, 3500.0]).unwrap();
    assert!(approx_eq(
        scene.cosmo[0]["D_dt"].as_scalar().unwrap(),
        3500.0,
        1e-12
    ));
}

#[test]
fn test_layout_detects_fixed_mask_change() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let args = param.set_params(&double_scene()).unwrap();
    let layout = param.layout();
    assert_eq!(layout.len(), 8);

    assert_eq!(
        param.get_params_checked(&args, &layout).unwrap(),
        double_scene()
    );

    let mut fixed = double_fixed();
    fixed.lens[0].insert("e1".to_string(), ParamValue::Scalar(0.0));
    let other = param.with_fixed(&fixed).unwrap();
    assert!(matches!(
        other.get_params_checked(&args[..7], &layout),
        Err(LensParamError::LayoutMismatch(_))
    ));
}

#[test]
fn test_multiple_point_source_instances() {
    let model = ModelConfig {
        point_source_model_list: vec!["LENSED_POSITION".to_string(), "SOURCE_POSITION".to_string()],
        num_point_source_list: vec![4, 1],
        ..Default::default()
    };
    let param = Param::new(&model, &FixedConfig::default(), false).unwrap();
    let (num, labels) = param.num_param();
    assert_eq!(num, 4 * 3 + 3);
    assert_eq!(labels[4], "dec_image");
    assert_eq!(labels[12], "ra_source");

    let scene = SceneKwargs {
        point_source: vec![
            kwargs! {
                "ra_image" => vec![0.1, 0.2, 0.3, 0.4],
                "dec_image" => vec![-0.1, -0.2, -0.3, -0.4],
                "point_amp" => vec![1.0, 2.0, 3.0, 4.0],
            },
            kwargs! { "ra_source" => 0.5, "dec_source" => -0.5, "point_amp" => 7.0 },
        ],
        ..Default::default()
    };
    let args = param.set_params(&scene).unwrap();
    assert_eq!(param.get_params(&args).unwrap(), scene);
}
