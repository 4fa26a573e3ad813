//! Alternating fitting stages that freeze and release whole families

use crate::test_helpers::{double_fixed, double_model, double_scene};
use lensparams_rs::parameters::{FixOptions, Param, ParamUpdate, ParamValue};
use lensparams_rs::LensParamError;

#[test]
fn test_freeze_lens_then_release() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let update = ParamUpdate::new(param.fixed());
    let fitted = param
        .get_params(&param.set_params(&double_scene()).unwrap())
        .unwrap();

    // stage 2: lens frozen, only the amplitudes remain
    let frozen = update
        .update_fixed_simple(
            &fitted,
            FixOptions {
                fix_lens: true,
                ..Default::default()
            },
        )
        .unwrap();
    let stage2 = param.with_fixed(&frozen).unwrap();
    let (num, labels) = stage2.num_param();
    assert_eq!(num, 3);
    assert_eq!(labels, vec!["amp", "point_amp", "point_amp"]);

    let args = stage2.set_params(&fitted).unwrap();
    assert_eq!(args, vec![12.0, 3.0, 2.5]);
    let scene = stage2.get_params(&[11.0, 2.0, 1.0]).unwrap();
    assert_eq!(scene.lens, fitted.lens);
    assert_eq!(scene.source[0]["amp"], ParamValue::Scalar(11.0));

    // stage 3: back to the initial masks
    let released = update
        .update_fixed_simple(&scene, FixOptions::default())
        .unwrap();
    let stage3 = param.with_fixed(&released).unwrap();
    assert_eq!(stage3.layout(), param.layout());
}

#[test]
fn test_stale_vector_is_rejected_after_freeze() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let layout = param.layout();
    let args = param.set_params(&double_scene()).unwrap();

    let frozen = ParamUpdate::new(param.fixed())
        .update_fixed_simple(&double_scene(), FixOptions::all())
        .unwrap();
    let stage2 = param.with_fixed(&frozen).unwrap();
    assert_eq!(stage2.num_param().0, 0);

    assert!(matches!(
        stage2.get_params(&args),
        Err(LensParamError::CursorMismatch { .. })
    ));
    assert!(matches!(
        stage2.get_params_checked(&args, &layout),
        Err(LensParamError::LayoutMismatch(_))
    ));
}

#[test]
fn test_linear_masks_survive_updates() {
    let param = Param::new(&double_model(), &double_fixed(), true).unwrap();
    let update = ParamUpdate::new(param.fixed());
    let fitted = param
        .get_params(&param.set_params(&double_scene()).unwrap())
        .unwrap();

    let fixed = update
        .update_fixed_simple(
            &fitted,
            FixOptions {
                fix_source: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(fixed.point_source[0]["point_amp"], ParamValue::Scalar(1.0));

    let stage2 = param.with_fixed(&fixed).unwrap();
    assert_eq!(stage2.num_param().1[0], "theta_E");
    assert_eq!(stage2.num_param().0, 5);
}
