//! Prior initialisation, walker draws and parallel evaluation of a scene fit

use crate::test_helpers::{approx_eq, double_fixed, double_model, double_scene, double_sigma};
use approx::assert_relative_eq;
use lensparams_rs::observation::{CountUnit, Data, Instrument, Observation, PsfType};
use lensparams_rs::parameters::{Param, SceneKwargs};
use lensparams_rs::problem_params::{SceneProblem, SceneProblemAdapter};
use lensparams_rs::utils::{eval_cost_parallel, get_params_parallel, sample_walkers};
use lensparams_rs::{LensParamError, Problem, Result};
use ndarray::{array, stack, Array1, Axis};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Residuals of the image fluxes against observed counts
struct ImageFluxes {
    data: Data,
    observed: [f64; 2],
}

impl SceneProblem for ImageFluxes {
    fn eval_scene(&self, kwargs: &SceneKwargs) -> Result<Array1<f64>> {
        let amps = kwargs.point_source[0]["point_amp"]
            .as_array()
            .ok_or_else(|| LensParamError::InvalidInput("point_amp".to_string()))?;
        let exposure = self.data.exposure_time();
        Ok(array![
            amps[0] * exposure - self.observed[0],
            amps[1] * exposure - self.observed[1],
        ])
    }

    fn residual_count(&self) -> usize {
        2
    }
}

fn data() -> Data {
    Data::new(
        Instrument {
            read_noise: 5.0,
            pixel_scale: 0.05,
            ccd_gain: 2.0,
        },
        Observation {
            exposure_time: 50.0,
            sky_brightness: 22.0,
            magnitude_zero_point: 25.0,
            seeing: 0.1,
            num_exposures: 2,
            psf_type: PsfType::Pixel,
        },
        "ADU".parse::<CountUnit>().unwrap(),
    )
}

#[test]
fn test_walkers_unpack_into_scenes() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let (mean, sigma) = param.param_init(&double_sigma()).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let walkers = sample_walkers(&mean, &sigma, 64, &mut rng).unwrap();
    assert_eq!(walkers.dim(), (64, param.num_param().0));

    let scenes = get_params_parallel(&param, &walkers).unwrap();
    assert_eq!(scenes.len(), 64);
    for (i, scene) in scenes.iter().enumerate() {
        // fixed fields are never perturbed
        assert_eq!(scene.lens[0]["gamma"].as_scalar(), Some(1.9));
        assert_eq!(scene.point_source[0]["ra_image"].as_array(), Some(&[-1.0, 1.0][..]));

        let theta = scene.lens[0]["theta_E"].as_scalar().unwrap();
        assert_relative_eq!(theta, walkers[[i, 0]]);
    }
}

#[test]
fn test_problem_cost_over_walkers() {
    let param = Param::new(&double_model(), &double_fixed(), false).unwrap();
    let problem = ImageFluxes {
        data: data(),
        observed: [300.0, 250.0],
    };
    let adapter = SceneProblemAdapter::new(&problem, &param);
    assert_eq!(adapter.parameter_count(), 8);

    let truth = adapter.initial_params(&double_scene()).unwrap();
    assert!(approx_eq(adapter.eval_cost(&truth).unwrap(), 0.0, 1e-9));

    let mut shifted = truth.clone();
    shifted[6] += 0.1;
    let walkers = stack(Axis(0), &[truth.view(), shifted.view()]).unwrap();

    let costs = eval_cost_parallel(&adapter, &walkers).unwrap();
    assert!(approx_eq(costs[0], 0.0, 1e-9));
    assert_relative_eq!(costs[1], 100.0, epsilon = 1e-6);
}

#[test]
fn test_linear_mode_hides_amplitudes_from_walkers() {
    let param = Param::new(&double_model(), &double_fixed(), true).unwrap();
    let (mean, sigma) = param.param_init(&double_sigma()).unwrap();
    assert_eq!(mean.len(), 6);
    assert_eq!(sigma.len(), 6);

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let walkers = sample_walkers(&mean, &sigma, 8, &mut rng).unwrap();
    for scene in get_params_parallel(&param, &walkers).unwrap() {
        assert_eq!(scene.point_source[0]["point_amp"].as_scalar(), Some(1.0));
    }
}
