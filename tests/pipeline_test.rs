mod common;

use approx::assert_relative_eq;
use common::temp_cache;
use galmock::constants::DPI;
use galmock::distribution_function::{DistributionSampler, SchwarzschildDf};
use galmock::mock_sampler::MockSampler;
use galmock::orbit_integration::{OrbitIntegrator, Rk4Integrator};
use galmock::params::SamplingParams;
use galmock::potential::{mw_potential_2014, Potential};
use galmock::sample_generator::lift_out_of_plane;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn short_params() -> SamplingParams {
    SamplingParams::builder()
        .integration_time_gyr(0.2)
        .integration_steps(20)
        .substeps(4)
        .build()
        .unwrap()
}

#[test]
fn default_model_produces_a_plausible_disc() {
    let (_guard, cache) = temp_cache();
    let sampler = MockSampler::with_defaults(short_params(), cache).unwrap();

    let batch = sampler
        .load_samples(200, (0.0, DPI), Some((6.0, 10.0)), &mut StdRng::seed_from_u64(2024))
        .unwrap();
    assert_eq!(batch.len(), 200);

    let mut mean_v_phi = 0.0;
    for i in 0..batch.len() {
        let [x, y, z, vx, vy, vz] = batch.row(i);
        assert!([x, y, z, vx, vy, vz].iter().all(|v| v.is_finite()));
        let r = x.hypot(y);
        // orbits drift a little from their starting radius in 0.2 Gyr
        assert!(r > 3.0 && r < 14.0, "R = {r} kpc");
        assert!(z.abs() < 3.0, "z = {z} kpc");
        mean_v_phi += (x * vy - y * vx) / r;
    }
    mean_v_phi /= batch.len() as f64;
    // cold disc rotating close to the circular speed
    assert!(mean_v_phi > 150.0 && mean_v_phi < 260.0, "<vφ> = {mean_v_phi}");
}

#[test]
fn integration_conserves_energy_and_angular_momentum() {
    let potential = mw_potential_2014().unwrap();
    let integrator = Rk4Integrator::new(mw_potential_2014().unwrap(), 20);
    let params = short_params();

    let mut rng = StdRng::seed_from_u64(9);
    let draws = SchwarzschildDf::default()
        .sample(20, Some((0.8, 1.2)), &mut rng)
        .unwrap();
    let initial = lift_out_of_plane(&draws, &mut rng);
    let times = galmock::orbit_integration::linspace(0.0, params.integration_time_natural(), 20);

    let energy = |s: &galmock::phase_space::OrbitState| {
        0.5 * (s.v_r * s.v_r + s.v_t * s.v_t + s.v_z * s.v_z) + potential.potential(s.r, s.z)
    };
    for start in &initial {
        let end = integrator.integrate_to_end(start, &times).unwrap();
        assert_relative_eq!(end.angular_momentum(), start.angular_momentum(), epsilon = 1e-12);
        assert_relative_eq!(energy(&end), energy(start), epsilon = 1e-5);
    }
}
