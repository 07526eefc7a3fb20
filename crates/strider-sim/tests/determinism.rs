//! Bit-reproducibility of the reference engine.

use proptest::prelude::*;
use strider_core::{Engine, EngineOptions};
use strider_sim::{biped, JointSpaceEngine};

fn run(seed: u64, commands: &[Vec<f64>], noise: f64) -> Vec<u64> {
    let mut options = EngineOptions::default();
    options.initial_state.position_noise = noise;
    options.initial_state.velocity_noise = noise;
    let mut engine = JointSpaceEngine::with_options(biped(), options).unwrap();
    engine.reset(seed).unwrap();
    for command in commands {
        // Rejected steps are part of the trace too.
        let _ = engine.step(command);
    }
    let state = engine.state();
    state
        .positions
        .iter()
        .chain(&state.velocities)
        .chain(&state.accelerations)
        .chain(&state.efforts)
        .map(|v| v.to_bits())
        .collect()
}

fn arb_commands() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-200.0f64..200.0, 7), 1..60)
}

proptest! {
    #[test]
    fn same_seed_same_commands_same_bits(
        seed in any::<u64>(),
        commands in arb_commands(),
        noise in 0.0f64..0.2,
    ) {
        prop_assert_eq!(run(seed, &commands, noise), run(seed, &commands, noise));
    }
}

#[test]
fn unactuated_joints_sag_toward_spring_rest() {
    let model = biped();
    let mut engine = JointSpaceEngine::new(model.clone()).unwrap();
    engine.reset(0).unwrap();
    for _ in 0..1000 {
        engine.step(&[0.0; 7]).unwrap();
    }
    for (i, joint) in model.joints.iter().enumerate() {
        let moved = engine.state().positions[i] - joint.home_position;
        let pull = joint.rest_position - joint.home_position;
        assert!(moved * pull > 0.0, "{} moved {moved}", joint.name);
    }
}
