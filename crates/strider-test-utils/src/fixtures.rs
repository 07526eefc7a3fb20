//! Small robot models for pipeline tests.
//!
//! - [`arm()`] has two joints, motors declared in reverse joint order, and
//!   no effort sensors.
//! - [`arm_with_effort()`] is the same arm with one effort sensor per motor.

use strider_core::{EffortSensorSpec, EncoderSpec, JointSpec, MotorSpec, RobotModel};

/// Name of the arm fixtures.
pub const ARM_NAME: &str = "arm";

/// A two-joint planar arm: `shoulder` and `elbow`.
///
/// Motors are declared elbow first, so the motor-to-encoder
/// correspondence is `[1, 0]`.
pub fn arm() -> RobotModel {
    let mut shoulder = JointSpec::new("shoulder", None, 0.5);
    shoulder.home_position = 0.2;
    shoulder.rest_position = 0.2;
    let mut elbow = JointSpec::new("elbow", Some(0), 0.4);
    elbow.home_position = -0.1;
    elbow.rest_position = -0.1;

    RobotModel {
        name: ARM_NAME.to_string(),
        joints: vec![shoulder, elbow],
        motors: ["elbow", "shoulder"]
            .iter()
            .map(|joint| MotorSpec {
                name: format!("{joint}_motor"),
                joint: joint.to_string(),
                effort_limit: 20.0,
            })
            .collect(),
        encoders: ["shoulder", "elbow"]
            .iter()
            .map(|joint| EncoderSpec {
                name: joint.to_string(),
                joint: joint.to_string(),
            })
            .collect(),
        effort_sensors: Vec::new(),
    }
}

/// [`arm()`] with an effort sensor on each motor.
pub fn arm_with_effort() -> RobotModel {
    let mut model = arm();
    model.effort_sensors = model
        .motors
        .iter()
        .map(|m| EffortSensorSpec {
            name: format!("{}_effort", m.joint),
            motor: m.name.clone(),
        })
        .collect();
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_core::ChannelGroup;

    #[test]
    fn fixtures_validate() {
        arm().validate().unwrap();
        arm_with_effort().validate().unwrap();
    }

    #[test]
    fn arm_correspondence_is_reversed() {
        let registry = arm().registry().unwrap();
        assert_eq!(
            registry
                .correspondence(ChannelGroup::Motor, ChannelGroup::Encoder)
                .unwrap(),
            &[1, 0]
        );
    }
}
