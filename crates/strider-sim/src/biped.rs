//! A planar seven-joint biped.
//!
//! The hips and the torso hang off the pelvis (root joints); knees and
//! ankles follow down each leg. Motors are listed leg-interleaved rather
//! than in joint order, so consumers must go through the registry's
//! motor-to-encoder correspondence instead of assuming equal indices.

use std::f64::consts::{FRAC_PI_2, PI};

use strider_core::{EffortSensorSpec, EncoderSpec, JointSpec, MotorSpec, RobotModel};

/// Name of the biped model.
pub const BIPED_NAME: &str = "biped";

struct Segment {
    name: &'static str,
    parent: Option<usize>,
    length: f64,
    offset: f64,
    inertia: f64,
    home: f64,
    rest: f64,
    range: (f64, f64),
}

const SEGMENTS: [Segment; 7] = [
    Segment {
        name: "torso",
        parent: None,
        length: 0.55,
        offset: PI,
        inertia: 2.0,
        home: 0.05,
        rest: 0.45,
        range: (-0.6, 0.6),
    },
    Segment {
        name: "l_hip",
        parent: None,
        length: 0.45,
        offset: 0.0,
        inertia: 1.2,
        home: 0.25,
        rest: -0.2,
        range: (-1.2, 1.6),
    },
    Segment {
        name: "l_knee",
        parent: Some(1),
        length: 0.42,
        offset: 0.0,
        inertia: 0.8,
        home: -0.35,
        rest: 0.0,
        range: (-2.2, 0.0),
    },
    Segment {
        name: "l_ankle",
        parent: Some(2),
        length: 0.14,
        offset: FRAC_PI_2,
        inertia: 0.4,
        home: 0.1,
        rest: -0.3,
        range: (-0.8, 0.8),
    },
    Segment {
        name: "r_hip",
        parent: None,
        length: 0.45,
        offset: 0.0,
        inertia: 1.2,
        home: -0.15,
        rest: -0.5,
        range: (-1.2, 1.6),
    },
    Segment {
        name: "r_knee",
        parent: Some(4),
        length: 0.42,
        offset: 0.0,
        inertia: 0.8,
        home: -0.2,
        rest: -0.55,
        range: (-2.2, 0.0),
    },
    Segment {
        name: "r_ankle",
        parent: Some(5),
        length: 0.14,
        offset: FRAC_PI_2,
        inertia: 0.4,
        home: 0.05,
        rest: -0.35,
        range: (-0.8, 0.8),
    },
];

/// Motor order, by joint name.
const MOTOR_ORDER: [&str; 7] = [
    "l_hip", "r_hip", "l_knee", "r_knee", "l_ankle", "r_ankle", "torso",
];

/// Build the biped.
///
/// Every joint's spring rests away from its home angle, so the home pose
/// is loaded: left unactuated the robot sags toward the spring rest pose,
/// and holding home takes a steady motor command.
pub fn biped() -> RobotModel {
    let joints = SEGMENTS
        .iter()
        .map(|s| JointSpec {
            name: s.name.to_string(),
            parent: s.parent,
            link_length: s.length,
            angle_offset: s.offset,
            inertia: s.inertia,
            damping: 0.5,
            stiffness: 5.0,
            rest_position: s.rest,
            home_position: s.home,
            lower_limit: s.range.0,
            upper_limit: s.range.1,
        })
        .collect();
    let motors = MOTOR_ORDER
        .iter()
        .map(|joint| MotorSpec {
            name: format!("{joint}_motor"),
            joint: joint.to_string(),
            effort_limit: 150.0,
        })
        .collect();
    let encoders = SEGMENTS
        .iter()
        .map(|s| EncoderSpec {
            name: s.name.to_string(),
            joint: s.name.to_string(),
        })
        .collect();
    let effort_sensors = MOTOR_ORDER
        .iter()
        .map(|joint| EffortSensorSpec {
            name: format!("{joint}_effort"),
            motor: format!("{joint}_motor"),
        })
        .collect();

    RobotModel {
        name: BIPED_NAME.to_string(),
        joints,
        motors,
        encoders,
        effort_sensors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_core::ChannelGroup;

    #[test]
    fn biped_is_valid() {
        biped().validate().unwrap();
    }

    #[test]
    fn motors_are_permuted_against_encoders() {
        let reg = biped().registry().unwrap();
        let map = reg
            .correspondence(ChannelGroup::Motor, ChannelGroup::Encoder)
            .unwrap();
        assert_eq!(map, &[1, 4, 2, 5, 3, 6, 0]);
        assert!(map.iter().enumerate().any(|(i, &j)| i != j));
    }

    #[test]
    fn springs_load_every_joint_at_home() {
        for joint in biped().joints {
            let load = joint.stiffness * (joint.home_position - joint.rest_position);
            assert!(load.abs() > 1.0, "{} unloaded at home", joint.name);
            assert!(joint.rest_position >= joint.lower_limit);
            assert!(joint.rest_position <= joint.upper_limit);
        }
    }
}
