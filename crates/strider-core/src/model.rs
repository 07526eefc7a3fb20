//! Robot description: a planar kinematic chain of revolute joints, the
//! motors that drive them, and the sensors that observe them.
//!
//! The model is the output of whatever loads robot descriptions. It is
//! plain data; [`RobotModel::validate()`] checks its internal references
//! and [`RobotModel::registry()`] derives the [`FieldRegistry`].

use indexmap::IndexSet;

use crate::error::{ModelError, RegistryError};
use crate::registry::{ChannelDef, ChannelGroup, FieldRegistry};
use crate::telemetry::check_segment;

/// One revolute joint and the link hanging below it.
///
/// Dynamics are per-joint: `inertia * a = torque - damping * v -
/// stiffness * (q - rest_position)`.
#[derive(Clone, Debug, PartialEq)]
pub struct JointSpec {
    /// Unique joint name.
    pub name: String,
    /// Index of the parent joint, or `None` for the root.
    pub parent: Option<usize>,
    /// Length of the link from this joint to its child (m).
    pub link_length: f64,
    /// Fixed angle added to `q` when placing the link (rad).
    pub angle_offset: f64,
    /// Effective rotational inertia (kg m²).
    pub inertia: f64,
    /// Viscous damping (N m s/rad).
    pub damping: f64,
    /// Passive spring stiffness (N m/rad).
    pub stiffness: f64,
    /// Spring rest angle (rad).
    pub rest_position: f64,
    /// Nominal angle at reset (rad).
    pub home_position: f64,
    /// Lower joint stop (rad).
    pub lower_limit: f64,
    /// Upper joint stop (rad).
    pub upper_limit: f64,
}

impl JointSpec {
    /// A joint with unit inertia, light damping, no spring, and wide limits.
    pub fn new(name: impl Into<String>, parent: Option<usize>, link_length: f64) -> Self {
        Self {
            name: name.into(),
            parent,
            link_length,
            angle_offset: 0.0,
            inertia: 1.0,
            damping: 0.1,
            stiffness: 0.0,
            rest_position: 0.0,
            home_position: 0.0,
            lower_limit: -std::f64::consts::PI,
            upper_limit: std::f64::consts::PI,
        }
    }
}

/// A torque actuator on one joint.
#[derive(Clone, Debug, PartialEq)]
pub struct MotorSpec {
    /// Unique motor name.
    pub name: String,
    /// Driven joint.
    pub joint: String,
    /// Magnitude at which commanded torque saturates (N m).
    pub effort_limit: f64,
}

/// A position/velocity sensor on one joint.
#[derive(Clone, Debug, PartialEq)]
pub struct EncoderSpec {
    /// Unique sensor name.
    pub name: String,
    /// Observed joint.
    pub joint: String,
}

/// A torque sensor on one motor.
#[derive(Clone, Debug, PartialEq)]
pub struct EffortSensorSpec {
    /// Unique sensor name.
    pub name: String,
    /// Observed motor.
    pub motor: String,
}

/// A complete robot description.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotModel {
    /// Robot name, used as the instance segment of robot-state log keys.
    pub name: String,
    /// Joints in topological order (parents precede children).
    pub joints: Vec<JointSpec>,
    /// Motors in engine command order.
    pub motors: Vec<MotorSpec>,
    /// Encoders in observation column order.
    pub encoders: Vec<EncoderSpec>,
    /// Effort sensors in observation column order.
    pub effort_sensors: Vec<EffortSensorSpec>,
}

impl RobotModel {
    /// Check names, references, topology, and physical parameters.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_name(&self.name)?;
        if self.joints.is_empty() {
            return Err(ModelError::NoJoints);
        }

        let mut joints = IndexSet::with_capacity(self.joints.len());
        for (i, joint) in self.joints.iter().enumerate() {
            check_name(&joint.name)?;
            if !joints.insert(joint.name.as_str()) {
                return Err(ModelError::DuplicateName {
                    name: joint.name.clone(),
                });
            }
            if let Some(parent) = joint.parent {
                if parent >= i {
                    return Err(ModelError::InvalidParent {
                        joint: joint.name.clone(),
                        parent,
                    });
                }
            }
            validate_joint(joint)?;
        }

        let mut motors = IndexSet::with_capacity(self.motors.len());
        for motor in &self.motors {
            check_name(&motor.name)?;
            if !motors.insert(motor.name.as_str()) {
                return Err(ModelError::DuplicateName {
                    name: motor.name.clone(),
                });
            }
            if !joints.contains(motor.joint.as_str()) {
                return Err(ModelError::UnknownJoint {
                    referenced_by: motor.name.clone(),
                    joint: motor.joint.clone(),
                });
            }
            if !(motor.effort_limit.is_finite() && motor.effort_limit > 0.0) {
                return Err(ModelError::InvalidParameter {
                    owner: motor.name.clone(),
                    reason: format!("effort_limit must be finite and > 0, got {}", motor.effort_limit),
                });
            }
        }

        let mut sensors = IndexSet::new();
        for enc in &self.encoders {
            check_name(&enc.name)?;
            if !sensors.insert(enc.name.as_str()) {
                return Err(ModelError::DuplicateName {
                    name: enc.name.clone(),
                });
            }
            if !joints.contains(enc.joint.as_str()) {
                return Err(ModelError::UnknownJoint {
                    referenced_by: enc.name.clone(),
                    joint: enc.joint.clone(),
                });
            }
        }
        for eff in &self.effort_sensors {
            check_name(&eff.name)?;
            if !sensors.insert(eff.name.as_str()) {
                return Err(ModelError::DuplicateName {
                    name: eff.name.clone(),
                });
            }
            if !motors.contains(eff.motor.as_str()) {
                return Err(ModelError::UnknownMotor {
                    referenced_by: eff.name.clone(),
                    motor: eff.motor.clone(),
                });
            }
        }
        Ok(())
    }

    /// Index of the joint called `name`.
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    /// Index of the motor called `name`.
    pub fn motor_index(&self, name: &str) -> Option<usize> {
        self.motors.iter().position(|m| m.name == name)
    }

    /// Home angle of every joint, in joint order.
    pub fn home_positions(&self) -> Vec<f64> {
        self.joints.iter().map(|j| j.home_position).collect()
    }

    /// Build the field registry for this model.
    ///
    /// Registers the encoder, effort, and motor groups and the motor to
    /// encoder correspondence. Effort sensors are keyed by the joint of
    /// the motor they observe.
    pub fn registry(&self) -> Result<FieldRegistry, RegistryError> {
        let encoders = self
            .encoders
            .iter()
            .map(|e| ChannelDef::new(e.name.clone(), e.joint.clone()))
            .collect();
        let efforts = self
            .effort_sensors
            .iter()
            .map(|e| {
                let joint = self
                    .motors
                    .iter()
                    .find(|m| m.name == e.motor)
                    .map_or_else(|| e.motor.clone(), |m| m.joint.clone());
                ChannelDef::new(e.name.clone(), joint)
            })
            .collect();
        let motors = self
            .motors
            .iter()
            .map(|m| ChannelDef::new(m.name.clone(), m.joint.clone()))
            .collect();
        FieldRegistry::builder()
            .group(ChannelGroup::Encoder, encoders)
            .group(ChannelGroup::Effort, efforts)
            .group(ChannelGroup::Motor, motors)
            .correspondence(ChannelGroup::Motor, ChannelGroup::Encoder)
            .build()
    }
}

fn check_name(name: &str) -> Result<(), ModelError> {
    check_segment(name).map_err(|reason| ModelError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

fn validate_joint(joint: &JointSpec) -> Result<(), ModelError> {
    let invalid = |reason: String| ModelError::InvalidParameter {
        owner: joint.name.clone(),
        reason,
    };
    if !(joint.inertia.is_finite() && joint.inertia > 0.0) {
        return Err(invalid(format!("inertia must be finite and > 0, got {}", joint.inertia)));
    }
    for (field, value) in [
        ("link_length", joint.link_length),
        ("damping", joint.damping),
        ("stiffness", joint.stiffness),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(invalid(format!("{field} must be finite and >= 0, got {value}")));
        }
    }
    for (field, value) in [
        ("angle_offset", joint.angle_offset),
        ("rest_position", joint.rest_position),
        ("home_position", joint.home_position),
    ] {
        if !value.is_finite() {
            return Err(invalid(format!("{field} must be finite, got {value}")));
        }
    }
    if joint.lower_limit.is_nan() || joint.upper_limit.is_nan() || joint.lower_limit > joint.upper_limit {
        return Err(invalid(format!(
            "limits [{}, {}] are not an interval",
            joint.lower_limit, joint.upper_limit
        )));
    }
    if joint.home_position < joint.lower_limit || joint.home_position > joint.upper_limit {
        return Err(invalid(format!(
            "home_position {} lies outside [{}, {}]",
            joint.home_position, joint.lower_limit, joint.upper_limit
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_link() -> RobotModel {
        RobotModel {
            name: "arm".into(),
            joints: vec![JointSpec::new("shoulder", None, 0.5), JointSpec::new("elbow", Some(0), 0.4)],
            motors: vec![
                MotorSpec {
                    name: "elbow_m".into(),
                    joint: "elbow".into(),
                    effort_limit: 50.0,
                },
                MotorSpec {
                    name: "shoulder_m".into(),
                    joint: "shoulder".into(),
                    effort_limit: 50.0,
                },
            ],
            encoders: vec![
                EncoderSpec {
                    name: "shoulder".into(),
                    joint: "shoulder".into(),
                },
                EncoderSpec {
                    name: "elbow".into(),
                    joint: "elbow".into(),
                },
            ],
            effort_sensors: vec![EffortSensorSpec {
                name: "elbow_torque".into(),
                motor: "elbow_m".into(),
            }],
        }
    }

    #[test]
    fn valid_model_builds_registry() {
        let model = two_link();
        model.validate().unwrap();
        let reg = model.registry().unwrap();
        assert_eq!(reg.len(ChannelGroup::Motor), 2);
        assert_eq!(reg.len(ChannelGroup::Effort), 1);
        assert_eq!(
            reg.correspondence(ChannelGroup::Motor, ChannelGroup::Encoder),
            Some(&[1, 0][..])
        );
        assert_eq!(reg.joints(ChannelGroup::Effort).unwrap()[0], "elbow");
    }

    #[test]
    fn forward_parent_rejected() {
        let mut model = two_link();
        model.joints[0].parent = Some(1);
        assert_eq!(
            model.validate(),
            Err(ModelError::InvalidParent {
                joint: "shoulder".into(),
                parent: 1
            })
        );
    }

    #[test]
    fn dangling_references_rejected() {
        let mut model = two_link();
        model.motors[0].joint = "wrist".into();
        assert!(matches!(model.validate(), Err(ModelError::UnknownJoint { .. })));

        let mut model = two_link();
        model.effort_sensors[0].motor = "wrist_m".into();
        assert!(matches!(model.validate(), Err(ModelError::UnknownMotor { .. })));
    }

    #[test]
    fn bad_parameters_rejected() {
        let mut model = two_link();
        model.joints[1].inertia = 0.0;
        assert!(matches!(model.validate(), Err(ModelError::InvalidParameter { .. })));

        let mut model = two_link();
        model.joints[1].home_position = 4.0;
        assert!(matches!(model.validate(), Err(ModelError::InvalidParameter { .. })));

        let mut model = two_link();
        model.motors[1].effort_limit = f64::NAN;
        assert!(matches!(model.validate(), Err(ModelError::InvalidParameter { .. })));
    }

    #[test]
    fn empty_and_duplicate_rejected() {
        let mut model = two_link();
        model.joints.clear();
        model.motors.clear();
        model.encoders.clear();
        model.effort_sensors.clear();
        assert_eq!(model.validate(), Err(ModelError::NoJoints));

        let mut model = two_link();
        model.joints[1].name = "shoulder".into();
        assert!(matches!(model.validate(), Err(ModelError::DuplicateName { .. })));
    }

    #[test]
    fn lookups() {
        let model = two_link();
        assert_eq!(model.joint_index("elbow"), Some(1));
        assert_eq!(model.motor_index("shoulder_m"), Some(1));
        assert_eq!(model.motor_index("elbow"), None);
        assert_eq!(model.home_positions(), vec![0.0, 0.0]);
    }
}
