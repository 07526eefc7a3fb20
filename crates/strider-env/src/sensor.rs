//! Sensor adapters: read engine state into observation tables.

use std::sync::Arc;

use strider_core::{
    ChannelGroup, Engine, FieldRegistry, ModelError, RobotModel, SensorData, SensorKind,
    SensorLayout,
};

/// Reads one sensor kind from the engine.
///
/// Adapters never mutate the engine; reading twice without a step in
/// between yields equal tables.
pub trait SensorAdapter: Send {
    /// The kind this adapter produces.
    fn kind(&self) -> SensorKind;

    /// Current readings.
    fn read(&self, engine: &dyn Engine) -> SensorData;
}

/// Encoder readings: rows `Q` and `V`, one column per encoder.
#[derive(Clone, Debug)]
pub struct EncoderAdapter {
    layout: Arc<SensorLayout>,
    /// Joint index observed by each column.
    joints: Vec<usize>,
}

impl EncoderAdapter {
    /// Bind to the encoder group of `registry`.
    pub fn new(model: &RobotModel, registry: &FieldRegistry) -> Result<Self, ModelError> {
        let names = registry
            .names(ChannelGroup::Encoder)
            .unwrap_or_default()
            .to_vec();
        let joints = registry
            .joints(ChannelGroup::Encoder)
            .unwrap_or_default()
            .iter()
            .zip(&names)
            .map(|(joint, name)| {
                model.joint_index(joint).ok_or_else(|| ModelError::UnknownJoint {
                    referenced_by: name.clone(),
                    joint: joint.clone(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            layout: Arc::new(SensorLayout::new(SensorKind::Encoder, names)),
            joints,
        })
    }
}

impl SensorAdapter for EncoderAdapter {
    fn kind(&self) -> SensorKind {
        SensorKind::Encoder
    }

    fn read(&self, engine: &dyn Engine) -> SensorData {
        let state = engine.state();
        let mut data = SensorData::zeros(Arc::clone(&self.layout));
        for (col, &j) in self.joints.iter().enumerate() {
            data.row_mut(0)[col] = state.positions.get(j).copied().unwrap_or(f64::NAN);
            data.row_mut(1)[col] = state.velocities.get(j).copied().unwrap_or(f64::NAN);
        }
        data
    }
}

/// Effort readings: row `U`, one column per effort sensor.
#[derive(Clone, Debug)]
pub struct EffortAdapter {
    layout: Arc<SensorLayout>,
    /// Motor index observed by each column.
    motors: Vec<usize>,
}

impl EffortAdapter {
    /// Bind to the model's effort sensors, in registry order.
    pub fn new(model: &RobotModel, registry: &FieldRegistry) -> Result<Self, ModelError> {
        let names = registry
            .names(ChannelGroup::Effort)
            .unwrap_or_default()
            .to_vec();
        let motors = names
            .iter()
            .map(|name| {
                let sensor = model.effort_sensors.iter().find(|s| &s.name == name);
                sensor
                    .and_then(|s| model.motor_index(&s.motor))
                    .ok_or_else(|| ModelError::UnknownMotor {
                        referenced_by: name.clone(),
                        motor: sensor.map(|s| s.motor.clone()).unwrap_or_default(),
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            layout: Arc::new(SensorLayout::new(SensorKind::Effort, names)),
            motors,
        })
    }
}

impl SensorAdapter for EffortAdapter {
    fn kind(&self) -> SensorKind {
        SensorKind::Effort
    }

    fn read(&self, engine: &dyn Engine) -> SensorData {
        let state = engine.state();
        let mut data = SensorData::zeros(Arc::clone(&self.layout));
        let row = data.row_mut(0);
        for (col, &m) in self.motors.iter().enumerate() {
            row[col] = state.efforts.get(m).copied().unwrap_or(f64::NAN);
        }
        data
    }
}
