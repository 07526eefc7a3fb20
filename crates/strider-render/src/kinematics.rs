//! Planar forward kinematics.

use strider_core::RobotModel;

/// World-space placement of one link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkPose {
    /// Joint position (link start).
    pub start: [f64; 2],
    /// Link end, where child joints attach.
    pub end: [f64; 2],
    /// Absolute link angle; 0 points straight down.
    pub angle: f64,
}

/// Place every link of `model` at joint angles `positions`.
///
/// Root joints sit at `base`. A link's absolute angle is its parent's
/// angle plus `q + angle_offset`. Missing positions count as 0 and a
/// parent that does not precede its child is treated as absent.
pub fn forward_kinematics(model: &RobotModel, positions: &[f64], base: [f64; 2]) -> Vec<LinkPose> {
    let mut poses: Vec<LinkPose> = Vec::with_capacity(model.joints.len());
    for (i, joint) in model.joints.iter().enumerate() {
        let q = positions.get(i).copied().unwrap_or(0.0);
        let (start, parent_angle) = match joint.parent.and_then(|p| poses.get(p)) {
            Some(parent) => (parent.end, parent.angle),
            None => (base, 0.0),
        };
        let angle = parent_angle + q + joint.angle_offset;
        let end = [
            start[0] + joint.link_length * angle.sin(),
            start[1] - joint.link_length * angle.cos(),
        ];
        poses.push(LinkPose { start, end, angle });
    }
    poses
}
