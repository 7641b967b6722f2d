//! 布料碰撞体

use glam::Vec3;

/// 胶囊体长轴
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CapsuleAxis {
    X,
    #[default]
    Y,
    Z,
}

/// 布料碰撞体（节点局部空间）
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClothCollider {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    /// length 为两端外接点之间的总长（包含两端半球）
    Capsule {
        center: Vec3,
        axis: CapsuleAxis,
        start_radius: f32,
        end_radius: f32,
        length: f32,
    },
}
