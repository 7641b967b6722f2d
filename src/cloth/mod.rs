//! 骨骼布料 (BoneCloth) 数据
//!
//! 转换的输出：每个 BoneCloth 持有若干根骨骼、连接方式、物理参数和碰撞约束。

mod collider;

pub use collider::{CapsuleAxis, ClothCollider};

use glam::Vec3;

use crate::scene::{ColliderHandle, NodeId};

/// 骨骼连接方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    /// 每条链独立成线
    #[default]
    Line,
    /// 相邻链自动连接成网格
    AutomaticMesh,
}

/// 碰撞检测方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CollisionMode {
    None,
    Point,
    #[default]
    Edge,
}

/// 布料物理参数
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClothParameters {
    /// 重力方向
    pub gravity_direction: Vec3,
    /// 重力大小
    pub gravity: f32,
    /// 重力衰减
    pub gravity_falloff: f32,
    /// 阻尼
    pub damping: f32,
    /// 角度恢复刚度 [0, 1]
    pub angle_restoration_stiffness: f32,
}

impl Default for ClothParameters {
    fn default() -> Self {
        Self {
            gravity_direction: Vec3::NEG_Y,
            gravity: 0.0,
            gravity_falloff: 1.0,
            damping: 0.0,
            angle_restoration_stiffness: 0.0,
        }
    }
}

/// 碰撞体碰撞约束
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColliderCollisionConstraint {
    pub mode: CollisionMode,
    /// 参与碰撞的碰撞体（可与其他布料共享）
    pub colliders: Vec<ColliderHandle>,
}

/// 骨骼布料组件
///
/// 自动构建始终关闭，由宿主在 build_cloth 时一次性构建。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoneCloth {
    /// 根骨骼列表
    pub root_bones: Vec<NodeId>,
    /// 连接方式
    pub connection: ConnectionMode,
    /// 物理参数
    pub params: ClothParameters,
    /// 碰撞约束
    pub collision: ColliderCollisionConstraint,
}

impl BoneCloth {
    pub fn new(connection: ConnectionMode, params: ClothParameters) -> Self {
        Self {
            root_bones: Vec::new(),
            connection,
            params,
            collision: ColliderCollisionConstraint {
                mode: CollisionMode::Edge,
                colliders: Vec::new(),
            },
        }
    }
}
