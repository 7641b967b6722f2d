//! SpringBone 碰撞体

use glam::Vec3;

use crate::scene::NodeId;
use super::ColliderId;

/// 碰撞体类型（VRM 1.0 SpringBone 扩展）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpringColliderType {
    Sphere,
    Capsule,
    Plane,
    SphereInside,
    CapsuleInside,
    /// 无法识别的类型码
    Unknown(i32),
}

impl SpringColliderType {
    /// 从宿主的原始类型码转换
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => SpringColliderType::Sphere,
            1 => SpringColliderType::Capsule,
            2 => SpringColliderType::Plane,
            3 => SpringColliderType::SphereInside,
            4 => SpringColliderType::CapsuleInside,
            other => SpringColliderType::Unknown(other),
        }
    }
}

/// SpringBone 碰撞体
#[derive(Clone, Debug)]
pub struct SpringCollider {
    /// 所在骨骼
    pub node: NodeId,
    pub name: String,
    pub kind: SpringColliderType,
    /// 骨骼局部空间中的中心（胶囊体起点）
    pub offset: Vec3,
    /// 胶囊体终点（骨骼局部空间）
    pub tail: Vec3,
    pub radius: f32,
}

impl SpringCollider {
    pub fn sphere(node: NodeId, name: impl Into<String>, offset: Vec3, radius: f32) -> Self {
        Self {
            node,
            name: name.into(),
            kind: SpringColliderType::Sphere,
            offset,
            tail: offset,
            radius,
        }
    }

    pub fn capsule(
        node: NodeId,
        name: impl Into<String>,
        offset: Vec3,
        tail: Vec3,
        radius: f32,
    ) -> Self {
        Self {
            node,
            name: name.into(),
            kind: SpringColliderType::Capsule,
            offset,
            tail,
            radius,
        }
    }
}

/// 碰撞体组
#[derive(Clone, Debug, Default)]
pub struct ColliderGroup {
    pub name: String,
    pub colliders: Vec<ColliderId>,
}
