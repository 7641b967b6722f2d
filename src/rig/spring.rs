//! SpringBone 链与关节
//!
//! SpringRig 以槽位数组保存关节 / 碰撞体 / 碰撞体组，
//! ID 即下标；销毁后槽位置空，ID 不会复用。

use glam::Vec3;

use crate::scene::NodeId;
use super::collider::{ColliderGroup, SpringCollider};
use super::{ColliderGroupId, ColliderId, JointId, SpringId};

/// SpringBone 关节
#[derive(Clone, Debug)]
pub struct SpringJoint {
    /// 关节骨骼
    pub node: NodeId,
    pub name: String,
    /// 重力方向（单位向量）
    pub gravity_dir: Vec3,
    /// 重力大小
    pub gravity_power: f32,
    /// 空气阻力 [0, 1]
    pub drag_force: f32,
    /// 刚度 [0, 1]
    pub stiffness_force: f32,
}

impl SpringJoint {
    pub fn new(node: NodeId, name: impl Into<String>) -> Self {
        Self {
            node,
            name: name.into(),
            gravity_dir: Vec3::NEG_Y,
            gravity_power: 0.0,
            drag_force: 0.5,
            stiffness_force: 1.0,
        }
    }

    pub fn with_gravity(mut self, dir: Vec3, power: f32) -> Self {
        self.gravity_dir = dir;
        self.gravity_power = power;
        self
    }

    pub fn with_drag(mut self, drag_force: f32) -> Self {
        self.drag_force = drag_force;
        self
    }

    pub fn with_stiffness(mut self, stiffness_force: f32) -> Self {
        self.stiffness_force = stiffness_force;
        self
    }
}

/// 一条 SpringBone 链，第一个关节为根
#[derive(Clone, Debug, Default)]
pub struct Spring {
    pub name: String,
    pub joints: Vec<JointId>,
    pub collider_groups: Vec<ColliderGroupId>,
}

impl Spring {
    #[inline]
    pub fn root_joint(&self) -> Option<JointId> {
        self.joints.first().copied()
    }
}

/// SpringBone 数据
#[derive(Clone, Debug, Default)]
pub struct SpringRig {
    joints: Vec<Option<SpringJoint>>,
    colliders: Vec<Option<SpringCollider>>,
    collider_groups: Vec<Option<ColliderGroup>>,
    /// 链列表（转换后清空）
    pub springs: Vec<Spring>,
}

impl SpringRig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================
    // 构建
    // ========================================

    pub fn add_joint(&mut self, joint: SpringJoint) -> JointId {
        self.joints.push(Some(joint));
        JointId(self.joints.len() - 1)
    }

    pub fn add_collider(&mut self, collider: SpringCollider) -> ColliderId {
        self.colliders.push(Some(collider));
        ColliderId(self.colliders.len() - 1)
    }

    pub fn add_collider_group(
        &mut self,
        name: impl Into<String>,
        colliders: Vec<ColliderId>,
    ) -> ColliderGroupId {
        self.collider_groups.push(Some(ColliderGroup { name: name.into(), colliders }));
        ColliderGroupId(self.collider_groups.len() - 1)
    }

    pub fn add_spring(
        &mut self,
        name: impl Into<String>,
        joints: Vec<JointId>,
        collider_groups: Vec<ColliderGroupId>,
    ) -> SpringId {
        self.springs.push(Spring { name: name.into(), joints, collider_groups });
        SpringId(self.springs.len() - 1)
    }

    // ========================================
    // 访问
    // ========================================

    pub fn joint(&self, id: JointId) -> Option<&SpringJoint> {
        self.joints.get(id.0).and_then(Option::as_ref)
    }

    pub fn collider(&self, id: ColliderId) -> Option<&SpringCollider> {
        self.colliders.get(id.0).and_then(Option::as_ref)
    }

    pub fn collider_group(&self, id: ColliderGroupId) -> Option<&ColliderGroup> {
        self.collider_groups.get(id.0).and_then(Option::as_ref)
    }

    pub fn spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id.0)
    }

    /// 链的根关节
    pub fn root_joint(&self, id: SpringId) -> Option<&SpringJoint> {
        self.spring(id)
            .and_then(Spring::root_joint)
            .and_then(|j| self.joint(j))
    }

    /// 所有链 ID（按顺序）
    pub fn spring_ids(&self) -> impl Iterator<Item = SpringId> {
        (0..self.springs.len()).map(SpringId)
    }

    // ========================================
    // 销毁
    // ========================================

    pub fn remove_joint(&mut self, id: JointId) -> Option<SpringJoint> {
        self.joints.get_mut(id.0).and_then(Option::take)
    }

    pub fn remove_collider(&mut self, id: ColliderId) -> Option<SpringCollider> {
        self.colliders.get_mut(id.0).and_then(Option::take)
    }

    pub fn remove_collider_group(&mut self, id: ColliderGroupId) -> Option<ColliderGroup> {
        self.collider_groups.get_mut(id.0).and_then(Option::take)
    }

    /// 存活的关节数
    pub fn live_joint_count(&self) -> usize {
        self.joints.iter().filter(|j| j.is_some()).count()
    }

    /// 存活的碰撞体数
    pub fn live_collider_count(&self) -> usize {
        self.colliders.iter().filter(|c| c.is_some()).count()
    }

    /// 链列表已清空，且从链可达的对象都已销毁
    pub fn is_cleared(&self) -> bool {
        self.springs.is_empty()
    }
}
