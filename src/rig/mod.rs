//! 源 SpringBone 数据
//!
//! - Humanoid: 人形骨骼的地标骨骼
//! - SpringRig: 链 / 关节 / 碰撞体
//! - SpringBoneAvatar: 转换入口的根对象

mod collider;
mod spring;

pub use collider::{ColliderGroup, SpringCollider, SpringColliderType};
pub use spring::{Spring, SpringJoint, SpringRig};

use crate::scene::NodeId;

// ============================================================================
// ID
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderGroupId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpringId(pub usize);

// ============================================================================
// 人形骨骼
// ============================================================================

/// 人形地标骨骼（只读，由宿主持有）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Humanoid {
    pub head: NodeId,
    pub hips: NodeId,
    pub chest: Option<NodeId>,
    pub upper_chest: Option<NodeId>,
}

impl Humanoid {
    /// 胸部链的父骨骼：优先 UpperChest，否则 Chest
    #[inline]
    pub fn breast_root(&self) -> Option<NodeId> {
        self.upper_chest.or(self.chest)
    }
}

/// 转换入口：带人形骨骼和 SpringBone 的模型根对象
#[derive(Clone, Debug)]
pub struct SpringBoneAvatar {
    /// 模型根节点，生成的布料节点挂在其下
    pub root: NodeId,
    pub humanoid: Humanoid,
    pub rig: SpringRig,
}

impl SpringBoneAvatar {
    pub fn new(root: NodeId, humanoid: Humanoid, rig: SpringRig) -> Self {
        Self { root, humanoid, rig }
    }
}
