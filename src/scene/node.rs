//! 场景节点
//!
//! 每个节点只保存本地变换，世界变换由父链计算：
//! local_to_world = parent.local_to_world * local_to_parent

use glam::Mat4;

use super::{BoneTransform, NodeId};

/// 场景节点
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// 节点名称
    pub name: String,

    /// 父节点 (None 表示根节点)
    pub parent: Option<NodeId>,

    /// 本地变换 (local_to_parent)
    pub local: BoneTransform,
}

impl SceneNode {
    /// 创建新节点
    pub fn new(name: impl Into<String>, parent: Option<NodeId>, local: BoneTransform) -> Self {
        Self {
            name: name.into(),
            parent,
            local,
        }
    }

    /// 本地矩阵
    #[inline]
    pub fn local_to_parent(&self) -> Mat4 {
        self.local.to_matrix()
    }
}
