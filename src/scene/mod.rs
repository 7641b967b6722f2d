//! 场景图接口
//!
//! 核心设计思想：
//! - 场景节点、组件的生命周期全部由宿主管理
//! - 转换核心只通过 SceneHost 请求"创建节点 / 挂载组件 / 销毁对象"
//! - SceneArena: 内存中的宿主实现（测试与离线转换使用）

mod arena;
mod node;

pub use arena::{ClothEntry, SceneArena};
pub use node::SceneNode;

use glam::{Mat4, Quat, Vec3};

use crate::cloth::{BoneCloth, ClothCollider};
use crate::rig::{ColliderGroupId, ColliderId, JointId};
use crate::Result;

// ============================================================================
// 句柄
// ============================================================================

/// 场景节点句柄
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// 转换后碰撞体句柄（多个布料可共享同一个）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub usize);

/// 布料组件句柄
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClothHandle(pub usize);

/// 需要销毁的源对象
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceObject {
    Joint(JointId),
    Collider(ColliderId),
    ColliderGroup(ColliderGroupId),
}

// ============================================================================
// 变换
// ============================================================================

/// 节点本地变换
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl BoneTransform {
    /// 仅平移
    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Default::default() }
    }

    /// 平移 + 旋转
    #[inline]
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self { translation, rotation, scale: Vec3::ONE }
    }

    /// 转换为 4x4 矩阵
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

// ============================================================================
// 宿主接口
// ============================================================================

/// 宿主场景图
///
/// 查询接口只读；创建与销毁是有副作用的原语，由宿主自行管理内存。
pub trait SceneHost {
    /// 节点世界矩阵 (local_to_world)
    fn world_matrix(&self, node: NodeId) -> Mat4;

    /// 父节点
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// 节点名称
    fn node_name(&self, node: NodeId) -> &str;

    /// 在 parent 下创建子节点
    fn create_node(&mut self, name: String, parent: NodeId, local: BoneTransform) -> NodeId;

    /// 在节点上挂载转换后的碰撞体
    fn attach_collider(&mut self, node: NodeId, collider: ClothCollider) -> ColliderHandle;

    /// 在节点上挂载布料组件（不会自动构建）
    fn attach_cloth(&mut self, node: NodeId, cloth: BoneCloth) -> ClothHandle;

    /// 构建布料，一次性且不可逆
    fn build_cloth(&mut self, cloth: ClothHandle) -> Result<()>;

    /// 销毁源 SpringBone 对象
    fn destroy_source(&mut self, object: SourceObject);

    /// 节点世界位置
    #[inline]
    fn world_position(&self, node: NodeId) -> Vec3 {
        self.world_matrix(node).col(3).truncate()
    }
}
