//! 内存场景图
//!
//! SceneHost 的参考实现：节点、碰撞体、布料都存放在 Vec 中，句柄即索引。

use glam::Mat4;

use super::{BoneTransform, ClothHandle, ColliderHandle, NodeId, SceneHost, SceneNode, SourceObject};
use crate::cloth::{BoneCloth, ClothCollider};
use crate::{ConvertError, Result};

/// 挂载在节点上的布料组件
#[derive(Clone, Debug)]
pub struct ClothEntry {
    pub node: NodeId,
    pub cloth: BoneCloth,
    /// 是否已构建
    pub built: bool,
}

/// 内存场景图
#[derive(Clone, Debug, Default)]
pub struct SceneArena {
    nodes: Vec<SceneNode>,
    colliders: Vec<(NodeId, ClothCollider)>,
    cloths: Vec<ClothEntry>,
    destroyed: Vec<SourceObject>,
}

impl SceneArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加节点
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: BoneTransform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode::new(name, parent, local));
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 通过名称查找节点
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// 直接子节点
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.parent == Some(id))
            .map(|(i, _)| NodeId(i))
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&ClothCollider> {
        self.colliders.get(handle.0).map(|(_, c)| c)
    }

    /// 碰撞体所在节点
    pub fn collider_node(&self, handle: ColliderHandle) -> Option<NodeId> {
        self.colliders.get(handle.0).map(|(n, _)| *n)
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn cloth(&self, handle: ClothHandle) -> Option<&ClothEntry> {
        self.cloths.get(handle.0)
    }

    pub fn cloths(&self) -> &[ClothEntry] {
        &self.cloths
    }

    /// 已销毁的源对象（按销毁顺序）
    pub fn destroyed(&self) -> &[SourceObject] {
        &self.destroyed
    }

    /// 世界矩阵，父链上任一节点不存在时返回 UnknownNode
    pub fn try_world_matrix(&self, node: NodeId) -> Result<Mat4> {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(node);
        // 防止父链成环
        let mut remaining = self.nodes.len();
        while let Some(id) = current {
            let n = self.nodes.get(id.0).ok_or(ConvertError::UnknownNode(id))?;
            if remaining == 0 {
                log::warn!("[Scene] 节点 {:?} 的父链存在环", node);
                break;
            }
            remaining -= 1;
            matrix = n.local_to_parent() * matrix;
            current = n.parent;
        }
        Ok(matrix)
    }
}

impl SceneHost for SceneArena {
    fn world_matrix(&self, node: NodeId) -> Mat4 {
        self.try_world_matrix(node).unwrap_or_else(|e| {
            log::warn!("[Scene] {}，按单位矩阵处理", e);
            Mat4::IDENTITY
        })
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn node_name(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map(|n| n.name.as_str()).unwrap_or("")
    }

    fn create_node(&mut self, name: String, parent: NodeId, local: BoneTransform) -> NodeId {
        self.add_node(name, Some(parent), local)
    }

    fn attach_collider(&mut self, node: NodeId, collider: ClothCollider) -> ColliderHandle {
        let handle = ColliderHandle(self.colliders.len());
        self.colliders.push((node, collider));
        handle
    }

    fn attach_cloth(&mut self, node: NodeId, cloth: BoneCloth) -> ClothHandle {
        let handle = ClothHandle(self.cloths.len());
        self.cloths.push(ClothEntry { node, cloth, built: false });
        handle
    }

    fn build_cloth(&mut self, handle: ClothHandle) -> Result<()> {
        let Some(entry) = self.cloths.get(handle.0) else {
            return Err(ConvertError::ClothBuild {
                cloth: format!("{:?}", handle),
                reason: "cloth handle does not exist".to_string(),
            });
        };
        let cloth_name = self.node_name(entry.node).to_string();
        let fail = |reason: String| ConvertError::ClothBuild {
            cloth: cloth_name.clone(),
            reason,
        };

        if entry.built {
            return Err(fail("cloth is already built".to_string()));
        }
        if entry.cloth.root_bones.is_empty() {
            return Err(fail("cloth has no root bones".to_string()));
        }
        if let Some(&bone) = entry.cloth.root_bones.iter().find(|b| b.0 >= self.nodes.len()) {
            return Err(ConvertError::UnknownNode(bone));
        }
        for &collider in &entry.cloth.collision.colliders {
            if collider.0 >= self.colliders.len() {
                return Err(fail(format!("collider {:?} does not exist", collider)));
            }
        }

        self.cloths[handle.0].built = true;
        Ok(())
    }

    fn destroy_source(&mut self, object: SourceObject) {
        self.destroyed.push(object);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_world_matrix_follows_parent_chain() {
        let mut arena = SceneArena::new();
        let root_local = BoneTransform::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let root = arena.add_node("root", None, root_local);
        let child = arena.add_node(
            "child",
            Some(root),
            BoneTransform::from_rotation_translation(
                Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                Vec3::new(0.0, 0.5, 0.0),
            ),
        );
        let leaf_local = BoneTransform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let leaf = arena.add_node("leaf", Some(child), leaf_local);

        let pos = arena.world_position(leaf);
        // 绕 Y 旋转 90° 后 +X 变为 -Z
        assert!((pos - Vec3::new(0.0, 1.5, -1.0)).length() < 1e-5);
        assert_eq!(arena.parent(leaf), Some(child));
        assert_eq!(arena.children(root).collect::<Vec<_>>(), vec![child]);
    }

    #[test]
    fn test_missing_node_is_unknown() {
        let mut arena = SceneArena::new();
        let root = arena.add_node("root", None, BoneTransform::default());
        // 父节点指向不存在的句柄
        let orphan = arena.add_node("orphan", Some(NodeId(7)), BoneTransform::default());

        assert!(arena.try_world_matrix(root).is_ok());
        assert_eq!(arena.try_world_matrix(NodeId(42)), Err(ConvertError::UnknownNode(NodeId(42))));
        assert_eq!(arena.try_world_matrix(orphan), Err(ConvertError::UnknownNode(NodeId(7))));
        assert_eq!(arena.world_matrix(NodeId(42)), Mat4::IDENTITY);
    }

    #[test]
    fn test_build_cloth_once() {
        let mut arena = SceneArena::new();
        let root = arena.add_node("root", None, BoneTransform::default());
        let bone = arena.add_node("bone", Some(root), BoneTransform::default());

        let mut cloth = BoneCloth::default();
        cloth.root_bones.push(bone);
        let handle = arena.attach_cloth(root, cloth);

        assert!(arena.build_cloth(handle).is_ok());
        assert!(arena.cloth(handle).map(|c| c.built).unwrap_or(false));
        assert!(matches!(arena.build_cloth(handle), Err(ConvertError::ClothBuild { .. })));
    }

    #[test]
    fn test_build_cloth_rejects_bad_input() {
        let mut arena = SceneArena::new();
        let root = arena.add_node("root", None, BoneTransform::default());

        let empty = arena.attach_cloth(root, BoneCloth::default());
        assert!(arena.build_cloth(empty).is_err());

        let mut dangling = BoneCloth::default();
        dangling.root_bones.push(NodeId(99));
        let dangling = arena.attach_cloth(root, dangling);
        assert_eq!(arena.build_cloth(dangling), Err(ConvertError::UnknownNode(NodeId(99))));

        let mut bad_collider = BoneCloth::default();
        bad_collider.root_bones.push(root);
        bad_collider.collision.colliders.push(ColliderHandle(3));
        let bad_collider = arena.attach_cloth(root, bad_collider);
        assert!(arena.build_cloth(bad_collider).is_err());
    }
}
