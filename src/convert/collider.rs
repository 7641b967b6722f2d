//! 碰撞体转换
//!
//! SpringBone 碰撞体 (offset + tail + radius) → 布料碰撞体 (center + size + 朝向)。
//! 转换结果按源碰撞体缓存，被多条链引用的碰撞体只转换一次，
//! 各布料共享同一个句柄。

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::cloth::{CapsuleAxis, ClothCollider};
use crate::config::ConvertConfig;
use crate::rig::{ColliderGroupId, ColliderId, SpringCollider, SpringColliderType, SpringRig};
use crate::scene::{BoneTransform, ColliderHandle, SceneHost};
use crate::{ConvertError, Result};

/// 胶囊体转换结果：节点本地变换 + 碰撞体
///
/// SpringBone 胶囊体以两端球心定义，总长不含两端半球；
/// 布料胶囊体的 length 是两端外接点之间的长度，因此需要加上 2 * radius。
pub fn capsule_shape(
    collider: &SpringCollider,
    bone_world: Mat4,
    min_length: f32,
) -> (BoneTransform, ClothCollider) {
    let radius = collider.radius;
    let midpoint = (collider.offset + collider.tail) * 0.5;

    let offset_world = bone_world.transform_point3(collider.offset);
    let tail_world = bone_world.transform_point3(collider.tail);
    let distance = offset_world.distance(tail_world);

    let (rotation, length) = if distance > min_length {
        let rotation = (collider.tail - collider.offset)
            .try_normalize()
            .map(|dir| Quat::from_rotation_arc(Vec3::Y, dir))
            .unwrap_or(Quat::IDENTITY);
        (rotation, distance + radius * 2.0)
    } else {
        (Quat::IDENTITY, radius * 2.0)
    };

    let local = BoneTransform::from_rotation_translation(rotation, midpoint);
    let shape = ClothCollider::Capsule {
        center: Vec3::ZERO,
        axis: CapsuleAxis::Y,
        start_radius: radius,
        end_radius: radius,
        length,
    };
    (local, shape)
}

/// 球体转换（Plane / SphereInside 也近似为球体）
pub fn sphere_shape(collider: &SpringCollider) -> (BoneTransform, ClothCollider) {
    (
        BoneTransform::default(),
        ClothCollider::Sphere { center: collider.offset, radius: collider.radius },
    )
}

/// 碰撞体转换器（单次转换内有效的缓存）
#[derive(Debug)]
pub struct ColliderConverter {
    cache: HashMap<ColliderId, ColliderHandle>,
    capsule_min_length: f32,
}

impl ColliderConverter {
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            cache: HashMap::new(),
            capsule_min_length: config.capsule_min_length,
        }
    }

    /// 已转换的碰撞体数
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// 查询缓存
    pub fn get(&self, id: ColliderId) -> Option<ColliderHandle> {
        self.cache.get(&id).copied()
    }

    /// 转换碰撞体组中的所有碰撞体
    ///
    /// 返回顺序与输入一致，重复的碰撞体只出现一次。
    pub fn convert<H: SceneHost>(
        &mut self,
        rig: &SpringRig,
        groups: &[ColliderGroupId],
        host: &mut H,
    ) -> Result<Vec<ColliderHandle>> {
        let mut handles: Vec<ColliderHandle> = Vec::new();
        for &group_id in groups {
            let Some(group) = rig.collider_group(group_id) else {
                continue;
            };
            for &collider_id in &group.colliders {
                let Some(collider) = rig.collider(collider_id) else {
                    continue;
                };
                let handle = self.convert_collider(collider_id, collider, host)?;
                if !handles.contains(&handle) {
                    handles.push(handle);
                }
            }
        }
        Ok(handles)
    }

    /// 转换单个碰撞体（命中缓存时直接返回）
    pub fn convert_collider<H: SceneHost>(
        &mut self,
        id: ColliderId,
        collider: &SpringCollider,
        host: &mut H,
    ) -> Result<ColliderHandle> {
        if let Some(handle) = self.cache.get(&id) {
            return Ok(*handle);
        }

        // 先判定类型，失败时不创建任何节点
        let (prefix, local, shape) = match collider.kind {
            SpringColliderType::Sphere
            | SpringColliderType::Plane
            | SpringColliderType::SphereInside => {
                let (local, shape) = sphere_shape(collider);
                ("SphereCollider", local, shape)
            }
            SpringColliderType::Capsule | SpringColliderType::CapsuleInside => {
                let bone_world = host.world_matrix(collider.node);
                let (local, shape) = capsule_shape(collider, bone_world, self.capsule_min_length);
                ("CapsuleCollider", local, shape)
            }
            SpringColliderType::Unknown(code) => {
                return Err(ConvertError::UnsupportedCollider { name: collider.name.clone(), code });
            }
        };

        let node = host.create_node(format!("{}_{}", prefix, collider.name), collider.node, local);
        let handle = host.attach_collider(node, shape);
        self.cache.insert(id, handle);
        Ok(handle)
    }
}
