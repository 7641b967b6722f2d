//! 物理参数映射
//!
//! SpringBone 关节参数 → BoneCloth 参数：
//! - 头发 / 对称软体：每条链一个布料，只看根关节
//!   damping = drag * 0.8, stiffness = clamp01(stiffness * 0.5)
//! - 普通布料：按根关节的父骨骼合并，damping = drag * 0.2, stiffness = clamp01(stiffness * 0.25)

use glam::Vec3;

use crate::cloth::{BoneCloth, ClothParameters, ConnectionMode};
use crate::config::{ClothAggregation, ConvertConfig};
use crate::rig::{SpringId, SpringJoint, SpringRig};
use crate::scene::{NodeId, SceneHost};
use super::classify::ChainCategory;

/// 待创建的布料：参数已设置，碰撞体尚未转换
#[derive(Clone, Debug)]
pub struct ClothPlan {
    /// 布料节点名称
    pub name: String,
    pub category: ChainCategory,
    pub cloth: BoneCloth,
    /// 来源链（用于收集碰撞体组）
    pub springs: Vec<SpringId>,
}

fn map_parameters(
    gravity_direction: Vec3,
    gravity: f32,
    drag_force: f32,
    stiffness_force: f32,
    damping_scale: f32,
    stiffness_scale: f32,
    config: &ConvertConfig,
) -> ClothParameters {
    ClothParameters {
        gravity_direction,
        gravity,
        gravity_falloff: config.gravity_falloff,
        damping: drag_force * damping_scale,
        angle_restoration_stiffness: (stiffness_force * stiffness_scale).clamp(0.0, 1.0),
    }
}

/// 头发 / 对称软体参数
pub fn hair_parameters(root: &SpringJoint, config: &ConvertConfig) -> ClothParameters {
    map_parameters(
        root.gravity_dir,
        root.gravity_power,
        root.drag_force,
        root.stiffness_force,
        config.hair_damping_scale,
        config.hair_stiffness_scale,
        config,
    )
}

/// 普通布料参数（组内所有根关节，按 cloth_aggregation 合并）
///
/// roots 为空时返回 None。
pub fn cloth_parameters(roots: &[&SpringJoint], config: &ConvertConfig) -> Option<ClothParameters> {
    let first = *roots.first()?;

    let (gravity_dir, gravity_power, drag, stiffness) = match config.cloth_aggregation {
        ClothAggregation::FirstChain => (
            first.gravity_dir,
            first.gravity_power,
            first.drag_force,
            first.stiffness_force,
        ),
        ClothAggregation::Average => {
            let n = roots.len() as f32;
            let dir_sum: Vec3 = roots.iter().map(|j| j.gravity_dir).sum();
            let power = roots.iter().map(|j| j.gravity_power).sum::<f32>() / n;
            let drag = roots.iter().map(|j| j.drag_force).sum::<f32>() / n;
            let stiffness = roots.iter().map(|j| j.stiffness_force).sum::<f32>() / n;
            // 方向互相抵消时退回第一个
            let dir = dir_sum.try_normalize().unwrap_or(first.gravity_dir);
            (dir, power, drag, stiffness)
        }
    };

    Some(map_parameters(
        gravity_dir,
        gravity_power,
        drag,
        stiffness,
        config.cloth_damping_scale,
        config.cloth_stiffness_scale,
        config,
    ))
}

/// 头发 / 对称软体：每条非空链一个 Line 布料
pub fn plan_per_chain(
    rig: &SpringRig,
    springs: &[SpringId],
    category: ChainCategory,
    config: &ConvertConfig,
) -> Vec<ClothPlan> {
    springs
        .iter()
        .filter_map(|&id| {
            let root = rig.root_joint(id)?;
            let mut cloth = BoneCloth::new(ConnectionMode::Line, hair_parameters(root, config));
            cloth.root_bones.push(root.node);
            Some(ClothPlan {
                name: format!("Cloth_{}", root.name),
                category,
                cloth,
                springs: vec![id],
            })
        })
        .collect()
}

/// 普通布料：根关节父骨骼相同的链合并为一个 AutomaticMesh 布料
///
/// 组顺序为父骨骼首次出现的顺序，组内链保持原顺序。
pub fn plan_grouped<H: SceneHost>(
    rig: &SpringRig,
    springs: &[SpringId],
    host: &H,
    config: &ConvertConfig,
) -> Vec<ClothPlan> {
    let mut groups: Vec<(Option<NodeId>, Vec<SpringId>)> = Vec::new();
    for &id in springs {
        let Some(root) = rig.root_joint(id) else {
            continue;
        };
        let parent = host.parent(root.node);
        match groups.iter_mut().find(|(key, _)| *key == parent) {
            Some((_, members)) => members.push(id),
            None => groups.push((parent, vec![id])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(parent, members)| {
            let roots: Vec<&SpringJoint> =
                members.iter().filter_map(|&id| rig.root_joint(id)).collect();
            let params = cloth_parameters(&roots, config)?;

            let mut cloth = BoneCloth::new(ConnectionMode::AutomaticMesh, params);
            cloth.root_bones.extend(roots.iter().map(|j| j.node));

            let name = match parent {
                Some(p) => format!("Cloth_{}", host.node_name(p)),
                None => format!("Cloth_{}", roots[0].name),
            };

            Some(ClothPlan {
                name,
                category: ChainCategory::GenericCloth,
                cloth,
                springs: members,
            })
        })
        .collect()
}
