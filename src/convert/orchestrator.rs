//! 转换流程
//!
//! Classify → {每个类别: 创建布料 → 转换碰撞体 → 构建} → 销毁源 SpringBone
//!
//! 转换是破坏性的一次性操作：完成后源链列表被清空，不能再次转换同一个模型。

use crate::config::{get_config, ConvertConfig};
use crate::rig::{ColliderGroupId, SpringBoneAvatar, SpringRig};
use crate::scene::{BoneTransform, ClothHandle, SceneHost, SourceObject};
use crate::Result;
use super::classify::{classify, ChainCategory};
use super::collider::ColliderConverter;
use super::params::{plan_grouped, plan_per_chain, ClothPlan};

/// 转换统计
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// 已构建的布料（按创建顺序）
    pub cloths: Vec<(ChainCategory, ClothHandle)>,
    /// 转换后的碰撞体数（去重后）
    pub converted_colliders: usize,
    pub destroyed_joints: usize,
    pub destroyed_colliders: usize,
    pub destroyed_collider_groups: usize,
}

impl ConversionReport {
    /// 某类别的布料数
    pub fn cloth_count(&self, category: ChainCategory) -> usize {
        self.cloths.iter().filter(|(c, _)| *c == category).count()
    }
}

/// 使用全局配置转换
pub fn convert<H: SceneHost>(
    avatar: &mut SpringBoneAvatar,
    host: &mut H,
) -> Result<ConversionReport> {
    convert_with_config(avatar, host, &get_config())
}

/// 将模型上的 SpringBone 转换为骨骼布料
///
/// 任何布料构建失败都会立即中止并返回错误：已构建的布料保留，源数据不会被销毁。
pub fn convert_with_config<H: SceneHost>(
    avatar: &mut SpringBoneAvatar,
    host: &mut H,
    config: &ConvertConfig,
) -> Result<ConversionReport> {
    let mut report = ConversionReport::default();
    if avatar.rig.springs.is_empty() {
        return Ok(report);
    }

    let classification = classify(&avatar.rig, &avatar.humanoid, host, config);
    let mut converter = ColliderConverter::new(config);

    for (category, springs) in classification.iter() {
        let plans = if category.is_per_chain() {
            plan_per_chain(&avatar.rig, springs, category, config)
        } else {
            plan_grouped(&avatar.rig, springs, host, config)
        };

        for plan in plans {
            let handle = build_cloth(avatar, plan, &mut converter, host, config)?;
            report.cloths.push((category, handle));
        }
    }
    report.converted_colliders = converter.len();

    destroy_source_rig(&mut avatar.rig, host, &mut report);

    log::info!(
        "SpringBone 转换完成: {} 布料 ({}头发 + {}对称 + {}布料), {} 碰撞体, \
         销毁 {} 关节 / {} 碰撞体 / {} 碰撞体组",
        report.cloths.len(),
        report.cloth_count(ChainCategory::Hair),
        report.cloth_count(ChainCategory::BilateralPair),
        report.cloth_count(ChainCategory::GenericCloth),
        report.converted_colliders,
        report.destroyed_joints,
        report.destroyed_colliders,
        report.destroyed_collider_groups,
    );

    Ok(report)
}

/// 创建布料节点、挂载碰撞体并构建
fn build_cloth<H: SceneHost>(
    avatar: &SpringBoneAvatar,
    plan: ClothPlan,
    converter: &mut ColliderConverter,
    host: &mut H,
    config: &ConvertConfig,
) -> Result<ClothHandle> {
    let ClothPlan { name, mut cloth, springs, .. } = plan;
    let node = host.create_node(name, avatar.root, BoneTransform::default());

    // 来源链引用的所有碰撞体组（去重）
    let mut groups: Vec<ColliderGroupId> = Vec::new();
    for spring in springs.iter().filter_map(|&id| avatar.rig.spring(id)) {
        for &group in &spring.collider_groups {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
    }

    let colliders = converter.convert(&avatar.rig, &groups, host)?;
    cloth.collision.colliders.extend(colliders);

    if config.debug_log {
        log::debug!(
            "[Convert] 布料 '{}': {} 根骨骼, {:?}, damping={:.3}, stiffness={:.3}, {} 碰撞体",
            host.node_name(node),
            cloth.root_bones.len(),
            cloth.connection,
            cloth.params.damping,
            cloth.params.angle_restoration_stiffness,
            cloth.collision.colliders.len()
        );
    }

    let handle = host.attach_cloth(node, cloth);
    host.build_cloth(handle)?;
    Ok(handle)
}

/// 销毁所有源关节 / 碰撞体 / 碰撞体组，并清空链列表
fn destroy_source_rig<H: SceneHost>(
    rig: &mut SpringRig,
    host: &mut H,
    report: &mut ConversionReport,
) {
    let springs = std::mem::take(&mut rig.springs);
    for spring in &springs {
        for &joint in &spring.joints {
            if rig.remove_joint(joint).is_some() {
                host.destroy_source(SourceObject::Joint(joint));
                report.destroyed_joints += 1;
            }
        }

        for &group_id in &spring.collider_groups {
            // 碰撞体组可能被多条链共享，只销毁一次
            let Some(group) = rig.remove_collider_group(group_id) else {
                continue;
            };
            for &collider in &group.colliders {
                if rig.remove_collider(collider).is_some() {
                    host.destroy_source(SourceObject::Collider(collider));
                    report.destroyed_colliders += 1;
                }
            }
            host.destroy_source(SourceObject::ColliderGroup(group_id));
            report.destroyed_collider_groups += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    use crate::cloth::ConnectionMode;
    use crate::rig::{Humanoid, SpringCollider, SpringJoint};
    use crate::scene::{NodeId, SceneArena};

    fn avatar() -> (SceneArena, SpringBoneAvatar) {
        let mut arena = SceneArena::new();
        let root = arena.add_node("avatar", None, BoneTransform::default());
        let at = |y: f32| BoneTransform::from_translation(Vec3::new(0.0, y, 0.0));
        let hips = arena.add_node("hips", Some(root), at(1.0));
        let chest = arena.add_node("chest", Some(hips), at(0.3));
        let head = arena.add_node("head", Some(chest), at(0.3));
        let humanoid = Humanoid { head, hips, chest: Some(chest), upper_chest: None };
        (arena, SpringBoneAvatar::new(root, humanoid, SpringRig::new()))
    }

    #[test]
    fn test_empty_rig_is_noop() {
        let (mut arena, mut avatar) = avatar();
        let nodes = arena.node_count();
        let config = ConvertConfig::default();
        let report = convert_with_config(&mut avatar, &mut arena, &config).unwrap();
        assert_eq!(report, ConversionReport::default());
        assert_eq!(arena.node_count(), nodes);
    }

    #[test]
    fn test_hair_chain_end_to_end() {
        let (mut arena, mut avatar) = avatar();
        let head = avatar.humanoid.head;
        let bone_local = BoneTransform::from_translation(Vec3::Y * 0.1);
        let bone = arena.add_node("hair_01", Some(head), bone_local);
        let tip_local = BoneTransform::from_translation(Vec3::Y * -0.1);
        let tip = arena.add_node("hair_02", Some(bone), tip_local);
        let root_joint = SpringJoint::new(bone, "hair_01").with_drag(0.5).with_stiffness(1.2);
        let j0 = avatar.rig.add_joint(root_joint);
        let j1 = avatar.rig.add_joint(SpringJoint::new(tip, "hair_02"));
        let sphere = SpringCollider::sphere(head, "head", Vec3::ZERO, 0.12);
        let collider = avatar.rig.add_collider(sphere);
        let group = avatar.rig.add_collider_group("head", vec![collider]);
        avatar.rig.add_spring("hair", vec![j0, j1], vec![group]);

        let config = ConvertConfig::default();
        let report = convert_with_config(&mut avatar, &mut arena, &config).unwrap();

        assert_eq!(report.cloths.len(), 1);
        let (category, handle) = report.cloths[0];
        assert_eq!(category, ChainCategory::Hair);

        let entry = arena.cloth(handle).unwrap();
        assert!(entry.built);
        assert_eq!(arena.node_name(entry.node), "Cloth_hair_01");
        assert_eq!(arena.parent(entry.node), Some(avatar.root));
        assert_eq!(entry.cloth.connection, ConnectionMode::Line);
        assert_eq!(entry.cloth.root_bones, vec![bone]);
        assert!((entry.cloth.params.damping - 0.4).abs() < 1e-6);
        assert!((entry.cloth.params.angle_restoration_stiffness - 0.6).abs() < 1e-6);
        assert_eq!(entry.cloth.collision.colliders.len(), 1);

        assert_eq!(report.destroyed_joints, 2);
        assert_eq!(report.destroyed_colliders, 1);
        assert_eq!(report.destroyed_collider_groups, 1);
        assert!(avatar.rig.is_cleared());
        assert_eq!(avatar.rig.live_joint_count(), 0);
        assert_eq!(avatar.rig.live_collider_count(), 0);
    }

    #[test]
    fn test_build_failure_keeps_source() {
        let (mut arena, mut avatar) = avatar();
        let head = avatar.humanoid.head;
        // 根骨骼不在场景中，构建失败
        let j = avatar.rig.add_joint(SpringJoint::new(NodeId(1000), "ghost"));
        let ok_local = BoneTransform::from_translation(Vec3::Y * 0.1);
        let ok_bone = arena.add_node("ok", Some(head), ok_local);
        let ok = avatar.rig.add_joint(SpringJoint::new(ok_bone, "ok"));
        avatar.rig.add_spring("ok", vec![ok], Vec::new());
        avatar.rig.add_spring("ghost", vec![j], Vec::new());

        let err = convert_with_config(&mut avatar, &mut arena, &ConvertConfig::default());
        assert_eq!(err, Err(crate::ConvertError::UnknownNode(NodeId(1000))));

        // 已构建的布料保留，源数据未销毁
        assert!(arena.cloths().iter().any(|c| c.built));
        assert_eq!(avatar.rig.springs.len(), 2);
        assert!(arena.destroyed().is_empty());
    }
}
