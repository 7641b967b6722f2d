//! 链分类
//!
//! 按人形地标把每条非空链归入 {Hair, BilateralPair, GenericCloth} 之一：
//! 1. 根关节高度 >= Head 高度 → Hair
//! 2. 根关节是胸部配对中的一侧 → BilateralPair
//! 3. 其余 → GenericCloth

use glam::Vec3;

use crate::config::ConvertConfig;
use crate::rig::{Humanoid, SpringId, SpringRig};
use crate::scene::{NodeId, SceneHost};
use super::pairing::{select_best_pair, PairingParams, SymmetricPair};

/// 链类别
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainCategory {
    Hair = 0,
    BilateralPair = 1,
    GenericCloth = 2,
}

impl ChainCategory {
    /// 固定顺序
    pub const ALL: [ChainCategory; 3] = [
        ChainCategory::Hair,
        ChainCategory::BilateralPair,
        ChainCategory::GenericCloth,
    ];

    /// 每条链单独生成一个布料
    #[inline]
    pub fn is_per_chain(self) -> bool {
        matches!(self, ChainCategory::Hair | ChainCategory::BilateralPair)
    }
}

/// 分类结果：三个类别总是存在（可能为空）
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainClassification {
    groups: [Vec<SpringId>; 3],
    /// 检测到的胸部配对
    pub bilateral_pair: Option<SymmetricPair<NodeId>>,
}

impl ChainClassification {
    #[inline]
    pub fn get(&self, category: ChainCategory) -> &[SpringId] {
        &self.groups[category as usize]
    }

    #[inline]
    pub fn push(&mut self, category: ChainCategory, spring: SpringId) {
        self.groups[category as usize].push(spring);
    }

    /// 按固定顺序遍历 (类别, 链)
    pub fn iter(&self) -> impl Iterator<Item = (ChainCategory, &[SpringId])> + '_ {
        ChainCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// 已分类的链总数
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 胸部候选：父骨骼为 breast_root 的根关节骨骼（去重，保持顺序）
fn breast_candidates<H: SceneHost>(
    rig: &SpringRig,
    humanoid: &Humanoid,
    host: &H,
) -> Vec<(NodeId, Vec3)> {
    let Some(breast_root) = humanoid.breast_root() else {
        return Vec::new();
    };

    let mut candidates: Vec<(NodeId, Vec3)> = Vec::new();
    for id in rig.spring_ids() {
        let Some(root) = rig.root_joint(id) else {
            continue;
        };
        if host.parent(root.node) != Some(breast_root) {
            continue;
        }
        if candidates.iter().any(|(n, _)| *n == root.node) {
            continue;
        }
        candidates.push((root.node, host.world_position(root.node)));
    }
    candidates
}

/// 分类所有链
pub fn classify<H: SceneHost>(
    rig: &SpringRig,
    humanoid: &Humanoid,
    host: &H,
    config: &ConvertConfig,
) -> ChainClassification {
    let candidates = breast_candidates(rig, humanoid, host);
    let bilateral_pair = select_best_pair(
        &candidates,
        host.world_matrix(humanoid.hips),
        &PairingParams::from(config),
    );

    if config.debug_log {
        match bilateral_pair {
            Some(pair) => log::debug!(
                "[Classify] 胸部配对: left='{}', right='{}'",
                host.node_name(pair.left()),
                host.node_name(pair.right())
            ),
            None if candidates.len() >= 2 => {
                log::debug!("[Classify] {} 个胸部候选中没有找到配对", candidates.len())
            }
            None => {}
        }
    }

    let head_y = host.world_position(humanoid.head).y;

    let mut result = ChainClassification { bilateral_pair, ..Default::default() };
    for id in rig.spring_ids() {
        let Some(root) = rig.root_joint(id) else {
            if config.debug_log {
                log::warn!("[Classify] 链 {:?} 没有关节，跳过", id);
            }
            continue;
        };

        let category = if host.world_position(root.node).y >= head_y {
            ChainCategory::Hair
        } else if bilateral_pair.is_some_and(|p| p.contains(root.node)) {
            ChainCategory::BilateralPair
        } else {
            ChainCategory::GenericCloth
        };
        result.push(category, id);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::SpringJoint;
    use crate::scene::{BoneTransform, SceneArena};

    struct Fixture {
        arena: SceneArena,
        humanoid: Humanoid,
        rig: SpringRig,
        upper_chest: NodeId,
        hips: NodeId,
    }

    fn fixture() -> Fixture {
        let mut arena = SceneArena::new();
        let root = arena.add_node("root", None, BoneTransform::default());
        let at = |y: f32| BoneTransform::from_translation(Vec3::new(0.0, y, 0.0));
        let hips = arena.add_node("hips", Some(root), at(1.0));
        let chest = arena.add_node("chest", Some(hips), at(0.2));
        let upper_chest = arena.add_node("upper_chest", Some(chest), at(0.1));
        let head = arena.add_node("head", Some(upper_chest), at(0.3));
        Fixture {
            arena,
            humanoid: Humanoid { head, hips, chest: Some(chest), upper_chest: Some(upper_chest) },
            rig: SpringRig::new(),
            upper_chest,
            hips,
        }
    }

    fn add_chain(f: &mut Fixture, name: &str, parent: NodeId, pos: Vec3) -> SpringId {
        let node = f.arena.add_node(name, Some(parent), BoneTransform::from_translation(pos));
        let joint = f.rig.add_joint(SpringJoint::new(node, name));
        f.rig.add_spring(name, vec![joint], Vec::new())
    }

    #[test]
    fn test_all_categories_present() {
        let f = fixture();
        let result = classify(&f.rig, &f.humanoid, &f.arena, &ConvertConfig::default());
        for category in ChainCategory::ALL {
            assert!(result.get(category).is_empty());
        }
        assert_eq!(result.iter().count(), 3);
        assert!(result.bilateral_pair.is_none());
    }

    #[test]
    fn test_classify_hair_breast_cloth() {
        let mut f = fixture();
        let head = f.humanoid.head;
        let hair = add_chain(&mut f, "hair", head, Vec3::new(0.0, 0.05, 0.0));
        let upper_chest = f.upper_chest;
        let breast_l = add_chain(&mut f, "breast_l", upper_chest, Vec3::new(0.08, 0.0, 0.1));
        let breast_r = add_chain(&mut f, "breast_r", upper_chest, Vec3::new(-0.08, 0.0, 0.1));
        let hips = f.hips;
        let skirt = add_chain(&mut f, "skirt", hips, Vec3::new(0.1, -0.1, 0.1));
        let empty = f.rig.add_spring("empty", Vec::new(), Vec::new());

        let result = classify(&f.rig, &f.humanoid, &f.arena, &ConvertConfig::default());
        assert_eq!(result.get(ChainCategory::Hair), &[hair]);
        assert_eq!(result.get(ChainCategory::BilateralPair), &[breast_l, breast_r]);
        assert_eq!(result.get(ChainCategory::GenericCloth), &[skirt]);
        assert_eq!(result.len(), 4);
        assert!(ChainCategory::ALL.iter().all(|c| !result.get(*c).contains(&empty)));

        let pair = result.bilateral_pair.unwrap();
        assert_eq!(f.arena.node_name(pair.left()), "breast_l");
        assert_eq!(f.arena.node_name(pair.right()), "breast_r");

        // 再次分类结果一致
        assert_eq!(result, classify(&f.rig, &f.humanoid, &f.arena, &ConvertConfig::default()));
    }

    #[test]
    fn test_head_height_is_inclusive() {
        let mut f = fixture();
        let head = f.humanoid.head;
        // 与 Head 同高（向侧面偏移），算作头发
        let level = add_chain(&mut f, "level", head, Vec3::new(0.1, 0.0, 0.0));
        let below = add_chain(&mut f, "below", head, Vec3::new(0.1, -0.001, 0.0));

        let head_y = f.arena.world_position(head).y;
        let level_node = f.rig.root_joint(level).unwrap().node;
        assert_eq!(f.arena.world_position(level_node).y, head_y);

        let result = classify(&f.rig, &f.humanoid, &f.arena, &ConvertConfig::default());
        assert_eq!(result.get(ChainCategory::Hair), &[level]);
        assert_eq!(result.get(ChainCategory::GenericCloth), &[below]);
    }

    #[test]
    fn test_breast_root_falls_back_to_chest() {
        let mut f = fixture();
        f.humanoid.upper_chest = None;
        let chest = f.humanoid.chest.unwrap();
        let a = add_chain(&mut f, "a", chest, Vec3::new(0.08, 0.05, 0.1));
        let b = add_chain(&mut f, "b", chest, Vec3::new(-0.08, 0.05, 0.1));
        // 挂在 UpperChest 下的不算候选
        let upper_chest = f.upper_chest;
        let c = add_chain(&mut f, "c", upper_chest, Vec3::new(0.08, 0.0, 0.1));

        let result = classify(&f.rig, &f.humanoid, &f.arena, &ConvertConfig::default());
        assert_eq!(result.get(ChainCategory::BilateralPair), &[a, b]);
        assert_eq!(result.get(ChainCategory::GenericCloth), &[c]);
    }

    #[test]
    fn test_shared_root_bone_is_one_candidate() {
        let mut f = fixture();
        let upper_chest = f.upper_chest;
        let local = BoneTransform::from_translation(Vec3::new(0.08, 0.0, 0.1));
        let node = f.arena.add_node("breast_l", Some(upper_chest), local);
        let j1 = f.rig.add_joint(SpringJoint::new(node, "breast_l"));
        let j2 = f.rig.add_joint(SpringJoint::new(node, "breast_l_dup"));
        let s1 = f.rig.add_spring("s1", vec![j1], Vec::new());
        let s2 = f.rig.add_spring("s2", vec![j2], Vec::new());

        // 只有一个不同的候选骨骼，无法配对
        let result = classify(&f.rig, &f.humanoid, &f.arena, &ConvertConfig::default());
        assert!(result.bilateral_pair.is_none());
        assert_eq!(result.get(ChainCategory::GenericCloth), &[s1, s2]);
    }
}
