//! 左右对称骨骼配对
//!
//! 从没有语义标签的候选骨骼中，按几何位置找出最像左右一对的两个（如胸部）。
//! 在参考坐标系（Hips）局部空间中评估：
//! - 两者都在前方 (z >= 0)
//! - X 符号相反，且都离中线足够远
//! - 镜像误差足够小
//! 得分 = 前突程度 - 镜像误差 * w1 - 高度差 * w2，总是取最高分（同分保留先找到的）。

use glam::{Mat4, Vec3};

use crate::config::ConvertConfig;

/// 配对参数
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairingParams {
    /// 距中线的最小 X 距离
    pub min_x_separation: f32,
    /// 允许的最大镜像误差
    pub max_symmetry_error: f32,
    pub symmetry_weight: f32,
    pub height_weight: f32,
}

impl Default for PairingParams {
    fn default() -> Self {
        Self {
            min_x_separation: 0.03,
            max_symmetry_error: 0.1,
            symmetry_weight: 10.0,
            height_weight: 10.0,
        }
    }
}

impl From<&ConvertConfig> for PairingParams {
    fn from(config: &ConvertConfig) -> Self {
        Self {
            min_x_separation: config.pair_min_x_separation,
            max_symmetry_error: config.pair_max_symmetry_error,
            symmetry_weight: config.pair_symmetry_weight,
            height_weight: config.pair_height_weight,
        }
    }
}

/// 配对结果
///
/// 以参考坐标系局部 X 的符号区分两侧；约定 +X 一侧为 Left。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymmetricPair<K> {
    /// 局部 X > 0
    pub positive_x: K,
    /// 局部 X < 0
    pub negative_x: K,
}

impl<K: Copy + PartialEq> SymmetricPair<K> {
    #[inline]
    pub fn left(&self) -> K {
        self.positive_x
    }

    #[inline]
    pub fn right(&self) -> K {
        self.negative_x
    }

    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.positive_x == key || self.negative_x == key
    }
}

/// 符号分类：0（含 NaN）单独成一类，永远不与任何值相反
#[inline]
fn sign_class(x: f32) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// 选出最佳左右配对
///
/// `candidates` 为 (键, 世界位置)，`reference` 为参考坐标系的世界矩阵。
/// 少于 2 个候选或没有任何组合通过筛选时返回 None。
pub fn select_best_pair<K: Copy>(
    candidates: &[(K, Vec3)],
    reference: Mat4,
    params: &PairingParams,
) -> Option<SymmetricPair<K>> {
    if candidates.len() < 2 {
        return None;
    }

    let world_to_local = reference.inverse();
    let local: Vec<Vec3> = candidates
        .iter()
        .map(|(_, p)| world_to_local.transform_point3(*p))
        .collect();

    let mut best: Option<(usize, usize)> = None;
    let mut best_score = f32::MIN;

    // 穷举所有组合
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let p1 = local[i];
            let p2 = local[j];

            // 背面
            if p1.z < 0.0 || p2.z < 0.0 {
                continue;
            }

            let s1 = sign_class(p1.x);
            let s2 = sign_class(p2.x);
            if s1 == 0 || s2 == 0 || s1 == s2 {
                continue;
            }

            // 离中线太近
            if p1.x.abs() < params.min_x_separation || p2.x.abs() < params.min_x_separation {
                continue;
            }

            let p1_mirrored = Vec3::new(-p1.x, p1.y, p1.z);
            let symmetry_error = p1_mirrored.distance(p2);
            if symmetry_error > params.max_symmetry_error {
                continue;
            }

            let height_diff = (p1.y - p2.y).abs();
            let forwardness = (p1.z + p2.z) * 0.5;

            let score = forwardness
                - symmetry_error * params.symmetry_weight
                - height_diff * params.height_weight;

            if score > best_score {
                best_score = score;
                best = Some((i, j));
            }
        }
    }

    best.map(|(i, j)| {
        if local[i].x > 0.0 {
            SymmetricPair { positive_x: candidates[i].0, negative_x: candidates[j].0 }
        } else {
            SymmetricPair { positive_x: candidates[j].0, negative_x: candidates[i].0 }
        }
    })
}
