//! 转换配置
//!
//! 所有参数扁平化，直接在代码中修改默认值即可。

use once_cell::sync::Lazy;
use std::sync::RwLock;

/// 合并布料的参数来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClothAggregation {
    /// 只使用组内第一条链的根关节（默认）
    #[default]
    FirstChain,
    /// 组内所有根关节取平均
    Average,
}

/// 转换配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    // ========== 头发 / 对称软体 ==========
    /// 阻尼缩放（乘以 dragForce），默认 0.8
    pub hair_damping_scale: f32,
    /// 角度恢复刚度缩放（乘以 stiffnessForce 后 clamp01），默认 0.5
    pub hair_stiffness_scale: f32,

    // ========== 普通布料 ==========
    /// 阻尼缩放，默认 0.2
    pub cloth_damping_scale: f32,
    /// 角度恢复刚度缩放，默认 0.25
    pub cloth_stiffness_scale: f32,
    /// 同一父骨骼下多条链合并时的参数来源
    pub cloth_aggregation: ClothAggregation,

    // ========== 重力 ==========
    /// 重力衰减，固定 1.0
    pub gravity_falloff: f32,

    // ========== 左右配对 ==========
    /// 距中线的最小 X 距离，默认 0.03
    pub pair_min_x_separation: f32,
    /// 允许的最大镜像误差，默认 0.1
    pub pair_max_symmetry_error: f32,
    /// 镜像误差惩罚权重，默认 10
    pub pair_symmetry_weight: f32,
    /// 高度差惩罚权重，默认 10
    pub pair_height_weight: f32,

    // ========== 碰撞体 ==========
    /// 胶囊体退化长度阈值（世界空间），默认 1e-4
    pub capsule_min_length: f32,

    // ========== 调试 ==========
    /// 是否输出调试日志，默认 false
    pub debug_log: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            // ====== 头发 / 对称软体 ======
            hair_damping_scale: 0.8,
            hair_stiffness_scale: 0.5,

            // ====== 普通布料 ======
            // 布料面积大，阻尼和刚度都比头发弱
            cloth_damping_scale: 0.2,
            cloth_stiffness_scale: 0.25,
            cloth_aggregation: ClothAggregation::FirstChain,

            gravity_falloff: 1.0,

            // ====== 左右配对 ======
            // 以 Hips 局部空间为参考，单位与模型一致（米）
            pair_min_x_separation: 0.03,
            pair_max_symmetry_error: 0.1,
            pair_symmetry_weight: 10.0,
            pair_height_weight: 10.0,

            capsule_min_length: 1e-4,

            debug_log: false,
        }
    }
}

/// 全局配置实例
static CONVERT_CONFIG: Lazy<RwLock<ConvertConfig>> = Lazy::new(|| {
    RwLock::new(ConvertConfig::default())
});

/// 获取当前配置（只读）
pub fn get_config() -> ConvertConfig {
    CONVERT_CONFIG.read().unwrap_or_else(|e| e.into_inner()).clone()
}

/// 手动设置配置
pub fn set_config(config: ConvertConfig) {
    *CONVERT_CONFIG.write().unwrap_or_else(|e| e.into_inner()) = config;
}

/// 重置为默认配置
pub fn reset_config() {
    *CONVERT_CONFIG.write().unwrap_or_else(|e| e.into_inner()) = ConvertConfig::default();
}
