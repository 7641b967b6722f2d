//! SpringBone → BoneCloth 转换
//!
//! - pairing: 左右对称配对（纯函数）
//! - classify: 链分类
//! - collider: 碰撞体转换与缓存
//! - params: 物理参数映射
//! - orchestrator: 整体流程

mod classify;
mod collider;
mod orchestrator;
mod pairing;
mod params;

pub use classify::{classify, ChainCategory, ChainClassification};
pub use collider::{capsule_shape, sphere_shape, ColliderConverter};
pub use orchestrator::{convert, convert_with_config, ConversionReport};
pub use pairing::{select_best_pair, PairingParams, SymmetricPair};
pub use params::{cloth_parameters, hair_parameters, plan_grouped, plan_per_chain, ClothPlan};
