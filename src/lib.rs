//! Spring2Cloth - 将 VRM SpringBone 摇摆骨转换为骨骼布料 (BoneCloth)
//!
//! 流程：
//! - 链分类（头发 / 左右对称软体 / 普通布料）
//! - 物理参数映射（重力、阻尼、角度恢复刚度）
//! - 碰撞体转换（球体 / 胶囊体，带去重缓存）
//! - 构建布料后销毁原 SpringBone 数据
//!
//! 场景图由宿主持有，核心只通过 [`SceneHost`] 请求创建/挂载/销毁。

pub mod cloth;
pub mod config;
pub mod convert;
pub mod rig;
pub mod scene;

pub use cloth::{BoneCloth, ClothCollider, ClothParameters, CollisionMode, ConnectionMode};
pub use config::{ClothAggregation, ConvertConfig, get_config, set_config, reset_config};
pub use convert::{
    classify, convert, convert_with_config, select_best_pair, ChainCategory, ChainClassification,
    ColliderConverter, ConversionReport, SymmetricPair,
};
pub use rig::{Humanoid, SpringBoneAvatar, SpringRig};
pub use scene::{BoneTransform, NodeId, SceneArena, SceneHost};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("unsupported collider type {code} on '{name}'")]
    UnsupportedCollider { name: String, code: i32 },

    #[error("failed to build cloth '{cloth}': {reason}")]
    ClothBuild { cloth: String, reason: String },

    #[error("unknown scene node: {0:?}")]
    UnknownNode(NodeId),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
