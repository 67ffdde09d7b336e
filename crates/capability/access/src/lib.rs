//! 访问判定能力：分组访问控制、分类开关、回复按钮隐藏与访问者解析。

mod access;
mod category;
mod gate;
mod viewer;

pub use access::{AccessDecision, decide_access, evaluate_access};
pub use category::{
    CategoryDecision, PostClass, classify_post, decide_category_gate, decide_reply_suppression,
    evaluate_category_gate, evaluate_reply_suppression,
};
pub use gate::{LOG_PREFIX, OwnerViewGate};
pub use viewer::{
    ContextProbe, DirectProbe, OwnerHandle, OwnerProbe, Probe, ResolveStrategy, ViewerLookup,
    ViewerResolver, ViewerSource,
};

/// 访问者解析错误。
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("viewer lookup unsupported in this context")]
    Unsupported,
    #[error("viewer lookup failed: {0}")]
    Failed(String),
}
