//! 访问者解析。
//!
//! 宿主传入的上下文形态不固定：可能直接是访问者、带 owner 的包装句柄，
//! 或需要间接查找的容器。按顺序尝试各探测策略，首个解析成功的结果生效；
//! 查找失败按匿名访问者处理。

use crate::LookupError;
use domain::ViewerIdentity;
use owner_view_telemetry::Logger;
use serde_json::json;

/// 可查找当前访问者的容器（宿主会话服务）。
pub trait ViewerLookup {
    /// `Ok(None)` 表示当前为匿名访问者。
    fn lookup_viewer(&self) -> Result<Option<ViewerIdentity>, LookupError>;
}

/// 包装句柄：通常持有一个 owner 容器，自身也可能支持查找。
pub trait OwnerHandle {
    fn owner(&self) -> Option<&dyn ViewerLookup>;

    fn as_lookup(&self) -> Option<&dyn ViewerLookup> {
        None
    }
}

/// 解析输入。
#[derive(Clone, Copy)]
pub enum ViewerSource<'a> {
    Anonymous,
    Direct(&'a ViewerIdentity),
    Wrapped(&'a dyn OwnerHandle),
    Lookup(&'a dyn ViewerLookup),
}

impl ViewerSource<'_> {
    fn kind(&self) -> &'static str {
        match self {
            ViewerSource::Anonymous => "anonymous",
            ViewerSource::Direct(_) => "direct",
            ViewerSource::Wrapped(_) => "wrapped",
            ViewerSource::Lookup(_) => "lookup",
        }
    }
}

/// 单个策略的探测结果。
#[derive(Debug)]
pub enum Probe {
    /// 该策略不适用于此输入。
    Unsupported,
    Resolved(Option<ViewerIdentity>),
    Failed(LookupError),
}

impl Probe {
    fn from_lookup(lookup: &dyn ViewerLookup) -> Self {
        match lookup.lookup_viewer() {
            Ok(viewer) => Probe::Resolved(viewer),
            Err(LookupError::Unsupported) => Probe::Unsupported,
            Err(err) => Probe::Failed(err),
        }
    }
}

/// 访问者解析策略。
pub trait ResolveStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn probe(&self, source: &ViewerSource<'_>) -> Probe;
}

/// 直接给出的访问者（或明确的匿名）。
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectProbe;

impl ResolveStrategy for DirectProbe {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn probe(&self, source: &ViewerSource<'_>) -> Probe {
        match source {
            ViewerSource::Direct(viewer) => Probe::Resolved(Some((*viewer).clone())),
            ViewerSource::Anonymous => Probe::Resolved(None),
            _ => Probe::Unsupported,
        }
    }
}

/// 经由包装句柄的 owner 查找。
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerProbe;

impl ResolveStrategy for OwnerProbe {
    fn name(&self) -> &'static str {
        "owner"
    }

    fn probe(&self, source: &ViewerSource<'_>) -> Probe {
        match source {
            ViewerSource::Wrapped(handle) => match handle.owner() {
                Some(owner) => Probe::from_lookup(owner),
                None => Probe::Unsupported,
            },
            _ => Probe::Unsupported,
        }
    }
}

/// 上下文自身查找（包括没有 owner 的包装句柄）。
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextProbe;

impl ResolveStrategy for ContextProbe {
    fn name(&self) -> &'static str {
        "context"
    }

    fn probe(&self, source: &ViewerSource<'_>) -> Probe {
        match source {
            ViewerSource::Lookup(lookup) => Probe::from_lookup(*lookup),
            ViewerSource::Wrapped(handle) => match handle.as_lookup() {
                Some(lookup) => Probe::from_lookup(lookup),
                None => Probe::Unsupported,
            },
            _ => Probe::Unsupported,
        }
    }
}

/// 有序策略列表。
pub struct ViewerResolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl Default for ViewerResolver {
    fn default() -> Self {
        Self {
            strategies: vec![
                Box::new(DirectProbe),
                Box::new(OwnerProbe),
                Box::new(ContextProbe),
            ],
        }
    }
}

impl ViewerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ResolveStrategy>>) -> Self {
        Self { strategies }
    }

    /// 解析当前访问者；所有策略都未成功时返回 None（按匿名处理）。
    pub fn resolve(&self, source: &ViewerSource<'_>, log: &Logger) -> Option<ViewerIdentity> {
        for strategy in &self.strategies {
            match strategy.probe(source) {
                Probe::Unsupported => continue,
                Probe::Resolved(viewer) => {
                    log.debug_throttled(
                        "viewer resolved",
                        json!({
                            "strategy": strategy.name(),
                            "source": source.kind(),
                            "anonymous": viewer.is_none(),
                        }),
                    );
                    return viewer;
                }
                Probe::Failed(err) => {
                    log.warn(
                        "viewer lookup failed",
                        json!({ "strategy": strategy.name(), "error": err.to_string() }),
                    );
                }
            }
        }
        log.debug_throttled(
            "no viewer resolved, treating as anonymous",
            json!({ "source": source.kind() }),
        );
        None
    }
}
