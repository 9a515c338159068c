pub mod ai;
pub mod config;
pub mod defaults;
pub mod input;
pub mod models;
pub mod registry;
pub mod repository;
pub mod scoring;
pub mod views;
pub mod workspace;

// Re-export commonly used types
pub use ai::{
    AiClient, AiError, AiInsight, AiMode, AnalysisStatus, InsightProvider, InsightRunner,
    SynergyGroup,
};
pub use config::{default_config_path, AiSettings, RoadmapConfig};
pub use input::coerce_number;
pub use models::{
    ChatMessage, ImpactLevel, OrgProject, OrgTeam, Phase, ProjectDraft, Quarter, QuarterError,
    RequestItem, RequestPatch, RiceMetrics, RoleProfile, CONFIDENCE_LEVELS,
};
pub use registry::{NameList, OrgRegistry, UNKNOWN_TEAM};
pub use repository::{RepositoryStats, RequestRepository};
pub use workspace::{ConfirmationGate, Transition, Workspace, WorkspaceMode};
