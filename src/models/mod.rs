pub mod stage;
pub mod bundle;
pub mod documents;

// Re-export common model types
pub use stage::{ Stage, StageResult, UNPARSEABLE_MESSAGE };
pub use bundle::DocumentationBundle;
pub use documents::{ ApiMapDoc, FlowDoc, RequirementsDoc };
