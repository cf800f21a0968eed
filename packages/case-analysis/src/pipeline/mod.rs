//! Analysis pipeline - the core of the library.
//!
//! The pipeline routes one case through:
//! - Router (classification, complexity score, model tier)
//! - Retrieval (vector + graph, fused; failures degrade to no context)
//! - Specialist (structured FIRAC analysis)
//! - Drafter (decision draft from a domain template)
//!
//! The [`supervisor`] picks the next stage from the fields already set and
//! the [`Workflow`] runs stages until `complete` or `error`.

pub mod nodes;
pub mod parse;
pub mod prompts;
pub mod supervisor;
pub mod templates;
pub mod workflow;

pub use parse::parse_llm_json;
pub use prompts::{
    build_case_document, escape_xml, format_router_prompt, format_specialist_prompt,
    ROUTER_PROMPT, SPECIALIST_PROMPT,
};
pub use supervisor::next_stage;
pub use templates::{TemplateRegistry, GENERIC_TEMPLATE_KEY};
pub use workflow::Workflow;
