//! Branch-model workflow
//!
//! - **argline**: `-Dkey=value` argument line editing and tokenizing
//! - **branch_type**: workflow role of a branch
//! - **propagate**: branch-type configuration written into the run context
//! - **workflow**: checkout and create operations tied to propagation

pub mod argline;
pub mod branch_type;
pub mod propagate;
pub mod workflow;

pub use branch_type::BranchType;
pub use workflow::Workflow;
