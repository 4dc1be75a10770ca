//! Branch-type configuration propagation
//!
//! Each checkout selects the changelist value configured for the branch type
//! and writes it into the run's [`FlowContext`].

use crate::core::config::ChangelistConfig;
use crate::core::context::FlowContext;
use crate::flow::branch_type::BranchType;
use tracing::debug;

/// Apply the changelist value for `branch_type` to the context.
///
/// Does nothing when the property is unnamed or no branch type has a value.
/// A branch type without a value removes the property.
pub fn apply(ctx: &mut FlowContext, changelist: &ChangelistConfig, branch_type: BranchType) {
  if !changelist.is_enabled() {
    return;
  }
  let Some(property) = changelist.property.as_deref() else {
    return;
  };

  let value = changelist.value_for(branch_type);
  debug!("Propagating {}={:?} for {} branch", property, value, branch_type);
  ctx.set_property(property, value);
}
