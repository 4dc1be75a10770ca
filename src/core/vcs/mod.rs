pub mod message;
pub mod system_git;
mod system_git_ops;

pub use message::{MessageProperties, replace_properties};
pub use system_git::SystemGit;
pub use system_git_ops::{MergeOptions, MergeStrategy};
