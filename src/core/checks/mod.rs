pub mod files;
pub mod tools;

pub use files::{default_required_files, FolderStructureCheck};
pub use tools::{
    parse_node_version, CommandOutput, CommandRunner, GitCheck, NodeCheck, SystemCommandRunner,
    DEFAULT_MIN_NODE_MAJOR,
};
