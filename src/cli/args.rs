//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::NodeKind;

/// Admin site-tree manager: hierarchical menu and knowledgebase forests
#[derive(Parser, Debug)]
#[command(name = "sitetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (repeatable)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Store directory (default: config/XDG data dir)
    #[arg(short = 's', long, global = true)]
    pub store_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the forest as a tree
    Tree,

    /// Show one node with its breadcrumb
    Show {
        /// Node id
        id: String,
    },

    /// Print the breadcrumb path of a node
    Breadcrumb {
        /// Node id
        id: String,
        /// Segment separator (default from config)
        #[arg(long)]
        separator: Option<String>,
    },

    /// Print flattened select-list options
    Options,

    /// Add a node
    Add {
        /// Display name
        name: String,
        /// Parent node id (omit for a new root)
        #[arg(short, long)]
        parent: Option<String>,
        /// Node kind
        #[arg(short, long, value_enum, default_value_t = KindArg::MenuItem)]
        kind: KindArg,
        /// Sibling ordering key
        #[arg(short, long, default_value_t = 0)]
        order: i32,
        /// Link target
        #[arg(short, long)]
        url: Option<String>,
        /// Create unpublished
        #[arg(long)]
        unpublished: bool,
        /// Explicit id (uuid generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Update node fields
    Update {
        /// Node id
        id: String,
        /// New display name
        #[arg(short, long)]
        name: Option<String>,
        /// New sibling ordering key
        #[arg(short, long)]
        order: Option<i32>,
        /// New link target
        #[arg(short, long)]
        url: Option<String>,
        /// Publish the node
        #[arg(long, conflicts_with = "unpublish")]
        publish: bool,
        /// Unpublish the node
        #[arg(long)]
        unpublish: bool,
    },

    /// Remove a node and its whole subtree
    Remove {
        /// Node id
        id: String,
        /// Fail when the id does not exist (overrides missing_delete config)
        #[arg(long)]
        strict: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config file path
    Path,
}

/// CLI-facing node kind (keeps clap out of the domain layer).
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Category,
    Article,
    MenuItem,
}

impl std::fmt::Display for KindArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KindArg::Category => write!(f, "category"),
            KindArg::Article => write!(f, "article"),
            KindArg::MenuItem => write!(f, "menu-item"),
        }
    }
}

impl From<KindArg> for NodeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Category => NodeKind::Category,
            KindArg::Article => NodeKind::Article,
            KindArg::MenuItem => NodeKind::MenuItem,
        }
    }
}
