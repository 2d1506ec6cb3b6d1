//! Command-line surface.

use clap::{Parser, Subcommand};
use fredview_core::{FormulaKind, Theme, TransformKind};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fredview")]
#[command(about = "Browse, transform and combine FRED observation series", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print core linkage probe and version
    Ping,

    /// List stored series identifiers
    Series,

    /// Print transformed (and optionally combined) observations as rows
    Show {
        /// Load the selection from a saved view
        #[arg(long, conflicts_with_all = ["series", "transform", "formula", "second"])]
        view: Option<String>,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Manage saved views
    Views {
        #[command(subcommand)]
        command: ViewCommands,
    },

    /// Load a downloaded `series/observations` JSON body, replacing the series
    Ingest {
        /// Series identifier the body belongs to
        series_id: String,

        /// JSON file with the upstream response body
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ViewCommands {
    /// List saved view names
    List,

    /// Print one saved view as JSON
    Show { name: String },

    /// Save (or overwrite) a named view
    Save {
        name: String,

        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(long, default_value_t = Theme::Light)]
        theme: Theme,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct SelectionArgs {
    /// Series to show; repeat for several
    #[arg(short, long = "series")]
    pub series: Vec<String>,

    /// raw | pct_change_mom | pct_change_yoy | index_100
    #[arg(short, long, default_value_t = TransformKind::Raw)]
    pub transform: TransformKind,

    /// none | difference | ratio
    #[arg(short, long, default_value_t = FormulaKind::None)]
    pub formula: FormulaKind,

    /// Right-hand operand of the formula
    #[arg(long)]
    pub second: Option<String>,
}
