//! Command-line interface orchestration for morphotree.
//!
//! Two commands read a 2-D text matrix of `u16` levels: `tos` builds the tree
//! of shapes and `alphatree` the alpha-tree of quasi-flat zones. Both print a
//! short summary and optionally persist the tree as JSON.

mod commands;
mod input;

pub use commands::{
    AlphatreeArgs, Cli, CliError, Command, PixelAdjacency, TosArgs, TreeKind, TreeSummary,
    render_summary, run_cli,
};
pub use input::{InputError, parse_matrix};

#[cfg(test)]
mod test_helpers;
