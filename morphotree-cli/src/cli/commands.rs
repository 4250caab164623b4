//! Command implementations and argument parsing for the morphotree CLI.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use morphotree_core::{
    ComponentTree, Connectivity, Count, FilterStrategy, Image, MorphotreeBuilder, MorphotreeError,
    tos::pixel_node_map,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::input::{InputError, parse_matrix};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "morphotree", about = "Build component trees of gray-level images.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build the tree of shapes.
    Tos(TosArgs),
    /// Build the alpha-tree of quasi-flat zones.
    Alphatree(AlphatreeArgs),
}

/// Options accepted by the `tos` command.
#[derive(Debug, Args, Clone)]
pub struct TosArgs {
    /// Text matrix, one row per line, whitespace-separated levels.
    pub path: PathBuf,

    /// Root point as `row,col`; defaults to the top-left pixel.
    #[arg(long, value_delimiter = ',')]
    pub seed: Option<Vec<usize>>,

    /// Removes shapes covering fewer pixels than this.
    #[arg(long = "area-filter")]
    pub area_filter: Option<usize>,

    /// Writes the tree as JSON to this file.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Options accepted by the `alphatree` command.
#[derive(Debug, Args, Clone)]
pub struct AlphatreeArgs {
    /// Text matrix, one row per line, whitespace-separated levels.
    pub path: PathBuf,

    /// Pixel adjacency.
    #[arg(long, value_enum, default_value_t = PixelAdjacency::Four)]
    pub connectivity: PixelAdjacency,

    /// Keeps one node per merge instead of one per alpha level.
    #[arg(long = "no-canonicalize")]
    pub no_canonicalize: bool,

    /// Reports the number of quasi-flat zones at this alpha.
    #[arg(long)]
    pub cut: Option<u16>,

    /// Writes the tree as JSON to this file.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// 2-D pixel adjacencies offered on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PixelAdjacency {
    /// Face-adjacent neighbours.
    Four,
    /// Face- and corner-adjacent neighbours.
    Eight,
}

impl From<PixelAdjacency> for Connectivity {
    fn from(value: PixelAdjacency) -> Self {
        match value {
            PixelAdjacency::Four => Self::Four,
            PixelAdjacency::Eight => Self::Eight,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Opening the input failed.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input matrix was malformed.
    #[error("invalid input `{path}`: {source}")]
    Input {
        /// Path of the input.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: InputError,
    },
    /// Writing the JSON output failed.
    #[error("failed to write `{path}`: {source}")]
    Output {
        /// Destination path.
        path: PathBuf,
        /// Underlying serialisation or I/O error.
        #[source]
        source: serde_json::Error,
    },
    /// Tree construction failed.
    #[error(transparent)]
    Core(#[from] MorphotreeError),
}

/// Kind of tree produced by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    /// Tree of shapes.
    Tos,
    /// Alpha-tree.
    Alphatree,
}

impl TreeKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Tos => "tree of shapes",
            Self::Alphatree => "alpha-tree",
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct TreeSummary {
    /// Kind of tree built.
    pub kind: TreeKind,
    /// Extents of the input image.
    pub extents: Vec<usize>,
    /// The tree itself.
    pub tree: ComponentTree<u16>,
    /// Nodes without children.
    pub leaves: usize,
    /// Nodes removed by the area filter.
    pub filtered: Option<usize>,
    /// Quasi-flat zones at the requested cut, with its alpha.
    pub cut: Option<(u16, usize)>,
}

#[derive(Serialize)]
struct PersistedTree<'a> {
    ndim: usize,
    node_count: usize,
    #[serde(flatten)]
    tree: &'a ComponentTree<u16>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading, building or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use morphotree_cli::cli::{Cli, Command, TosArgs, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 0 0\n0 9 0\n0 0 0\n")?;
/// let cli = Cli {
///     command: Command::Tos(TosArgs {
///         path: file.path().to_path_buf(),
///         seed: None,
///         area_filter: None,
///         output: None,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.tree.len(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<TreeSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Tos(args) => {
            span.record("command", field::display("tos"));
            run_tos(args)
        }
        Command::Alphatree(args) => {
            span.record("command", field::display("alphatree"));
            run_alphatree(args)
        }
    }
}

#[instrument(
    name = "cli.tos",
    err,
    skip(args),
    fields(path = %args.path.display(), seed = ?args.seed, area_filter = ?args.area_filter),
)]
pub(super) fn run_tos(args: TosArgs) -> Result<TreeSummary, CliError> {
    let image = load_image(&args.path)?;
    let mut builder = MorphotreeBuilder::new();
    if let Some(seed) = args.seed {
        builder = builder.with_seed(seed);
    }
    let (mut tree, node_map) = builder.build()?.tree_of_shapes(&image)?;

    // Removed nodes keep their slots; `live` tells them apart.
    let live = match args.area_filter {
        Some(min_area) => {
            let mut pixels = pixel_node_map(&node_map)?;
            let area = tree.compute_attribute_on_points(&pixels, Count::default(), true)?;
            let keep = |node: usize| area[node] >= min_area;
            tree.filter_with_node_map(FilterStrategy::Min, &mut pixels, keep)?;
            Some((0..tree.len()).map(|node| node == 0 || keep(node)).collect())
        }
        None => None,
    };

    let summary = summarise(TreeKind::Tos, &image, tree, live, None);
    if let Some(path) = &args.output {
        write_tree(&summary, path)?;
    }
    info!(nodes = summary.tree.len(), leaves = summary.leaves, "tree of shapes completed");
    Ok(summary)
}

#[instrument(
    name = "cli.alphatree",
    err,
    skip(args),
    fields(path = %args.path.display(), connectivity = ?args.connectivity, cut = ?args.cut),
)]
pub(super) fn run_alphatree(args: AlphatreeArgs) -> Result<TreeSummary, CliError> {
    let image = load_image(&args.path)?;
    let runner = MorphotreeBuilder::new()
        .with_connectivity(args.connectivity.into())
        .with_canonicalize(!args.no_canonicalize)
        .build()?;
    let (tree, node_map) = runner.alphatree(&image, |a: &u16, b: &u16| a.abs_diff(*b))?;

    let cut = match args.cut {
        Some(alpha) => {
            let labels = tree.cut_labels(alpha, &node_map)?;
            let zones = labels.as_slice().iter().max().map_or(0, |max| max + 1);
            Some((alpha, zones))
        }
        None => None,
    };

    let summary = summarise(TreeKind::Alphatree, &image, tree, None, cut);
    if let Some(path) = &args.output {
        write_tree(&summary, path)?;
    }
    info!(nodes = summary.tree.len(), leaves = summary.leaves, "alpha-tree completed");
    Ok(summary)
}

fn summarise(
    kind: TreeKind,
    image: &Image<u16>,
    tree: ComponentTree<u16>,
    live: Option<Vec<bool>>,
    cut: Option<(u16, usize)>,
) -> TreeSummary {
    let is_live = |node: usize| live.as_ref().is_none_or(|live| live[node]);
    let mut has_child = vec![false; tree.len()];
    for (node, &p) in tree.parent().iter().enumerate().skip(1) {
        if is_live(node) {
            has_child[p] = true;
        }
    }
    let leaves = (0..tree.len())
        .filter(|&node| is_live(node) && !has_child[node])
        .count();
    let filtered = live.as_ref().map(|live| live.iter().filter(|&&l| !l).count());
    TreeSummary {
        kind,
        extents: image.shape().extents().to_vec(),
        tree,
        leaves,
        filtered,
        cut,
    }
}

#[instrument(name = "cli.load_image", err, fields(path = %path.display()))]
pub(super) fn load_image(path: &Path) -> Result<Image<u16>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_matrix(BufReader::new(file)).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })
}

fn write_tree(summary: &TreeSummary, path: &Path) -> Result<(), CliError> {
    let output_error = |source| CliError::Output {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(|err| output_error(serde_json::Error::io(err)))?;
    let mut writer = BufWriter::new(file);
    let persisted = PersistedTree {
        ndim: summary.extents.len(),
        node_count: summary.tree.len(),
        tree: &summary.tree,
    };
    serde_json::to_writer(&mut writer, &persisted).map_err(output_error)?;
    writer
        .flush()
        .map_err(|err| output_error(serde_json::Error::io(err)))
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::io::Cursor;
/// # use morphotree_cli::cli::{TreeKind, TreeSummary, render_summary};
/// # use morphotree_core::ComponentTree;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = TreeSummary {
///     kind: TreeKind::Tos,
///     extents: vec![3, 3],
///     tree: ComponentTree::new(vec![0, 0], Some(vec![0, 9]))?,
///     leaves: 1,
///     filtered: None,
///     cut: None,
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer.into_inner())?;
/// assert!(text.starts_with("tree: tree of shapes\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &TreeSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "tree: {}", summary.kind.as_str())?;
    writeln!(writer, "image: {:?}", summary.extents)?;
    writeln!(writer, "nodes: {}", summary.tree.len())?;
    writeln!(writer, "leaves: {}", summary.leaves)?;
    if let Some(root) = summary.tree.values().and_then(|values| values.first()) {
        writeln!(writer, "root level: {root}")?;
    }
    if let Some(filtered) = summary.filtered {
        writeln!(writer, "filtered: {filtered}")?;
    }
    if let Some((alpha, zones)) = summary.cut {
        writeln!(writer, "zones at {alpha}: {zones}")?;
    }
    Ok(())
}
