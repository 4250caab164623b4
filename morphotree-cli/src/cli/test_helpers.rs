//! Helpers shared by the CLI unit tests.

use std::fs;
use std::io;
use std::path::PathBuf;

use tempfile::TempDir;

use super::{AlphatreeArgs, Cli, CliError, Command, PixelAdjacency, TosArgs, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

pub(super) fn tos_cli(path: PathBuf) -> Cli {
    Cli {
        command: Command::Tos(TosArgs {
            path,
            seed: None,
            area_filter: None,
            output: None,
        }),
    }
}

pub(super) fn alphatree_cli(path: PathBuf) -> Cli {
    Cli {
        command: Command::Alphatree(AlphatreeArgs {
            path,
            connectivity: PixelAdjacency::Four,
            no_canonicalize: false,
            cut: None,
            output: None,
        }),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
