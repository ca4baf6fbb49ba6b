use docopt::Docopt;
use error_chain::bail;
use log::info;
use mazegen::{
    config::MazeConfig,
    masks::MotifPolicy,
    maze::Maze,
    maze_file::MazeFile,
};
use serde_derive::Deserialize;
use std::{
    io,
    io::prelude::*,
    path::PathBuf,
};

const USAGE: &str = "Mazegen

Usage:
    mazegen_driver -h | --help
    mazegen_driver check <maze-file>
    mazegen_driver [--output=<path> --seed=<n> --motif-policy=<policy> --no-motif --print] <config-file>

Options:
    -h --help                  Show this screen.
    --output=<path>            Write the maze file here instead of the configured OUTPUT_FILE.
    --seed=<n>                 Carve with this seed instead of the configured SEED.
    --motif-policy=<policy>    What to do with the motif cells after carving: blocked or opened.
    --no-motif                 Do not reserve the \"42\" motif.
    --print                    Echo the maze file to stdout once written.

The check command reads a maze file back and verifies its solution walks from the entry to the
exit through open walls. Set RUST_LOG=debug for more detail.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_check: bool,
    arg_maze_file: String,
    arg_config_file: String,
    flag_output: Option<String>,
    flag_seed: Option<u64>,
    flag_motif_policy: Option<String>,
    flag_no_motif: bool,
    flag_print: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazegen::errors::Error, ::mazegen::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    if args.cmd_check {
        check_maze_file(&args.arg_maze_file)
    } else {
        generate_maze_file(&args)
    }
}

fn generate_maze_file(args: &MazeArgs) -> Result<()> {

    let mut config = MazeConfig::load(&args.arg_config_file)?;

    if let Some(ref output) = args.flag_output {
        config.output_file = PathBuf::from(output);
    }
    if let Some(seed) = args.flag_seed {
        config.seed = Some(seed);
    }
    if let Some(ref policy) = args.flag_motif_policy {
        config.motif_policy = policy.parse::<MotifPolicy>()?;
    }
    if args.flag_no_motif {
        config.motif = false;
    }

    let params = config.to_parameters();
    let maze = Maze::generate(&params)?;
    let maze_file = maze.to_maze_file()
                        .chain_err(|| format!("no route through the maze with seed {}", maze.seed()))?;
    maze_file.write_to_path(&config.output_file)?;

    if args.flag_print {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{}", maze_file)?;
    }

    info!("done, rerun with --seed={} to reproduce this maze", maze.seed());
    Ok(())
}

fn check_maze_file(path: &str) -> Result<()> {

    let maze_file = MazeFile::read_from_path(path)?;
    if !maze_file.solution_is_valid() {
        bail!("the solution in {} does not lead from {} to {}", path, maze_file.entry, maze_file.exit);
    }

    info!("{} holds a {}x{} maze solved in {} moves",
          path,
          maze_file.grid.width().0,
          maze_file.grid.height().0,
          maze_file.solution.len());
    Ok(())
}
