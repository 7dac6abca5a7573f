pub mod answers;
pub mod args;
pub mod runner;

pub use args::{
    get_args, get_log_level_from_verbose, BuildArgs, Cli, Commands, GraphArgs, NewArgs, WatchArgs,
};
pub use runner::run;
