pub mod check;
pub mod edit;
pub mod init;
pub mod show;

pub use check::{check, CheckArgs};
pub use edit::{edit, EditArgs};
pub use init::{init, InitArgs};
pub use show::{show, ShowArgs};

use crate::config::Config;
use std::path::PathBuf;

/// Settings shared by commands that work on an existing outline
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub outline_path: PathBuf,
}
