//! Extract command parameters from clap matches.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::commands::check::CheckArgs;
use crate::commands::export::ExportArgs;

pub struct ExportParams {
    pub project: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub indent: Option<String>,
    pub max_depth: Option<usize>,
}

impl ExportParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            project: m.get_one::<PathBuf>("project").cloned().unwrap_or_default(),
            out_dir: m.get_one::<PathBuf>("out_dir").cloned(),
            config: m.get_one::<PathBuf>("config").cloned(),
            indent: m.get_one::<String>("indent").cloned(),
            max_depth: m.get_one::<usize>("max_depth").copied(),
        }
    }
}

impl From<ExportParams> for ExportArgs {
    fn from(p: ExportParams) -> Self {
        Self {
            project: p.project,
            out_dir: p.out_dir,
            config: p.config,
            indent: p.indent,
            max_depth: p.max_depth,
        }
    }
}

pub struct CheckParams {
    pub project: PathBuf,
    pub config: Option<PathBuf>,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            project: m.get_one::<PathBuf>("project").cloned().unwrap_or_default(),
            config: m.get_one::<PathBuf>("config").cloned(),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            project: p.project,
            config: p.config,
        }
    }
}
