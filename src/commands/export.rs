use std::path::{Path, PathBuf};

use chronicler::{export_project, Indent};

use super::{fail, load_options, load_project};

pub struct ExportArgs {
    pub project: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub indent: Option<String>,
    pub max_depth: Option<usize>,
}

pub fn run(args: ExportArgs) {
    let mut options = load_options(args.config.as_deref()).unwrap_or_else(|e| fail(e));
    if let Some(indent) = &args.indent {
        let indent: Indent = indent.parse().unwrap_or_else(|e| fail(e));
        options = options.with_indent(indent);
    }
    if let Some(max_depth) = args.max_depth {
        options = options.with_max_depth(max_depth);
    }

    let mut project = load_project(&args.project).unwrap_or_else(|e| fail(e));

    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => args
            .project
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };

    let written = export_project(&mut project, &out_dir, &options).unwrap_or_else(|e| fail(e));
    for path in written {
        println!("{}", path.display());
    }
}
