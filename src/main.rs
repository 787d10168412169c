use std::{
    env,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use jclass_class_file::{render, ClassFile};

fn main() {
    pretty_env_logger::init();

    let roots = env::args_os().skip(1).map(PathBuf::from).collect::<Vec<_>>();
    if roots.is_empty() {
        log::error!("usage: jprint <path>...");
        std::process::exit(2);
    }

    let failures = roots
        .iter()
        .map(|root| walk(root, list_dir, &mut print_class_file))
        .sum::<usize>();

    if failures > 0 {
        std::process::exit(1);
    }
}

/// Visits every `.class` file under `path` and returns how many failed.
///
/// An unreadable directory counts as one failure and its siblings are still walked.
fn walk(
    path: &Path,
    list: fn(&Path) -> io::Result<Vec<PathBuf>>,
    visit: &mut dyn FnMut(&Path) -> bool,
) -> usize {
    if path.is_dir() {
        match list(path) {
            Ok(entries) => entries.iter().map(|entry| walk(entry, list, visit)).sum(),
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                1
            }
        }
    } else if path.extension().map_or(false, |e| e == "class") {
        usize::from(!visit(path))
    } else if !path.exists() {
        log::error!("{}: no such file or directory", path.display());
        1
    } else {
        0
    }
}

/// Directory entries in sorted order.
fn list_dir(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(path)?
        .map(|e| e.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

/// Prints one class file, logging instead of aborting when it does not decode.
fn print_class_file(path: &Path) -> bool {
    let class_file = File::open(path)
        .map_err(Into::into)
        .and_then(ClassFile::parse);

    match class_file {
        Ok(class_file) => {
            log::debug!(
                "{}:\n{}",
                path.display(),
                jclass_class_file::render::constant_pool(&class_file.constant_pool)
            );
            println!("// {}", path.display());
            println!("{}", render(&class_file));
            println!();
            true
        }
        Err(e) => {
            log::error!("{}: {}", path.display(), e);
            false
        }
    }
}
