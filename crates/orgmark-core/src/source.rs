//! Reading sources from disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::corpus::{Corpus, Source};
use crate::emit::HtmlEmitOptions;
use crate::error::LoadError;
use crate::parser::ParseOptions;

const EXTENSION: &str = "org";

/// Reads one file. The source is named after the file stem.
pub fn load_file(path: &Path) -> Result<Source, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotAFile(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(path = %path.display(), name = %name, bytes = text.len(), "loaded source");
    Ok(Source { name, text })
}

/// Reads every `*.org` file directly inside `dir`, ordered by file name.
pub fn load_directory(dir: &Path) -> Result<Vec<Source>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }
    let io_err = |source: std::io::Error| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();
    info!(dir = %dir.display(), files = paths.len(), "scanned directory");
    load_files(&paths)
}

/// Reads files in the given order.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Source>, LoadError> {
    paths.iter().map(|path| load_file(path.as_ref())).collect()
}

/// Reads a directory, or a single file when `path` is not a directory.
pub fn load_path(path: &Path) -> Result<Vec<Source>, LoadError> {
    if path.is_dir() {
        load_directory(path)
    } else {
        load_file(path).map(|source| vec![source])
    }
}

pub fn convert_file(
    path: &Path,
    parse: &ParseOptions,
    emit: &HtmlEmitOptions,
) -> Result<String, LoadError> {
    convert(vec![load_file(path)?], parse, emit)
}

pub fn convert_directory(
    dir: &Path,
    parse: &ParseOptions,
    emit: &HtmlEmitOptions,
) -> Result<String, LoadError> {
    convert(load_directory(dir)?, parse, emit)
}

pub fn convert_files<P: AsRef<Path>>(
    paths: &[P],
    parse: &ParseOptions,
    emit: &HtmlEmitOptions,
) -> Result<String, LoadError> {
    convert(load_files(paths)?, parse, emit)
}

fn convert(
    sources: Vec<Source>,
    parse: &ParseOptions,
    emit: &HtmlEmitOptions,
) -> Result<String, LoadError> {
    let corpus = Corpus::parse(&sources, parse)?;
    debug!(documents = corpus.len(), "resolved corpus");
    Ok(corpus.to_html(emit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_stem_names_the_source() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("notes.org");
        fs::write(&path, "* Notes").expect("write");
        let source = load_file(&path).expect("load");
        assert_eq!(source.name, "notes");
        assert_eq!(source.text, "* Notes");
    }

    #[test]
    fn directory_is_sorted_and_filtered() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("b.org"), "b").expect("write");
        fs::write(dir.path().join("a.org"), "a").expect("write");
        fs::write(dir.path().join("skip.txt"), "x").expect("write");
        fs::create_dir(dir.path().join("nested.org")).expect("mkdir");
        let names: Vec<String> = load_directory(dir.path())
            .expect("load")
            .into_iter()
            .map(|source| source.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn missing_inputs_are_reported() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("missing.org");
        assert!(matches!(load_file(&missing), Err(LoadError::NotAFile(_))));
        assert!(matches!(
            load_directory(&missing),
            Err(LoadError::NotADirectory(_))
        ));
        assert!(matches!(load_file(dir.path()), Err(LoadError::NotAFile(_))));
    }

    #[test]
    fn convert_file_renders_html() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("page.org");
        fs::write(&path, "* Title\nbody").expect("write");
        let html = convert_file(&path, &ParseOptions::default(), &HtmlEmitOptions::default())
            .expect("convert");
        assert_eq!(html, "<h1 id=\"page\">Title</h1><p>body</p>");
    }
}
