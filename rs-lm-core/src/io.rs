use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

use log::debug;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Invalid UTF-8 sequences are replaced rather than rejected
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut bytes = Vec::new();
	File::open(filename)?.read_to_end(&mut bytes)?;
	Ok(String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect())
}

/// Collects every file reachable from `path`.
///
/// - A file path is returned as-is
/// - A directory is walked recursively, hidden entries (`.` prefix) skipped
/// - Symlinked directories inside the walk are not followed, so link cycles
///   cannot recurse forever
/// - Results are sorted so corpus order does not depend on the file system
pub(crate) fn collect_files<P: AsRef<Path>>(path: P) -> io::Result<Vec<PathBuf>> {
	let path = path.as_ref();
	if path.is_file() {
		return Ok(vec![path.to_path_buf()]);
	}
	if !path.is_dir() {
		return Err(io::Error::new(
			io::ErrorKind::NotFound,
			format!("Expected a file or a directory, got: {}", path.display()),
		));
	}

	let mut files = Vec::new();
	let mut entries: Vec<PathBuf> = fs::read_dir(path)?
		.map(|entry| entry.map(|e| e.path()))
		.collect::<io::Result<_>>()?;
	entries.sort();

	for entry in entries {
		let hidden = entry
			.file_name()
			.is_some_and(|name| name.to_string_lossy().starts_with('.'));
		if hidden {
			continue;
		}
		let linked = fs::symlink_metadata(&entry)?.file_type().is_symlink();
		if entry.is_dir() {
			if linked {
				debug!("Not following directory link {}", entry.display());
				continue;
			}
			files.extend(collect_files(&entry)?);
		} else if entry.is_file() {
			files.push(entry);
		}
	}

	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn collects_nested_files_in_sorted_order() {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir(dir.path().join("b")).unwrap();
		fs::write(dir.path().join("b").join("inner.pos"), "x").unwrap();
		fs::write(dir.path().join("a.pos"), "x").unwrap();
		fs::write(dir.path().join(".hidden"), "x").unwrap();

		let files = collect_files(dir.path()).unwrap();
		let names: Vec<_> = files
			.iter()
			.map(|p| p.file_name().unwrap().to_string_lossy().to_string())
			.collect();
		assert_eq!(names, vec!["a.pos", "inner.pos"]);
	}

	#[cfg(unix)]
	#[test]
	fn directory_link_cycles_terminate() {
		let dir = tempfile::tempdir().unwrap();
		let corpus = dir.path().join("corpus");
		fs::create_dir(&corpus).unwrap();
		fs::write(corpus.join("a.pos"), "x").unwrap();
		fs::write(dir.path().join("outside.pos"), "x").unwrap();
		std::os::unix::fs::symlink(&corpus, corpus.join("loop")).unwrap();
		std::os::unix::fs::symlink(dir.path().join("outside.pos"), corpus.join("linked.pos")).unwrap();

		let files = collect_files(&corpus).unwrap();
		assert_eq!(files, vec![corpus.join("a.pos"), corpus.join("linked.pos")]);
	}

	#[test]
	fn missing_path_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(collect_files(dir.path().join("nope")).is_err());
	}

	#[test]
	fn reads_lines_with_crlf() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("f.txt");
		fs::write(&path, "one\r\ntwo\n").unwrap();
		assert_eq!(read_file(&path).unwrap(), vec!["one", "two"]);
	}
}
