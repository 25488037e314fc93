use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Path of the snapshot that sits next to a corpus file.
///
/// `data/train.txt` + `"bin"` → `data/train.bin`
///
/// Fails for paths without a file name (`/`, `..`).
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();
	if input_path.file_name().is_none() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "corpus path has no file name"));
	}
	Ok(input_path.with_extension(output_extension))
}

/// Model name derived from a corpus path: the file name minus its extension.
///
/// `./data/brown_train.txt` → `brown_train`
pub(crate) fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	input_path
		.as_ref()
		.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "corpus path has no file name"))
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns full paths. Subdirectories are ignored.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(path);
		}
	}
	files.sort();

	Ok(files)
}
