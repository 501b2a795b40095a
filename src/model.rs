// Model decompression step
//
// The classifier data package ships the serialized decision tree and its
// feature header list gzip-compressed to keep the package small. The
// workflow rules want them uncompressed, so when the on-disk model is at or
// below the known compressed size we inflate both files into the working
// temp directory and hand those copies to the engine instead. One-shot per
// run; nothing is cached across runs.

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use crate::defaults::{COMPRESSED_MODEL_SIZE, MODEL_SIZE_TOLERANCE};

#[path = "model_test.rs"]
#[cfg(test)]
mod model_test;

/// Decide whether the model file looks compressed, by size alone.
pub fn needs_decompression(trained_model: &Path) -> io::Result<bool> {
    let size = fs::metadata(trained_model)?.len();
    Ok(size <= COMPRESSED_MODEL_SIZE + MODEL_SIZE_TOLERANCE)
}

/// Inflate the model and header files into `tempdir`, returning the new
/// (model, headers) paths. The original files are left untouched.
pub fn decompress_into(
    trained_model: &Path,
    header_file: &Path,
    tempdir: &Path,
) -> io::Result<(PathBuf, PathBuf)> {
    log::info!("Decompressing model and header files");

    let model_out = decompress_file(trained_model, tempdir)?;
    let headers_out = decompress_file(header_file, tempdir)?;

    Ok((model_out, headers_out))
}

fn decompress_file(path: &Path, tempdir: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a file: {}", path.display()),
        )
    })?;
    let out_path = tempdir.join(name);

    let mut decoder = GzDecoder::new(File::open(path)?);
    let mut writer = BufWriter::new(File::create(&out_path)?);
    io::copy(&mut decoder, &mut writer)?;

    Ok(out_path)
}
