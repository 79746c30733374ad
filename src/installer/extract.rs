//! Archive extraction.
//!
//! POSIX distributions ship as a two-layer container: a gzip wrapper
//! around an uncompressed tar archive. Both layers are unpacked in
//! sequence into the workspace, and the inner tar must exist before the
//! second pass runs. Windows distributions are single-layer zip
//! archives. In both cases the extracted tree root is verified before
//! the caller proceeds.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Unpack a `.tar.gz` archive: gunzip to `<base>.tar`, then untar.
///
/// Returns the path of the extracted tree root `<workspace>/<base>`.
pub fn unpack_tarball(archive: &Path, workspace: &Path, base: &str) -> Result<PathBuf> {
    let tar_path = workspace.join(format!("{base}.tar"));
    gunzip(archive, &tar_path)?;
    if !tar_path.exists() {
        return Err(Error::Extraction {
            message: format!(
                "expected inner archive {} after decompression",
                tar_path.display()
            ),
        });
    }

    let tar_file = File::open(&tar_path).map_err(|e| Error::Extraction {
        message: format!("cannot open {}: {e}", tar_path.display()),
    })?;
    tar::Archive::new(tar_file)
        .unpack(workspace)
        .map_err(|e| Error::Extraction {
            message: format!("cannot unpack {}: {e}", tar_path.display()),
        })?;

    verify_tree(workspace, base)
}

/// Unpack a zip archive and verify the extracted tree root.
pub fn unpack_zip(archive: &Path, workspace: &Path, base: &str) -> Result<PathBuf> {
    let file = File::open(archive).map_err(|e| Error::Extraction {
        message: format!("cannot open {}: {e}", archive.display()),
    })?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| Error::Extraction {
        message: format!("cannot read {}: {e}", archive.display()),
    })?;
    zip.extract(workspace).map_err(|e| Error::Extraction {
        message: format!("cannot unpack {}: {e}", archive.display()),
    })?;

    verify_tree(workspace, base)
}

/// Decompress a gzip file to `dest`.
fn gunzip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|e| Error::Extraction {
        message: format!("cannot open {}: {e}", archive.display()),
    })?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut out = File::create(dest).map_err(|e| Error::Extraction {
        message: format!("cannot create {}: {e}", dest.display()),
    })?;
    std::io::copy(&mut decoder, &mut out).map_err(|e| Error::Extraction {
        message: format!("cannot decompress {}: {e}", archive.display()),
    })?;
    Ok(())
}

fn verify_tree(workspace: &Path, base: &str) -> Result<PathBuf> {
    let tree = workspace.join(base);
    if tree.exists() {
        Ok(tree)
    } else {
        Err(Error::Extraction {
            message: format!("expected extracted directory {} not found", tree.display()),
        })
    }
}
