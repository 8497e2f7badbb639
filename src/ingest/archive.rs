use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::error::ProcessingError;

/// Companion files required to make a proper shapefile bundle.
const REQUIRED_MEMBERS: [&str; 4] = ["shp", "shx", "dbf", "prj"];

/// An extracted shapefile bundle in a scratch directory.
///
/// The directory is deleted when this handle drops, on every exit path,
/// so a failed import cannot leak scratch space.
#[derive(Debug)]
pub struct ScratchShapefile {
    dir: TempDir,
    shp_path: PathBuf,
}

impl ScratchShapefile {
    pub fn shp_path(&self) -> &Path {
        &self.shp_path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Validate a claimed shapefile ZIP and extract its bundle members.
///
/// Fails if the path is not a readable ZIP, or if the archive lacks at
/// least one member for each required extension (matched case
/// insensitively). Only members with those extensions are extracted.
pub fn extract_shapefile_zip(zip_path: &Path) -> Result<ScratchShapefile, ProcessingError> {
    let file = fs::File::open(zip_path)
        .map_err(|_| ProcessingError::InvalidArchive(zip_path.to_path_buf()))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|_| ProcessingError::InvalidArchive(zip_path.to_path_buf()))?;

    let present: HashSet<String> = archive
        .file_names()
        .filter_map(member_extension)
        .collect();
    let missing: Vec<&str> = REQUIRED_MEMBERS
        .iter()
        .copied()
        .filter(|required| !present.contains(*required))
        .collect();
    if !missing.is_empty() {
        return Err(ProcessingError::IncompleteArchive { missing: missing.join(" ") });
    }

    let dir = TempDir::new()?;
    let mut shp_path = None;
    for index in 0..archive.len() {
        let mut member = archive.by_index(index)?;
        let Some(relative) = member.enclosed_name() else {
            continue;
        };
        let Some(extension) = member_extension(&relative.to_string_lossy()) else {
            continue;
        };
        if !REQUIRED_MEMBERS.contains(&extension.as_str()) {
            continue;
        }

        let out_path = dir.path().join(&relative);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&out_path)?;
        io::copy(&mut member, &mut out)?;

        if extension == "shp" {
            shp_path = Some(out_path);
        }
    }

    let shp_path = shp_path.ok_or_else(|| ProcessingError::IncompleteArchive {
        missing: "shp".to_string(),
    })?;
    debug!(dir = %dir.path().display(), shp = %shp_path.display(), "extracted shapefile bundle");
    Ok(ScratchShapefile { dir, shp_path })
}

fn member_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
}
