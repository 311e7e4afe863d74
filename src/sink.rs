// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a finished pixel grid to disk.  Files ending in `.pgm` or
//! `.pnm` get a binary graymap; everything else gets a PNG.
//!
//! The image is encoded into a temporary file next to the target and
//! renamed over it only once every byte has been flushed, so a failed
//! write never leaves a truncated image behind and never touches a
//! file that was already there.  Devices and pipes can't be renamed
//! over, so those are written in place.

use image::png::PNGEncoder;
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use errors::Result;
use raster::PixelGrid;

/// The on-disk formats the sink knows how to produce.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ImageFormat {
    /// 8-bit grayscale PNG.
    Png,
    /// Binary portable graymap.
    Pgm,
}

impl ImageFormat {
    /// Picks a format from the file extension, defaulting to PNG.
    pub fn from_path(path: &Path) -> ImageFormat {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_ref().map(|e| e.as_str()) {
            Some("pgm") | Some("pnm") => ImageFormat::Pgm,
            _ => ImageFormat::Png,
        }
    }
}

/// Encodes `pixels` into `output` and flushes it.  Errors from the
/// final flush are reported like any other write error.
pub fn write_to<W: Write>(output: W, pixels: &PixelGrid, format: ImageFormat) -> Result<()> {
    let mut output = BufWriter::new(output);
    let (width, height) = (pixels.width() as u32, pixels.height() as u32);
    match format {
        ImageFormat::Png => {
            PNGEncoder::new(&mut output).encode(pixels.as_raw(), width, height, ColorType::Gray(8))?;
        }
        ImageFormat::Pgm => {
            let mut encoder = PNMEncoder::new(&mut output)
                .with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
            encoder.encode(pixels.as_raw(), width, height, ColorType::Gray(8))?;
        }
    }
    output.flush()?;
    Ok(())
}

/// Writes `pixels` to `path`, replacing it only if the whole image was
/// written.  On failure the staged file is discarded and whatever was
/// at `path` before is left alone.
pub fn write_image(path: &Path, pixels: &PixelGrid) -> Result<()> {
    let format = ImageFormat::from_path(path);
    info!("Writing {:?} image to {}", format, path.display());
    if let Ok(metadata) = fs::metadata(path) {
        if !metadata.is_file() && !metadata.is_dir() {
            let device = OpenOptions::new().write(true).open(path)?;
            return write_to(device, pixels, format);
        }
    }
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(directory)?;
    write_to(staged.as_file_mut(), pixels, format)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{self, Read};
    use std::path::PathBuf;
    use tempfile::tempdir;

    // A writer on a disk that is always full.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn entries(dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        found.sort();
        found
    }

    #[test]
    fn format_follows_the_extension() {
        assert_eq!(ImageFormat::from_path(Path::new("a.png")), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path(Path::new("a.PGM")), ImageFormat::Pgm);
        assert_eq!(ImageFormat::from_path(Path::new("a.pnm")), ImageFormat::Pgm);
        assert_eq!(ImageFormat::from_path(Path::new("diagram")), ImageFormat::Png);
    }

    #[test]
    fn writes_a_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diagram.png");
        write_image(&path, &PixelGrid::new(8, 8)).unwrap();
        let mut magic = [0u8; 8];
        File::open(&path).unwrap().read_exact(&mut magic).unwrap();
        assert_eq!(&magic[1..4], b"PNG");
        assert_eq!(entries(dir.path()), vec![path]);
    }

    #[test]
    fn writes_a_graymap() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diagram.pgm");
        write_image(&path, &PixelGrid::new(5, 3)).unwrap();
        let mut contents = vec![];
        File::open(&path).unwrap().read_to_end(&mut contents).unwrap();
        assert_eq!(&contents[0..2], b"P5");
        assert!(contents.ends_with(&[0u8; 15]));
    }

    #[test]
    fn small_images_on_a_full_disk_are_errors() {
        // Both images fit in the write buffer, so only the flush fails.
        assert!(write_to(FullDisk, &PixelGrid::new(8, 8), ImageFormat::Png).is_err());
        assert!(write_to(FullDisk, &PixelGrid::new(8, 8), ImageFormat::Pgm).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn dev_full_is_an_error() {
        for &format in [ImageFormat::Png, ImageFormat::Pgm].iter() {
            let full = fs::OpenOptions::new().write(true).open("/dev/full").unwrap();
            assert!(write_to(full, &PixelGrid::new(8, 8), format).is_err());
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn devices_are_written_in_place() {
        use std::os::unix::fs::FileTypeExt;

        let full = Path::new("/dev/full");
        assert!(write_image(full, &PixelGrid::new(8, 8)).is_err());
        assert!(fs::metadata(full).unwrap().file_type().is_char_device());
        write_image(Path::new("/dev/null"), &PixelGrid::new(8, 8)).unwrap();
        assert!(fs::metadata("/dev/null").unwrap().file_type().is_char_device());
    }

    #[test]
    fn replaces_an_existing_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diagram.pgm");
        fs::write(&path, b"stale").unwrap();
        write_image(&path, &PixelGrid::new(2, 2)).unwrap();
        let contents = fs::read(&path).unwrap();
        assert_eq!(&contents[0..2], b"P5");
        assert_eq!(entries(dir.path()), vec![path]);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path: PathBuf = dir.path().join("missing").join("diagram.png");
        assert!(write_image(&path, &PixelGrid::new(2, 2)).is_err());
        assert!(!path.exists());
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn failed_replace_leaves_the_target_and_no_debris() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diagram.png");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"mine").unwrap();
        assert!(write_image(&path, &PixelGrid::new(2, 2)).is_err());
        assert!(path.is_dir());
        assert_eq!(fs::read(path.join("keep")).unwrap(), b"mine");
        assert_eq!(entries(dir.path()), vec![path]);
    }
}
