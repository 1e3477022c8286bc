//! Firmware image table
//!
//! Images are prebuilt Intel HEX files shipped in a single directory. The
//! network core image is shared by every target; the application core image
//! depends on the target.

use crate::error::{Error, Result};
use crate::target::{Board, Channel, Target};
use std::path::{Path, PathBuf};

/// Default directory holding the prebuilt images
pub const DEFAULT_IMAGE_DIR: &str = "bin";

/// Network core image, shared by all targets
pub const NET_CORE_IMAGE: &str = "common_net.hex";

/// Application core image for each target, in [`Target::ALL`] order
pub const IMAGE_TABLE: [(Target, &str); Target::ALL.len()] = {
    let all = Target::ALL;
    [
        (all[0], all[0].app_image()),
        (all[1], all[1].app_image()),
        (all[2], all[2].app_image()),
        (all[3], all[3].app_image()),
    ]
};

impl Target {
    /// File name of the application core image for this target
    pub const fn app_image(&self) -> &'static str {
        match self {
            Target::Synth(Board::Nrf5340Dk) => "synth_dk_app.hex",
            Target::Synth(Board::Nrf5340AudioDk) => "synth_audio_dk_app.hex",
            Target::Headset(Channel::Left) => "headset_left_app.hex",
            Target::Headset(Channel::Right) => "headset_right_app.hex",
        }
    }
}

/// Location of the image files on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    dir: PathBuf,
}

impl ImageSet {
    /// Images stored in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the images are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the network core image
    pub fn net_core(&self) -> PathBuf {
        self.dir.join(NET_CORE_IMAGE)
    }

    /// Path of the application core image for `target`
    pub fn app_core(&self, target: Target) -> PathBuf {
        self.dir.join(target.app_image())
    }

    /// Check that both images for `target` exist
    pub fn check(&self, target: Target) -> Result<()> {
        for path in [self.net_core(), self.app_core(target)] {
            if !path.is_file() {
                return Err(Error::ImageMissing(path));
            }
            log::debug!("Using image {}", path.display());
        }
        Ok(())
    }
}

impl Default for ImageSet {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_DIR)
    }
}
