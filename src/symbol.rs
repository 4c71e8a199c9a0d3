//! QR symbol model and the encoder seam.
//!
//! This module holds the read-only module grid that the renderer consumes, the version and error
//! correction types that describe a symbol, and the [`Encoder`] trait through which symbols are
//! produced. The default encoder, [`QrEncoder`], delegates to the `qrcode` crate and only ever
//! tries the single version it is asked for, leaving the choice of version to
//! [`crate::search::min_qrcode`].
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A QR Code version number, in the range [1, 40].
///
/// The version fixes the side length of the symbol: `17 + 4 * version` modules.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported by the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported by the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(Version::MIN.value() <= ver && ver <= Version::MAX.value(), "Version number out of range");
        Self(ver)
    }

    /// Returns the version number, in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the side length of a symbol of this version, in modules.
    pub const fn side_len(self) -> usize {
        17 + 4 * self.0 as usize
    }

    /// Returns the next larger version, or `None` past version 40.
    pub fn next(self) -> Option<Version> {
        (self < Version::MAX).then(|| Version(self.0 + 1))
    }

    /// Recovers the version from a side length, if it is a valid one.
    pub fn from_side_len(side: usize) -> Option<Version> {
        if side < Version::MIN.side_len() || side > Version::MAX.side_len() || (side - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((side - 17) / 4).ok().map(Version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The error correction level in a QR Code symbol.
///
/// Levels are ordered by increasing redundancy, which means decreasing usable capacity for a
/// given version.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EccLevel {
    /// The QR Code can tolerate about  7% erroneous codewords.
    #[serde(alias = "L")]
    L,
    /// The QR Code can tolerate about 15% erroneous codewords.
    #[default]
    #[serde(alias = "M")]
    M,
    /// The QR Code can tolerate about 25% erroneous codewords.
    #[serde(alias = "Q")]
    Q,
    /// The QR Code can tolerate about 30% erroneous codewords.
    #[serde(alias = "H")]
    H,
}

impl EccLevel {
    /// All levels, from least to most redundancy.
    pub const ALL: [EccLevel; 4] = [EccLevel::L, EccLevel::M, EccLevel::Q, EccLevel::H];

    fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            EccLevel::L => qrcode::EcLevel::L,
            EccLevel::M => qrcode::EcLevel::M,
            EccLevel::Q => qrcode::EcLevel::Q,
            EccLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for EccLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EccLevel::L => "L",
            EccLevel::M => "M",
            EccLevel::Q => "Q",
            EccLevel::H => "H",
        };
        f.write_str(name)
    }
}

/// Returned when a string does not name an error correction level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error correction level `{0}`, expected one of l, m, q, h")]
pub struct ParseLevelError(String);

impl FromStr for EccLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" => Ok(EccLevel::L),
            "m" => Ok(EccLevel::M),
            "q" => Ok(EccLevel::Q),
            "h" => Ok(EccLevel::H),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// An immutable square grid of dark and light modules.
///
/// The side length is always `17 + 4 * version` for a version in [1, 40], so a grid is at least
/// 21 modules wide. Cells are stored row-major; row 0 is the top row of the symbol.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ModuleGrid {
    side: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Builds a grid from row-major modules (`true` = dark).
    ///
    /// Returns `None` unless `side` is a valid QR side length and `modules` holds exactly
    /// `side * side` cells.
    pub fn from_modules(side: usize, modules: Vec<bool>) -> Option<Self> {
        Version::from_side_len(side)?;
        (modules.len() == side * side).then_some(Self { side, modules })
    }

    /// Builds a grid from a list of rows. Every row must be as long as there are rows.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Option<Self> {
        let side = rows.len();
        if rows.iter().any(|row| row.as_ref().len() != side) {
            return None;
        }
        let modules = rows.iter().flat_map(|row| row.as_ref().iter().copied()).collect();
        Self::from_modules(side, modules)
    }

    /// Builds a grid of the given version by asking `dark(row, col)` for every cell.
    pub fn from_fn(version: Version, mut dark: impl FnMut(usize, usize) -> bool) -> Self {
        let side = version.side_len();
        let mut modules = Vec::with_capacity(side * side);
        for row in 0..side {
            for col in 0..side {
                modules.push(dark(row, col));
            }
        }
        Self { side, modules }
    }

    /// Returns the width and height of the grid in modules, between 21 and 177.
    pub fn side_len(&self) -> usize {
        self.side
    }

    /// Returns the version implied by the side length.
    pub fn version(&self) -> Version {
        // Constructors only accept valid side lengths.
        Version(((self.side - 17) / 4) as u8)
    }

    /// Returns `true` for a dark module. Coordinates outside the grid are light.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.side && col < self.side && self.modules[row * self.side + col]
    }

    /// Iterates over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.modules.chunks(self.side)
    }

    /// Counts the dark modules in the grid.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&dark| dark).count()
    }
}

impl fmt::Debug for ModuleGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleGrid")
            .field("version", &self.version().value())
            .field("side", &self.side)
            .field("dark", &self.dark_count())
            .finish()
    }
}

/// Failure reported by an [`Encoder`] for a single version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The content does not fit the requested version at the requested level.
    #[error("data too long for version {version} at level {level}")]
    DataTooLong { version: Version, level: EccLevel },

    /// The encoder refused the content for a reason other than capacity.
    #[error("encoder rejected content: {0}")]
    Rejected(String),
}

/// Produces a module grid for content at one exact version.
///
/// Implementations must not pick a different version on their own; capacity failures are
/// reported as [`EncodeError::DataTooLong`] so the caller can try the next version.
pub trait Encoder {
    /// Encodes `content` as a symbol of exactly `version` at `level`.
    fn encode(&self, content: &[u8], version: Version, level: EccLevel) -> Result<ModuleGrid, EncodeError>;
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn encode(&self, content: &[u8], version: Version, level: EccLevel) -> Result<ModuleGrid, EncodeError> {
        (**self).encode(content, version, level)
    }
}

/// The default encoder, backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrEncoder;

impl Encoder for QrEncoder {
    fn encode(&self, content: &[u8], version: Version, level: EccLevel) -> Result<ModuleGrid, EncodeError> {
        use qrcode::types::QrError;

        let code = qrcode::QrCode::with_version(
            content,
            qrcode::Version::Normal(i16::from(version.value())),
            level.to_qrcode(),
        )
        .map_err(|err| match err {
            QrError::DataTooLong => EncodeError::DataTooLong { version, level },
            other => EncodeError::Rejected(other.to_string()),
        })?;

        let side = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();
        ModuleGrid::from_modules(side, modules)
            .ok_or_else(|| EncodeError::Rejected(format!("encoder produced a {side}x{side} grid")))
    }
}
