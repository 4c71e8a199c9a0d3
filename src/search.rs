//! Smallest-version search.
//!
//! The encoder is asked for version 1, then 2, and so on until the content fits. Capacity
//! failures are the expected way of moving to the next version; only running past version 40
//! is reported.
use tracing::{debug, trace};

use crate::error::SearchError;
use crate::geometry::GeometryConfig;
use crate::symbol::{EccLevel, EncodeError, Encoder, ModuleGrid, Version};

/// A module grid together with the dot size it should be drawn with.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub grid: ModuleGrid,
    pub version: Version,
    /// Derived from `extent` when one was configured, else the configured or default dot.
    pub dot: f64,
}

/// Finds the smallest version at which `encoder` accepts `content` at `level`.
///
/// # Arguments
///
/// * `encoder` - Produces a grid for one exact version.
/// * `content` - The payload to encode.
/// * `level` - Error correction level, fixed for the whole search.
/// * `config` - Geometry used to resolve the dot size once the grid is known.
///
/// # Errors
///
/// Returns [`SearchError::CapacityExceeded`] if the content does not fit version 40, and
/// [`SearchError::Encoder`] if the encoder rejects the content for any other reason.
///
/// # Example
///
/// ```rust
/// use qirust_page::geometry::GeometryConfig;
/// use qirust_page::search::min_qrcode;
/// use qirust_page::symbol::{EccLevel, QrEncoder};
///
/// let outcome = min_qrcode(&QrEncoder, b"foobar", EccLevel::M, &GeometryConfig::default()).unwrap();
/// assert_eq!(outcome.grid.side_len(), 21);
/// assert_eq!(outcome.dot, 1.0);
/// ```
pub fn min_qrcode<E: Encoder + ?Sized>(
    encoder: &E,
    content: &[u8],
    level: EccLevel,
    config: &GeometryConfig,
) -> Result<SearchOutcome, SearchError> {
    let mut version = Version::MIN;
    let grid = loop {
        match encoder.encode(content, version, level) {
            Ok(grid) => break grid,
            Err(EncodeError::DataTooLong { .. }) => {
                trace!(version = version.value(), %level, "content does not fit, trying next version");
                version = version.next().ok_or(SearchError::CapacityExceeded {
                    level,
                    bytes: content.len(),
                })?;
            }
            Err(err) => return Err(SearchError::Encoder(err)),
        }
    };

    let dot = config.dot_for(grid.side_len());
    debug!(version = version.value(), %level, side = grid.side_len(), dot, "selected symbol version");
    Ok(SearchOutcome { grid, version, dot })
}

/// Returns the dot size that makes `grid` fill `extent` with `margin` modules of quiet zone.
pub fn dotsize(grid: &ModuleGrid, extent: f64, margin: f64) -> f64 {
    extent / (2.0 * margin + grid.side_len() as f64)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::symbol::QrEncoder;

    /// Accepts content only from a fixed version on and remembers every attempt.
    struct FitsFrom {
        first: Option<Version>,
        attempts: RefCell<Vec<u8>>,
    }

    impl FitsFrom {
        fn new(first: Option<Version>) -> Self {
            Self { first, attempts: RefCell::new(Vec::new()) }
        }
    }

    impl Encoder for FitsFrom {
        fn encode(&self, _content: &[u8], version: Version, level: EccLevel) -> Result<ModuleGrid, EncodeError> {
            self.attempts.borrow_mut().push(version.value());
            match self.first {
                Some(first) if version >= first => Ok(ModuleGrid::from_fn(version, |r, c| (r + c) % 2 == 0)),
                _ => Err(EncodeError::DataTooLong { version, level }),
            }
        }
    }

    struct Refuses;

    impl Encoder for Refuses {
        fn encode(&self, _: &[u8], _: Version, _: EccLevel) -> Result<ModuleGrid, EncodeError> {
            Err(EncodeError::Rejected("unsupported".into()))
        }
    }

    #[test]
    fn test_search_stops_at_first_fit() {
        let encoder = FitsFrom::new(Some(Version::new(5)));
        let outcome = min_qrcode(&encoder, b"x", EccLevel::Q, &GeometryConfig::default()).unwrap();
        assert_eq!(outcome.version, Version::new(5));
        assert_eq!(outcome.grid.side_len(), 37);
        assert_eq!(*encoder.attempts.borrow(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_search_exhaustion_tries_forty_versions() {
        let encoder = FitsFrom::new(None);
        let err = min_qrcode(&encoder, b"abc", EccLevel::H, &GeometryConfig::default()).unwrap_err();
        assert_eq!(err, SearchError::CapacityExceeded { level: EccLevel::H, bytes: 3 });
        assert_eq!(*encoder.attempts.borrow(), (1..=40).collect::<Vec<u8>>());
    }

    #[test]
    fn test_search_propagates_rejection() {
        let err = min_qrcode(&Refuses, b"abc", EccLevel::L, &GeometryConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::Encoder(EncodeError::Rejected(_))));
    }

    #[test]
    fn test_search_derives_dot_from_extent() {
        let config = GeometryConfig { extent: Some(72.0), dot: Some(9.0), ..GeometryConfig::default() };
        let outcome = min_qrcode(&FitsFrom::new(Some(Version::MIN)), b"x", EccLevel::M, &config).unwrap();
        assert!((outcome.dot - 72.0 / 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_search_keeps_dot_without_extent() {
        let config = GeometryConfig { dot: Some(2.5), ..GeometryConfig::default() };
        let outcome = min_qrcode(&FitsFrom::new(Some(Version::MIN)), b"x", EccLevel::M, &config).unwrap();
        assert_eq!(outcome.dot, 2.5);
    }

    #[test]
    fn test_dot_size_float() {
        let outcome = min_qrcode(&QrEncoder, b"foobar", EccLevel::M, &GeometryConfig::default()).unwrap();
        let dot = dotsize(&outcome.grid, 72.0, 4.0);
        assert!((dot - 2.5).abs() < 0.05, "dot = {dot}");
    }

    #[test]
    fn test_real_encoder_exhausts_at_level_h() {
        let content = vec![0xA5u8; 3000];
        let err = min_qrcode(&QrEncoder, &content, EccLevel::H, &GeometryConfig::default()).unwrap_err();
        assert_eq!(err, SearchError::CapacityExceeded { level: EccLevel::H, bytes: 3000 });
    }
}
