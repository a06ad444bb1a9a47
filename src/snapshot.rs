use std::io::Cursor;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, RgbaImage};

use crate::error::{CanvasError, CanvasResult};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// An encoded copy of the surface pixels at one point in time.
///
/// The encoding is PNG. Cloning is cheap, the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Snapshot {
    /// Encode pixels as a PNG snapshot
    pub fn encode(pixels: &RgbaImage) -> CanvasResult<Self> {
        let mut buf = Vec::new();
        pixels
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(CanvasError::SnapshotEncode)?;
        Ok(Self { bytes: buf.into() })
    }

    /// Wrap already encoded image bytes. They are only checked on decode.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode back into pixels
    pub fn decode(&self) -> CanvasResult<RgbaImage> {
        let image = image::load_from_memory(&self.bytes).map_err(CanvasError::SnapshotDecode)?;
        Ok(image.to_rgba8())
    }

    /// `data:image/png;base64,...`, the form a drawing is submitted in
    pub fn to_data_url(&self) -> String {
        let mut url = String::from(PNG_DATA_URL_PREFIX);
        STANDARD.encode_string(&self.bytes, &mut url);
        url
    }

    /// Parse a base64 `data:image/<type>;base64,` URL
    pub fn from_data_url(url: &str) -> CanvasResult<Self> {
        let (header, payload) = url
            .split_once(',')
            .ok_or_else(|| CanvasError::InvalidDataUrl("missing ',' separator".to_owned()))?;
        let mime = header
            .strip_prefix("data:")
            .and_then(|rest| rest.strip_suffix(";base64"))
            .ok_or_else(|| CanvasError::InvalidDataUrl(format!("unsupported header {header:?}")))?;
        if !mime.starts_with("image/") {
            return Err(CanvasError::InvalidDataUrl(format!("not an image: {mime}")));
        }
        let bytes = STANDARD.decode(payload.trim())?;
        Ok(Self::from_bytes(bytes))
    }
}

/// Why a restore was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreReason {
    Undo,
    Redo,
}

/// A pending request to bring a snapshot back onto the surface.
///
/// The sequence number ties the eventual result to the engine state that
/// asked for it; results for anything but the newest request are dropped.
#[derive(Debug, Clone)]
pub struct RestoreTicket {
    seq: u64,
    reason: RestoreReason,
    snapshot: Snapshot,
}

impl RestoreTicket {
    pub(crate) fn new(seq: u64, reason: RestoreReason, snapshot: Snapshot) -> Self {
        Self {
            seq,
            reason,
            snapshot,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn reason(&self) -> RestoreReason {
        self.reason
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Decode the snapshot. Decoding errors travel with the result so the
    /// engine can log them and keep its surface as it was.
    pub async fn decode(self) -> RestoredSurface {
        let pixels = self.snapshot.decode();
        RestoredSurface {
            seq: self.seq,
            reason: self.reason,
            pixels,
        }
    }
}

/// The outcome of [`RestoreTicket::decode`]
#[derive(Debug)]
pub struct RestoredSurface {
    pub seq: u64,
    pub reason: RestoreReason,
    pub pixels: CanvasResult<RgbaImage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        img.put_pixel(2, 1, Rgba([12, 34, 56, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 0, 0]));
        img
    }

    #[test]
    fn snapshot_preserves_pixels_and_alpha() {
        let img = sample();
        let decoded = Snapshot::encode(&img).unwrap().decode().unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn data_url_carries_png() {
        let snapshot = Snapshot::encode(&sample()).unwrap();
        let url = snapshot.to_data_url();
        assert!(url.starts_with("data:image/png;base64,iVBOR"));
        assert_eq!(Snapshot::from_data_url(&url).unwrap(), snapshot);
    }

    #[test]
    fn malformed_data_urls_are_rejected() {
        assert!(matches!(
            Snapshot::from_data_url("no separator"),
            Err(CanvasError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            Snapshot::from_data_url("data:text/plain;base64,aGk="),
            Err(CanvasError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            Snapshot::from_data_url("data:image/png;base64,***"),
            Err(CanvasError::Base64(_))
        ));
    }

    #[test]
    fn corrupt_bytes_fail_on_decode() {
        let ticket = RestoreTicket::new(7, RestoreReason::Undo, Snapshot::from_bytes(vec![1u8, 2, 3]));
        let restored = futures::executor::block_on(ticket.decode());
        assert_eq!(restored.seq, 7);
        assert!(matches!(restored.pixels, Err(CanvasError::SnapshotDecode(_))));
    }
}
