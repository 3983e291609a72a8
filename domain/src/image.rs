//! Decoded image payload

/// A successfully decoded image (Value Object)
///
/// Carries the original encoded bytes alongside the properties
/// recovered by decoding. A session binds exactly one payload at
/// creation and never replaces it. Decoding itself happens in the
/// infrastructure layer; by the time a payload exists, the bytes are
/// known to be a valid raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    mime: String,
    width: u32,
    height: u32,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            mime: mime.into(),
            width,
            height,
        }
    }

    /// The original encoded bytes, exactly as uploaded
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type detected at decode time (e.g. `image/png`)
    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of the encoded payload in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_accessors() {
        let payload = ImagePayload::new(vec![0x89, 0x50, 0x4e, 0x47], "image/png", 64, 48);
        assert_eq!(payload.bytes(), &[0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(payload.mime(), "image/png");
        assert_eq!(payload.width(), 64);
        assert_eq!(payload.height(), 48);
        assert_eq!(payload.len(), 4);
        assert!(!payload.is_empty());
    }
}
