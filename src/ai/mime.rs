/// Sniff the MIME type of a binary prompt part from its magic bytes.
pub fn detect_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x41, 0x56, 0x45, ..] => "audio/wav",
        [0x25, 0x50, 0x44, 0x46, ..] => "application/pdf",
        [_, _, _, _, 0x66, 0x74, 0x79, 0x70, ..] => "video/mp4",
        _ => {
            tracing::warn!(
                "Unrecognized binary part (first 4 bytes: {:02X?}), sending as application/octet-stream",
                &bytes[..bytes.len().min(4)]
            );
            "application/octet-stream"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(detect_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]), "image/png");
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(detect_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    }

    #[test]
    fn test_detect_webp_and_wav_share_riff_prefix() {
        assert_eq!(
            detect_mime(&[0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50]),
            "image/webp"
        );
        assert_eq!(
            detect_mime(&[0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x41, 0x56, 0x45]),
            "audio/wav"
        );
    }

    #[test]
    fn test_detect_pdf() {
        assert_eq!(detect_mime(b"%PDF-1.7"), "application/pdf");
    }

    #[test]
    fn test_detect_mp4() {
        assert_eq!(
            detect_mime(&[0x00, 0x00, 0x00, 0x18, 0x66, 0x74, 0x79, 0x70, 0x6D, 0x70, 0x34, 0x32]),
            "video/mp4"
        );
    }

    #[test]
    fn test_unknown_and_empty_fall_back_to_octet_stream() {
        assert_eq!(detect_mime(&[0x00, 0x01, 0x02, 0x03]), "application/octet-stream");
        assert_eq!(detect_mime(&[]), "application/octet-stream");
    }
}
