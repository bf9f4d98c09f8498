//! Canonical WAV header for 8 kHz mono mu-law output

pub const HEADER_LEN: usize = 44;
pub const MULAW_FORMAT_TAG: u16 = 7;
pub const OUTPUT_SAMPLE_RATE: u32 = 8000;

/// Build the 44-byte header describing `data_length` bytes of mu-law audio
pub fn build_header(data_length: u32) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    let mut put = |offset: usize, bytes: &[u8]| {
        header[offset..offset + bytes.len()].copy_from_slice(bytes);
    };

    put(0, b"RIFF");
    put(4, &36u32.wrapping_add(data_length).to_le_bytes());
    put(8, b"WAVE");
    put(12, b"fmt ");
    put(16, &16u32.to_le_bytes());
    put(20, &MULAW_FORMAT_TAG.to_le_bytes());
    put(22, &1u16.to_le_bytes());
    put(24, &OUTPUT_SAMPLE_RATE.to_le_bytes());
    // one byte per sample, one channel
    put(28, &OUTPUT_SAMPLE_RATE.to_le_bytes());
    put(32, &1u16.to_le_bytes());
    put(34, &8u16.to_le_bytes());
    put(36, b"data");
    put(40, &data_length.to_le_bytes());

    header
}

/// Prefix encoded samples with [`build_header`] to form a playable file
pub fn wrap(encoded: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + encoded.len());
    out.extend_from_slice(&build_header(encoded.len() as u32));
    out.extend_from_slice(encoded);
    out
}
