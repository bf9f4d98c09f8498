//! G.711 mu-law companding
//!
//! Encoding follows the continuous mu-law curve (mu = 255) applied to the biased
//! sample magnitude and quantized to seven bits. Decoding uses the ITU-T
//! piecewise-linear segment reconstruction: three exponent bits select the
//! segment and four mantissa bits the step within it.

pub const MU: f64 = 255.0;
pub const BIAS: i32 = 132;
const MAX_MAGNITUDE: i32 = 32767;
const SIGN_BIT: u8 = 0x80;
const CODE_MASK: u8 = 0x7F;

/// Encode one 16-bit linear sample into a mu-law byte
#[inline]
pub fn encode(sample: i16) -> u8 {
    let sign = if sample < 0 { SIGN_BIT } else { 0 };
    let magnitude = (sample as i32).abs();
    let biased = (magnitude + BIAS).min(MAX_MAGNITUDE) as f64;

    let companded = (1.0 + MU * biased / MAX_MAGNITUDE as f64).ln() / (1.0 + MU).ln();
    // Full scale lands exactly on 128, which would spill into the sign bit
    let value = ((companded * 128.0).floor() as u8).min(CODE_MASK);

    value ^ sign ^ CODE_MASK
}

/// Decode one mu-law byte back to a 16-bit linear sample
#[inline]
pub fn decode(byte: u8) -> i16 {
    let code = byte ^ CODE_MASK;
    let negative = code & SIGN_BIT != 0;
    let exponent = (code >> 4) & 0x07;
    let mantissa = (code & 0x0F) as i32;

    // Segment reconstruction yields the biased magnitude the encoder companded
    let biased = (((mantissa << 3) + BIAS) << exponent) - BIAS;
    let magnitude = (biased - BIAS).max(0);

    if negative { -magnitude as i16 } else { magnitude as i16 }
}

/// Quantization step of the segment `byte` falls in
pub fn segment_step(byte: u8) -> i32 {
    let exponent = ((byte ^ CODE_MASK) >> 4) & 0x07;
    8 << exponent
}

pub fn encode_samples(samples: &[i16]) -> Vec<u8> {
    samples.iter().map(|&s| encode(s)).collect()
}

pub fn decode_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes.iter().map(|&b| decode(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        // |x| + 132 = 132 companded to 16
        assert_eq!(encode(0), 16 ^ 0x7F);
        assert_eq!(encode(-1), 16 ^ 0x80 ^ 0x7F);
        assert_eq!(encode(100), 23 ^ 0x7F);
        assert_eq!(encode(32767), 0x00);
        assert_eq!(encode(-32768), 0x80);
    }

    #[test]
    fn test_sign_bit() {
        for s in [1i16, 500, 20000, 32767] {
            assert_eq!(encode(s) & 0x80, 0);
            assert_eq!(encode(-s) & 0x80, 0x80);
        }
    }

    #[test]
    fn test_roundtrip_within_segment() {
        for x in [0i16, 100, -100, 32767, -32768] {
            let byte = encode(x);
            let decoded = decode(byte);
            let error = (decoded as i32 - x as i32).abs();
            assert!(error <= segment_step(byte), "x={} decoded={} step={}", x, decoded, segment_step(byte));
            assert_eq!(decoded.signum(), x.signum(), "sign of {}", x);
        }
        assert_eq!(decode(encode(0)), 0);
    }

    #[test]
    fn test_roundtrip_error_bound_over_full_range() {
        // The log-curve encoder and segmented decoder drift apart inside a segment
        let mut worst = 0.0f64;
        for x in i16::MIN..=i16::MAX {
            let byte = encode(x);
            let error = (decode(byte) as i32 - x as i32).abs();
            let step = segment_step(byte);
            assert!(error <= 2 * step, "x={} error={} step={}", x, error, step);
            worst = worst.max(error as f64 / step as f64);
        }
        assert!(worst > 1.0 && worst < 1.8, "worst ratio {}", worst);

        let byte = encode(-23001);
        assert_eq!(decode(byte), -24824);
        assert_eq!(segment_step(byte), 1024);
    }

    #[test]
    fn test_roundtrip_monotonic_over_full_range() {
        let mut prev = decode(encode(i16::MIN));
        for x in i16::MIN..=i16::MAX {
            let decoded = decode(encode(x));
            assert!(decoded >= prev, "decode(encode({})) = {} < {}", x, decoded, prev);
            prev = decoded;
        }
    }

    #[test]
    fn test_decode_is_total_and_symmetric() {
        for byte in 0..=255u8 {
            let pos = decode(byte & 0x7F);
            let neg = decode(byte | 0x80);
            assert!(pos >= 0);
            assert_eq!(neg, -pos);
        }
    }

    #[test]
    fn test_slice_helpers() {
        let samples = [0i16, 1000, -1000];
        let encoded = encode_samples(&samples);
        assert_eq!(encoded.len(), 3);
        let decoded = decode_bytes(&encoded);
        assert_eq!(decoded[0], 0);
        assert!(decoded[1] > 0 && decoded[2] < 0);
    }
}
