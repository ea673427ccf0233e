use std::fmt;

use crate::error::DecodeError;

/// Trait for decoders that turn a framed message into a structured sentence
///
/// The listener hands over the full message, start marker included,
/// without the terminator or any line feeds.
pub trait SentenceDecoder {
    type Sentence;

    fn decode(&self, raw: &[u8]) -> Result<Self::Sentence, DecodeError>;
}

/// A decoded NMEA 0183 sentence, e.g. `$GPGGA,123519,4807.038,N,...*47`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Talker identifier (`GP`, `GN`, `GL`...), or `P` for proprietary sentences
    pub talker: String,
    /// Sentence formatter (`GGA`, `RMC`...), or the manufacturer code and type for proprietary sentences
    pub sentence_type: String,
    /// Data fields following the address field
    pub fields: Vec<String>,
    /// Checksum transmitted with the sentence
    pub checksum: u8,
    raw: String,
}

impl Sentence {
    /// Talker and type joined, e.g. `GPRMC`
    pub fn prefix(&self) -> String {
        format!("{}{}", self.talker, self.sentence_type)
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// The sentence exactly as received
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_proprietary(&self) -> bool {
        self.talker == "P"
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// XOR of every byte in `payload`, as used by the `*HH` sentence suffix
pub fn checksum(payload: &str) -> u8 {
    payload.bytes().fold(0, |acc, b| acc ^ b)
}

/// Standard NMEA 0183 decoder
///
/// Validates the start marker, the mandatory `*HH` checksum and the
/// address field, then splits the data fields on commas.
/// Field contents are not interpreted.
///
/// A sentence without `*` is rejected: on a noisy bus a lost `*` would
/// otherwise fold the checksum digits into the last field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nmea0183Decoder;

impl SentenceDecoder for Nmea0183Decoder {
    type Sentence = Sentence;

    fn decode(&self, raw: &[u8]) -> Result<Sentence, DecodeError> {
        if raw.is_empty() {
            return Err(DecodeError::Empty);
        }
        let text = std::str::from_utf8(raw).map_err(|_| DecodeError::NotText)?;
        if !text.is_ascii() {
            return Err(DecodeError::NotText);
        }

        // '!' introduces encapsulated sentences (AIS)
        let body = text
            .strip_prefix(|c: char| c == '$' || c == '!')
            .ok_or(DecodeError::MissingStartMarker)?;

        let (payload, hex) = body.rsplit_once('*').ok_or(DecodeError::MissingChecksum)?;
        let expected = parse_checksum(hex)?;
        let computed = checksum(payload);
        if computed != expected {
            return Err(DecodeError::ChecksumMismatch { expected, computed });
        }

        let mut parts = payload.split(',');
        let address = parts.next().unwrap_or_default();
        if address.len() < 3 || !address.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DecodeError::InvalidAddress(address.to_string()));
        }

        let (talker, sentence_type) = if address.starts_with('P') {
            address.split_at(1)
        } else {
            address.split_at(2)
        };

        Ok(Sentence {
            talker: talker.to_string(),
            sentence_type: sentence_type.to_string(),
            fields: parts.map(str::to_string).collect(),
            checksum: expected,
            raw: text.to_string(),
        })
    }
}

fn parse_checksum(hex: &str) -> Result<u8, DecodeError> {
    if hex.len() != 2 {
        return Err(DecodeError::InvalidChecksum(hex.to_string()));
    }
    u8::from_str_radix(hex, 16).map_err(|_| DecodeError::InvalidChecksum(hex.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_checksum(payload: &str) -> String {
        format!("${}*{:02X}", payload, checksum(payload))
    }

    #[test]
    fn test_checksum() {
        assert_eq!(checksum(""), 0);
        assert_eq!(checksum("A"), 0x41);
        assert_eq!(checksum("AA"), 0);
        assert_eq!(
            checksum("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"),
            0x47
        );
    }

    #[test]
    fn test_decode_gga() {
        let raw = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
        let sentence = Nmea0183Decoder.decode(raw.as_bytes()).unwrap();

        assert_eq!(sentence.talker, "GP");
        assert_eq!(sentence.sentence_type, "GGA");
        assert_eq!(sentence.prefix(), "GPGGA");
        assert_eq!(sentence.fields.len(), 14);
        assert_eq!(sentence.field(0), Some("123519"));
        assert_eq!(sentence.field(1), Some("4807.038"));
        assert_eq!(sentence.field(13), Some(""));
        assert_eq!(sentence.field(14), None);
        assert_eq!(sentence.checksum, 0x47);
        assert_eq!(sentence.raw(), raw);
        assert_eq!(sentence.to_string(), raw);
        assert!(!sentence.is_proprietary());
    }

    #[test]
    fn test_decode_lowercase_checksum() {
        let raw = format!("$GNRMC,,V*{:02x}", checksum("GNRMC,,V"));
        let sentence = Nmea0183Decoder.decode(raw.as_bytes()).unwrap();
        assert_eq!(sentence.prefix(), "GNRMC");
    }

    #[test]
    fn test_decode_without_checksum_rejected() {
        assert_eq!(
            Nmea0183Decoder.decode(b"$GPZDA,201530.00,04,07,2002,00,00").unwrap_err(),
            DecodeError::MissingChecksum
        );
    }

    #[test]
    fn test_decode_lost_checksum_separator_rejected() {
        // The '*' dropped on the bus leaves the digits glued to the last field
        let intact = with_checksum("GPGGA,1,2");
        assert!(Nmea0183Decoder.decode(intact.as_bytes()).is_ok());

        let corrupted = intact.replace('*', "");
        assert_eq!(
            Nmea0183Decoder.decode(corrupted.as_bytes()).unwrap_err(),
            DecodeError::MissingChecksum
        );
    }

    #[test]
    fn test_decode_proprietary() {
        let raw = with_checksum("PMTK001,314,3");
        let sentence = Nmea0183Decoder.decode(raw.as_bytes()).unwrap();
        assert!(sentence.is_proprietary());
        assert_eq!(sentence.talker, "P");
        assert_eq!(sentence.sentence_type, "MTK001");
        assert_eq!(sentence.fields, vec!["314", "3"]);
    }

    #[test]
    fn test_decode_encapsulated() {
        let raw = format!("!{}", &with_checksum("AIVDM,1,1,,A,13aEOK?P00PD2wVMdLDRhgvL289?,0")[1..]);
        let sentence = Nmea0183Decoder.decode(raw.as_bytes()).unwrap();
        assert_eq!(sentence.talker, "AI");
        assert_eq!(sentence.sentence_type, "VDM");
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let err = Nmea0183Decoder.decode(b"$GPGGA,1,2*00").unwrap_err();
        assert_eq!(
            err,
            DecodeError::ChecksumMismatch { expected: 0x00, computed: checksum("GPGGA,1,2") }
        );
    }

    #[test]
    fn test_decode_invalid_checksum_field() {
        assert_eq!(
            Nmea0183Decoder.decode(b"$GPGGA,1*4").unwrap_err(),
            DecodeError::InvalidChecksum("4".to_string())
        );
        assert_eq!(
            Nmea0183Decoder.decode(b"$GPGGA,1*ZZ").unwrap_err(),
            DecodeError::InvalidChecksum("ZZ".to_string())
        );
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert_eq!(Nmea0183Decoder.decode(b"").unwrap_err(), DecodeError::Empty);
        assert_eq!(Nmea0183Decoder.decode(b"GPGGA,1").unwrap_err(), DecodeError::MissingStartMarker);
        assert_eq!(Nmea0183Decoder.decode(&[b'$', 0xFF, 0xFE]).unwrap_err(), DecodeError::NotText);
        assert_eq!(Nmea0183Decoder.decode(b"$").unwrap_err(), DecodeError::MissingChecksum);
        assert_eq!(
            Nmea0183Decoder.decode(b"$*00").unwrap_err(),
            DecodeError::InvalidAddress(String::new())
        );
        assert_eq!(
            Nmea0183Decoder.decode(with_checksum("GP,1,2").as_bytes()).unwrap_err(),
            DecodeError::InvalidAddress("GP".to_string())
        );
        assert_eq!(
            Nmea0183Decoder.decode(with_checksum("G$GGA,1").as_bytes()).unwrap_err(),
            DecodeError::InvalidAddress("G$GGA".to_string())
        );
    }
}
