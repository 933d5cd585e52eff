// SPDX-License-Identifier: MIT
//! Parsed container view over a BBES byte buffer

use crate::format::{flags, BbesHeader, FormatError, BBES_HEADER_SIZE};

/// A parsed BBES container: header plus owned bytes, with checked access
/// to the dictionary and payload sections
#[derive(Debug)]
pub struct CompressedContainer {
    header: BbesHeader,
    data: Vec<u8>,
}

impl CompressedContainer {
    /// Parse from owned data (takes ownership)
    pub fn from_vec(data: Vec<u8>) -> Result<Self, FormatError> {
        let header = BbesHeader::from_bytes(&data)?;
        header.validate()?;

        let needed = header.payload_offset();
        if data.len() < needed {
            return Err(FormatError::Truncated {
                needed,
                got: data.len(),
            });
        }

        Ok(Self { header, data })
    }

    /// Parse from borrowed data (copies)
    #[inline]
    pub fn from_slice(data: &[u8]) -> Result<Self, FormatError> {
        Self::from_vec(data.to_vec())
    }

    /// Container header
    pub fn header(&self) -> &BbesHeader {
        &self.header
    }

    /// Total size of the container in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The embedded dictionary block, if the flag is set (zero-copy)
    pub fn dictionary(&self) -> Option<&[u8]> {
        if !self.header.has_flag(flags::EMBEDDED_DICTIONARY) {
            return None;
        }
        let end = BBES_HEADER_SIZE + self.header.dictionary_size as usize;
        Some(&self.data[BBES_HEADER_SIZE..end])
    }

    /// The compressed payload: everything after the header and the
    /// optional dictionary block (zero-copy)
    pub fn payload(&self) -> &[u8] {
        &self.data[self.header.payload_offset()..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BBES_MAGIC;

    fn container_bytes(flags_bits: u16, dictionary: &[u8], payload: &[u8]) -> Vec<u8> {
        let header = BbesHeader {
            magic: *BBES_MAGIC,
            version: 1,
            flags: flags_bits,
            original_len: payload.len() as u32,
            dictionary_size: dictionary.len() as u32,
        };
        let mut buffer = Vec::new();
        header.write_to_buffer(&mut buffer);
        buffer.extend_from_slice(dictionary);
        buffer.extend_from_slice(payload);
        buffer
    }

    #[test]
    fn test_sections_without_dictionary() {
        let data = container_bytes(0, &[], b"payload");
        let container = CompressedContainer::from_vec(data).unwrap();
        assert!(container.dictionary().is_none());
        assert_eq!(container.payload(), b"payload");
    }

    #[test]
    fn test_sections_with_dictionary() {
        let data = container_bytes(flags::EMBEDDED_DICTIONARY, b"dict", b"payload");
        let container = CompressedContainer::from_vec(data).unwrap();
        assert_eq!(container.dictionary(), Some(b"dict".as_ref()));
        assert_eq!(container.payload(), b"payload");
    }

    #[test]
    fn test_empty_payload() {
        let data = container_bytes(0, &[], &[]);
        let container = CompressedContainer::from_vec(data).unwrap();
        assert!(container.payload().is_empty());
    }

    #[test]
    fn test_rejects_truncated_dictionary() {
        let mut data = container_bytes(flags::EMBEDDED_DICTIONARY, b"dict", b"");
        data.truncate(BBES_HEADER_SIZE + 2);
        assert!(matches!(
            CompressedContainer::from_vec(data),
            Err(FormatError::Truncated { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut data = container_bytes(0, &[], b"x");
        data[0] = b'Z';
        assert!(matches!(
            CompressedContainer::from_vec(data),
            Err(FormatError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_rejects_undersized_buffer() {
        assert!(matches!(
            CompressedContainer::from_slice(&[0u8; 3]),
            Err(FormatError::Truncated { .. })
        ));
    }
}
