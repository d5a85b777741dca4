/// ICMPv4 echo request header, 8 bytes on the wire:
/// type(1)=8, code(1)=0, checksum(2), identifier(2), sequence(2),
/// multi-byte fields big-endian. No payload is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoRequest {
    pub identifier: u16,
    pub sequence: u16,
}

const ECHO_REQUEST_TYPE: u8 = 8;
const ECHO_REQUEST_CODE: u8 = 0;

pub const ECHO_REQUEST_LEN: usize = 8;

impl EchoRequest {
    pub fn new(identifier: u16, sequence: u16) -> Self {
        Self {
            identifier,
            sequence,
        }
    }

    /// Serializes the request with a freshly computed checksum. The checksum
    /// covers the header with its own field zeroed, so the result is stable
    /// for a given identifier/sequence pair.
    pub fn to_bytes(&self) -> [u8; ECHO_REQUEST_LEN] {
        let mut pkt = [0u8; ECHO_REQUEST_LEN];
        pkt[0] = ECHO_REQUEST_TYPE;
        pkt[1] = ECHO_REQUEST_CODE;
        // pkt[2..4] stays zero while the checksum is computed
        pkt[4..6].copy_from_slice(&self.identifier.to_be_bytes());
        pkt[6..8].copy_from_slice(&self.sequence.to_be_bytes());
        let csum = checksum(&pkt);
        pkt[2..4].copy_from_slice(&csum.to_be_bytes());
        pkt
    }
}

/// RFC 1071 one's-complement checksum: sum the input as big-endian 16-bit
/// words (odd-length input padded with a zero byte), fold the carries back
/// into the low 16 bits, complement.
pub fn checksum(mut data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    while data.len() >= 2 {
        sum = sum.wrapping_add(u16::from_be_bytes([data[0], data[1]]) as u32);
        data = &data[2..];
    }
    if !data.is_empty() {
        sum = sum.wrapping_add((data[0] as u32) << 8);
    }
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}
