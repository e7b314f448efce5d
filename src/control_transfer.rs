use std::convert::TryInto;

/// Size of the setup packet that leads every control transfer buffer.
pub const CONTROL_SETUP_SIZE: usize = 8;

/// Standard control setup packet. Multi-byte fields are little endian on
/// the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlSetup {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl ControlSetup {
    pub fn new(request_type: u8, request: u8, value: u16, index: u16, length: u16) -> Self {
        ControlSetup {
            request_type,
            request,
            value,
            index,
            length,
        }
    }

    /// Parses the first `CONTROL_SETUP_SIZE` bytes of `buffer`.
    pub fn parse(buffer: &[u8]) -> Option<Self> {
        let setup: [u8; CONTROL_SETUP_SIZE] = buffer.get(..CONTROL_SETUP_SIZE)?.try_into().ok()?;
        Some(ControlSetup {
            request_type: setup[0],
            request: setup[1],
            value: u16::from_le_bytes([setup[2], setup[3]]),
            index: u16::from_le_bytes([setup[4], setup[5]]),
            length: u16::from_le_bytes([setup[6], setup[7]]),
        })
    }

    pub fn to_bytes(&self) -> [u8; CONTROL_SETUP_SIZE] {
        let value = self.value.to_le_bytes();
        let index = self.index.to_le_bytes();
        let length = self.length.to_le_bytes();
        [
            self.request_type,
            self.request,
            value[0],
            value[1],
            index[0],
            index[1],
            length[0],
            length[1],
        ]
    }

    pub fn is_in(&self) -> bool {
        self.request_type & 0x80 == 0x80
    }
}
