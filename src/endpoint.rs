#[cfg(feature = "serde")]
use serde::Serialize;
use std::fmt;

/// Endpoint address as advertised in `bEndpointAddress`.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint(u8);
pub const ENDPOINT_IN: u8 = 0x80;
pub const ENDPOINT_OUT: u8 = 0x00;

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "EP: 0x{:02X} ({})",
            self.0,
            if self.is_control() {
                "Control"
            } else if self.is_in() {
                "In"
            } else {
                "Out"
            }
        )
    }
}

impl From<Endpoint> for u8 {
    fn from(ep: Endpoint) -> u8 {
        ep.0
    }
}

impl From<u8> for Endpoint {
    fn from(address: u8) -> Self {
        Endpoint(address)
    }
}

impl Endpoint {
    pub fn new(address: u8) -> Self {
        Endpoint(address)
    }

    pub fn out(ep: u8) -> Self {
        Endpoint(ep & 0x0F)
    }

    pub fn input(ep: u8) -> Self {
        Endpoint(ENDPOINT_IN | (ep & 0x0F))
    }

    pub fn address(&self) -> u8 {
        self.0
    }

    pub fn number(&self) -> u8 {
        self.0 & 0x0F
    }

    pub fn is_control(&self) -> bool {
        self.number() == 0
    }

    pub fn is_in(&self) -> bool {
        self.0 & ENDPOINT_IN == ENDPOINT_IN
    }

    pub fn is_out(&self) -> bool {
        !self.is_in()
    }
}
