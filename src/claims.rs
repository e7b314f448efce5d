use std::fmt;

/// Upper bound on interface numbers a claim set tracks.
pub const MAX_INTERFACES: u8 = 32;

/// Set of claimed interface numbers.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceClaims(u32);

impl InterfaceClaims {
    pub fn new() -> Self {
        InterfaceClaims(0)
    }

    /// Returns `false` when `interface` was already present or is out of range.
    pub fn insert(&mut self, interface: u8) -> bool {
        if interface >= MAX_INTERFACES || self.contains(interface) {
            return false;
        }
        self.0 |= 1 << interface;
        true
    }

    pub fn remove(&mut self, interface: u8) {
        if interface < MAX_INTERFACES {
            self.0 &= !(1 << interface);
        }
    }

    pub fn contains(&self, interface: u8) -> bool {
        interface < MAX_INTERFACES && self.0 & (1 << interface) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> {
        let bits = self.0;
        (0..MAX_INTERFACES).filter(move |i| bits & (1 << i) != 0)
    }
}

impl fmt::Debug for InterfaceClaims {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
