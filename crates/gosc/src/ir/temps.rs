//! Temporary name generation

use super::inst::Temp;

/// Issues `t0, t1, ...` for one compilation. Names are never reused.
#[derive(Debug, Default)]
pub struct TempAllocator {
    next: u32,
}

impl TempAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> Temp {
        let t = Temp(self.next);
        self.next += 1;
        t
    }

    /// Number of temporaries issued so far
    pub fn issued(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temps_are_monotonic_and_unique() {
        let mut temps = TempAllocator::new();
        let issued: Vec<_> = (0..4).map(|_| temps.fresh()).collect();
        assert_eq!(issued, vec![Temp(0), Temp(1), Temp(2), Temp(3)]);
        assert_eq!(temps.issued(), 4);
        assert_eq!(issued[2].to_string(), "t2");
    }
}
