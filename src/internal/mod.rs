pub mod interrupt;

// used by the EPIC dispatcher and GPIO interrupt handler
pub(crate) struct BitIter(pub u32);

impl Iterator for BitIter {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0.trailing_zeros() {
            32 => None,
            b => {
                self.0 &= !(1 << b);
                Some(b)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BitIter;

    #[test]
    fn bit_iter_yields_set_bits_low_to_high() {
        let bits: Vec<u32> = BitIter(0b1000_0000_0000_0000_0000_0000_0010_0101).collect();
        assert_eq!(bits, [0, 2, 5, 31]);
        assert_eq!(BitIter(0).count(), 0);
    }
}
