use core::iter::FusedIterator;

/// An iterator over the individual bits of a bitstring, most-significant bit first.
///
/// Each bit is produced as `0` or `1`.
#[derive(Debug, Clone)]
pub struct BitsIter<'a> {
    data: &'a [u8],
    front: usize,
    back: usize,
}
impl<'a> BitsIter<'a> {
    /// Iterates over the first `bit_size` bits of `data`
    pub(crate) fn new(data: &'a [u8], bit_size: usize) -> Self {
        debug_assert!(bit_size <= data.len() * 8);
        Self {
            data,
            front: 0,
            back: bit_size,
        }
    }

    #[inline]
    fn bit(&self, position: usize) -> u8 {
        let byte = self.data[position / 8];
        (byte >> (7 - (position % 8))) & 1
    }
}
impl<'a> Iterator for BitsIter<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let bit = self.bit(self.front);
        self.front += 1;
        Some(bit)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}
impl<'a> DoubleEndedIterator for BitsIter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.bit(self.back))
    }
}
impl<'a> ExactSizeIterator for BitsIter<'a> {}
impl<'a> FusedIterator for BitsIter<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_iter_yields_msb_first() {
        let data = [0b1010_0000u8];
        let bits: Vec<u8> = BitsIter::new(&data, 3).collect();
        assert_eq!(bits, vec![1, 0, 1]);
    }

    #[test]
    fn bits_iter_is_double_ended() {
        let data = [0b1100_1010u8, 0b1000_0000];
        let mut iter = BitsIter::new(&data, 9);
        assert_eq!(iter.len(), 9);
        assert_eq!(iter.next_back(), Some(1));
        assert_eq!(iter.next_back(), Some(0));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.nth(3), Some(1));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.collect::<Vec<_>>(), vec![0, 1]);
    }
}
