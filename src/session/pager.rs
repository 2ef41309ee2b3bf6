/// Cyclic cursor over a fixed, non-empty item list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    cursor: usize,
    len: usize,
}

impl Pager {
    /// `None` for an empty list
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { cursor: 0, len })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn item_count(&self) -> usize {
        self.len
    }

    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    pub fn retreat(&mut self) {
        self.retreat_by(1);
    }

    pub fn advance_by(&mut self, steps: usize) {
        self.cursor = (self.cursor + steps % self.len) % self.len;
    }

    pub fn retreat_by(&mut self, steps: usize) {
        let back = steps % self.len;
        self.cursor = (self.cursor + self.len - back) % self.len;
    }

    /// Move to `index`, wrapped into range
    pub fn jump_to(&mut self, index: usize) {
        self.cursor = index % self.len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_has_no_pager() {
        assert!(Pager::new(0).is_none());
    }

    #[test]
    fn test_advance_wraps() {
        let mut pager = Pager::new(5).unwrap();
        pager.advance();
        pager.advance();
        assert_eq!(pager.cursor(), 2);
        pager.advance_by(3);
        assert_eq!(pager.cursor(), 0);
    }

    #[test]
    fn test_retreat_wraps() {
        let mut pager = Pager::new(5).unwrap();
        pager.retreat();
        assert_eq!(pager.cursor(), 4);
        pager.retreat_by(12);
        assert_eq!(pager.cursor(), 2);
    }

    #[test]
    fn test_n_steps_match_modulo() {
        for len in 1..7usize {
            for start in 0..len {
                for n in 0..20usize {
                    let mut fwd = Pager::new(len).unwrap();
                    fwd.jump_to(start);
                    for _ in 0..n {
                        fwd.advance();
                    }
                    assert_eq!(fwd.cursor(), (start + n) % len);

                    let mut back = Pager::new(len).unwrap();
                    back.jump_to(start);
                    for _ in 0..n {
                        back.retreat();
                    }
                    let expected = (start as i64 - n as i64).rem_euclid(len as i64) as usize;
                    assert_eq!(back.cursor(), expected);
                }
            }
        }
    }
}
