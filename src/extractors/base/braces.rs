// Brace matching over masked source

use std::collections::HashMap;

use super::errors::ParseError;

/// Open-brace offset -> matching close-brace offset
#[derive(Debug, Clone, Default)]
pub struct BraceMap {
    pairs: HashMap<usize, usize>,
}

impl BraceMap {
    /// Match every brace in `masked`. Must run after comments and literals are
    /// blanked, otherwise braces inside them would count.
    pub fn build(masked: &[u8]) -> Result<Self, ParseError> {
        let mut pairs = HashMap::new();
        let mut open: Vec<usize> = Vec::new();

        for (offset, &b) in masked.iter().enumerate() {
            match b {
                b'{' => open.push(offset),
                b'}' => {
                    let start = open.pop().ok_or_else(|| {
                        ParseError::unbalanced(offset, "'}' has no matching '{'")
                    })?;
                    pairs.insert(start, offset);
                }
                _ => {}
            }
        }

        if let Some(&unclosed) = open.last() {
            return Err(ParseError::unbalanced(
                unclosed,
                format!("'{{' is never closed ({} open at end of input)", open.len()),
            ));
        }

        Ok(Self { pairs })
    }

    pub fn close_of(&self, open: usize) -> Option<usize> {
        self.pairs.get(&open).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_pairs() {
        let map = BraceMap::build(b"a{b{c}d}e").unwrap();
        assert_eq!(map.close_of(1), Some(7));
        assert_eq!(map.close_of(3), Some(5));
        assert_eq!(map.close_of(0), None);
    }

    #[test]
    fn test_stray_close_reports_its_offset() {
        let err = BraceMap::build(b"{ } }").unwrap_err();
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn test_unclosed_open_reports_innermost() {
        let err = BraceMap::build(b"{ { }  {").unwrap_err();
        assert_eq!(err.offset(), Some(7));
    }
}
