//! Alphabet assembly for the candidate enumeration.

use std::{fmt, ops::Deref};

use crate::error::{BruteError, BruteResult};

/// The default base (lowercase) character class.
pub const DEFAULT_BASE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// The default uppercase character class.
pub const DEFAULT_UPPERCASE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The default digits character class.
pub const DEFAULT_DIGITS_CHARSET: &[u8] = b"0123456789";

/// The default special symbols character class.
pub const DEFAULT_SPECIAL_CHARSET: &[u8] = b"!@#$%^&*()";

/// An ordered ASCII alphabet. Its composition fully determines the
/// enumeration order and the total candidate count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Charset(Vec<u8>);

impl Charset {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for Charset {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// A builder composing a [`Charset`] from the four character classes, in
/// fixed order: base, then uppercase, digits and specials when enabled.
/// Each class can be overridden before composition; the result is immutable.
#[derive(Clone, Debug)]
pub struct CharsetBuilder {
    base: Vec<u8>,
    uppercase: Vec<u8>,
    digits: Vec<u8>,
    special: Vec<u8>,
    include_uppercase: bool,
    include_digits: bool,
    include_special: bool,
}

impl Default for CharsetBuilder {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_CHARSET.to_vec(),
            uppercase: DEFAULT_UPPERCASE_CHARSET.to_vec(),
            digits: DEFAULT_DIGITS_CHARSET.to_vec(),
            special: DEFAULT_SPECIAL_CHARSET.to_vec(),
            include_uppercase: false,
            include_digits: false,
            include_special: false,
        }
    }
}

impl CharsetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the uppercase class.
    pub fn include_uppercase(mut self, include: bool) -> Self {
        self.include_uppercase = include;

        self
    }

    /// Enables or disables the digits class.
    pub fn include_digits(mut self, include: bool) -> Self {
        self.include_digits = include;

        self
    }

    /// Enables or disables the special symbols class.
    pub fn include_special(mut self, include: bool) -> Self {
        self.include_special = include;

        self
    }

    /// Overrides the base class.
    pub fn base(mut self, charset: &[u8]) -> Self {
        self.base = charset.to_vec();

        self
    }

    /// Overrides the uppercase class.
    pub fn uppercase(mut self, charset: &[u8]) -> Self {
        self.uppercase = charset.to_vec();

        self
    }

    /// Overrides the digits class.
    pub fn digits(mut self, charset: &[u8]) -> Self {
        self.digits = charset.to_vec();

        self
    }

    /// Overrides the special symbols class.
    pub fn special(mut self, charset: &[u8]) -> Self {
        self.special = charset.to_vec();

        self
    }

    /// Composes the final charset. Deterministic: the same inputs always
    /// produce the same ordered alphabet.
    pub fn build(self) -> BruteResult<Charset> {
        let classes = [
            ("base", &self.base, true),
            ("uppercase", &self.uppercase, self.include_uppercase),
            ("digits", &self.digits, self.include_digits),
            ("special", &self.special, self.include_special),
        ];

        let mut charset = Vec::new();
        for (name, class, enabled) in classes {
            if !enabled {
                continue;
            }
            if class.is_empty() {
                return Err(BruteError::EmptyClass(name));
            }
            if !class.is_ascii() {
                return Err(BruteError::NonAsciiCharset);
            }
            charset.extend_from_slice(class);
        }

        Ok(Charset(charset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_only_by_default() {
        let charset = CharsetBuilder::new().build().unwrap();

        assert_eq!(DEFAULT_BASE_CHARSET, charset.as_bytes());
    }

    #[test]
    fn test_classes_compose_in_fixed_order() {
        let charset = CharsetBuilder::new()
            .include_uppercase(true)
            .include_digits(true)
            .include_special(true)
            .build()
            .unwrap();

        let expected: Vec<u8> = [
            DEFAULT_BASE_CHARSET,
            DEFAULT_UPPERCASE_CHARSET,
            DEFAULT_DIGITS_CHARSET,
            DEFAULT_SPECIAL_CHARSET,
        ]
        .concat();

        assert_eq!(expected, charset.as_bytes());
        assert_eq!(72, charset.len());
    }

    #[test]
    fn test_disabled_classes_are_skipped() {
        let charset = CharsetBuilder::new().include_digits(true).build().unwrap();

        assert_eq!(b"abcdefghijklmnopqrstuvwxyz0123456789", charset.as_bytes());
    }

    #[test]
    fn test_overrides_apply_before_composition() {
        let charset = CharsetBuilder::new()
            .base(b"abc")
            .include_digits(true)
            .digits(b"01")
            .build()
            .unwrap();

        assert_eq!(b"abc01", charset.as_bytes());
    }

    #[test]
    fn test_empty_enabled_class_is_rejected() {
        let err = CharsetBuilder::new().base(b"").build().unwrap_err();
        assert!(matches!(err, BruteError::EmptyClass("base")));

        let err = CharsetBuilder::new()
            .include_special(true)
            .special(b"")
            .build()
            .unwrap_err();
        assert!(matches!(err, BruteError::EmptyClass("special")));
    }

    #[test]
    fn test_empty_disabled_class_is_ignored() {
        let charset = CharsetBuilder::new().special(b"").build().unwrap();

        assert_eq!(DEFAULT_BASE_CHARSET, charset.as_bytes());
    }

    #[test]
    fn test_non_ascii_override_is_rejected() {
        let err = CharsetBuilder::new()
            .base("abcé".as_bytes())
            .build()
            .unwrap_err();

        assert!(matches!(err, BruteError::NonAsciiCharset));
    }
}
