//! ODF length values (`7.55cm`, `0.5in`, `300px`).

/// A numeric length with its unit suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct Length {
    /// Numeric part.
    pub value: f64,
    /// Unit suffix as written (`cm`, `mm`, `in`, `pt`, `pc`, `px`, ...).
    pub unit: String,
}

impl Length {
    /// Parse a length such as `7.55cm`.
    ///
    /// Returns `None` when the numeric part is missing or malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use rv_odf::Length;
    ///
    /// let len = Length::parse("7.55cm").unwrap();
    /// assert_eq!(len.unit, "cm");
    /// assert!(Length::parse("cm").is_none());
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
            .unwrap_or(s.len());
        let value = s[..split].parse::<f64>().ok()?;
        Some(Self {
            value,
            unit: s[split..].trim().to_owned(),
        })
    }

    /// Convert to centimetres for absolute units.
    ///
    /// Relative or device units (`px`, `%`, `em`) have no fixed size and
    /// yield `None`.
    #[must_use]
    pub fn to_cm(&self) -> Option<f64> {
        let factor = match self.unit.as_str() {
            "cm" => 1.0,
            "mm" => 0.1,
            "in" => 2.54,
            "pt" => 2.54 / 72.0,
            "pc" => 2.54 / 6.0,
            _ => return None,
        };
        Some(self.value * factor)
    }
}
