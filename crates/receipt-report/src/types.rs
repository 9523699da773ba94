use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Summary page error: {0}")]
    Summary(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Report compilation exceeded the {0:?} deadline")]
    DeadlineExceeded(Duration),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Failure to turn one raster receipt into a page.
///
/// Never escapes the assembler: it is folded into a skip.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Image has no pixels")]
    EmptyImage,
}

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    /// A4 portrait, the size of every generated page
    pub const A4: PageSize = PageSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub fn dimensions_mm(self) -> (f32, f32) {
        (self.width_mm, self.height_mm)
    }

    pub fn dimensions_pt(self) -> (f32, f32) {
        (
            crate::constants::mm_to_pt(self.width_mm),
            crate::constants::mm_to_pt(self.height_mm),
        )
    }
}

/// Currency amount in minor units (hundredths).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_minor(minor: i64) -> Self {
        Amount(minor)
    }

    pub fn minor(self) -> i64 {
        self.0
    }

    /// `None` when the sum leaves the representable range
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Exact sum of `amounts`, or `None` on overflow
    pub fn checked_sum(amounts: impl IntoIterator<Item = Amount>) -> Option<Amount> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid amount: {0:?}")]
pub struct ParseAmountError(pub String);

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Accepts `150`, `150.5`, `150.00` and `150,00`; at most two decimals.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseAmountError(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let normalized = digits.replace(',', ".");
        let (whole, frac) = match normalized.split_once('.') {
            Some((w, f)) => (w, f),
            None => (normalized.as_str(), ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if frac.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(err());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };

        let minor = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(err)?;
        Ok(Amount(if negative { -minor } else { minor }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_parse_forms() {
        assert_eq!("150".parse::<Amount>().unwrap(), Amount::from_minor(15000));
        assert_eq!("150.5".parse::<Amount>().unwrap(), Amount::from_minor(15050));
        assert_eq!("150,05".parse::<Amount>().unwrap(), Amount::from_minor(15005));
        assert_eq!("-2.10".parse::<Amount>().unwrap(), Amount::from_minor(-210));
        assert_eq!(".5".parse::<Amount>().unwrap(), Amount::from_minor(50));
    }

    #[test]
    fn test_amount_parse_rejects_garbage() {
        assert!("".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!("1.234".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
    }

    #[test]
    fn test_amount_checked_sum() {
        let parts = [Amount::from_minor(15000), Amount::from_minor(3050)];
        assert_eq!(Amount::checked_sum(parts), Some(Amount::from_minor(18050)));
        assert_eq!(Amount::checked_sum([]), Some(Amount::ZERO));

        let big: Amount = "92233720368547758.07".parse().unwrap();
        assert_eq!(big.minor(), i64::MAX);
        assert_eq!(big.checked_add(Amount::from_minor(1)), None);
        assert_eq!(Amount::checked_sum([big, big]), None);
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount::from_minor(18000).to_string(), "180.00");
        assert_eq!(Amount::from_minor(5).to_string(), "0.05");
        assert_eq!(Amount::from_minor(-1234).to_string(), "-12.34");
    }
}
