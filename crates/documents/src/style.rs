//! Branding and locale applied to rendered documents.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use domain::{BusinessSettings, CURRENCY_SYMBOL};

/// Header shown when the business has not configured a name.
pub const DEFAULT_BUSINESS_NAME: &str = "RECO POS";

/// Name printed when the invoice carries no customer name.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// Greeting used in share messages when no customer name is known.
pub const VALUED_CUSTOMER: &str = "Valued Customer";

/// Presentation settings shared by the PDF layout and the share message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStyle {
    pub business_name: String,
    pub business_phone: Option<String>,
    pub business_address: Option<String>,
    pub gst_number: Option<String>,
    pub currency_symbol: String,
    /// Offset used when printing dates and times.
    pub utc_offset: FixedOffset,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            business_phone: None,
            business_address: None,
            gst_number: None,
            currency_symbol: CURRENCY_SYMBOL.to_string(),
            utc_offset: utc(),
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

impl DocumentStyle {
    /// Builds a style from the backend's business profile.
    pub fn from_settings(settings: &BusinessSettings) -> Self {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            business_name: non_blank(&settings.hotel_name)
                .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string()),
            business_phone: non_blank(&settings.phone),
            business_address: non_blank(&settings.address),
            gst_number: non_blank(&settings.gst_number),
            ..Self::default()
        }
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Sets the display offset; out-of-range values fall back to UTC.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(utc);
        self
    }

    /// `January 5, 2025`
    pub fn format_date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.utc_offset)
            .format("%B %-d, %Y")
            .to_string()
    }

    /// `04:00 PM`
    pub fn format_time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.utc_offset)
            .format("%I:%M %p")
            .to_string()
    }

    /// Formats an amount with this style's symbol and two decimals.
    pub fn money(&self, amount: domain::Money) -> String {
        amount.format_with(&self.currency_symbol)
    }
}
