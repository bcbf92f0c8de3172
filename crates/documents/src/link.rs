//! Messaging links and document file names.

use url::Url;

const WHATSAPP_BASE: &str = "https://wa.me/";
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Strips non-digits from `phone`; `None` unless 7 to 15 digits remain.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS)
        .contains(&digits.len())
        .then_some(digits)
}

/// Builds a `wa.me` link that pre-fills `message` for `phone`.
///
/// Returns `None` when the phone number is missing or unusable, so the caller
/// can hide the share action instead of opening a malformed link.
pub fn whatsapp_link(phone: Option<&str>, message: &str) -> Option<Url> {
    let digits = phone.and_then(normalize_phone)?;
    let mut url = match Url::parse(WHATSAPP_BASE).and_then(|base| base.join(&digits)) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(error = %err, "Could not build messaging link");
            return None;
        }
    };
    url.query_pairs_mut().append_pair("text", message);
    Some(url)
}

/// File name for an invoice document, e.g. `Invoice-INV-00001.pdf`.
pub fn document_file_name(invoice_number: &str) -> String {
    let safe: String = invoice_number
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    format!("Invoice-{safe}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize_phone("+91 98765-43210").as_deref(), Some("919876543210"));
        assert_eq!(normalize_phone("(080) 1234 567").as_deref(), Some("0801234567"));
    }

    #[test]
    fn test_normalize_rejects_unusable_numbers() {
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("n/a"), None);
        assert_eq!(normalize_phone("12345"), None);
        assert_eq!(normalize_phone("1234567890123456"), None);
    }

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let url = whatsapp_link(Some("+91 98765 43210"), "Hello Asha!\nTotal: ₹22.00 & more").unwrap();
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/919876543210");
        let text: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            text,
            vec![("text".to_string(), "Hello Asha!\nTotal: ₹22.00 & more".to_string())]
        );
    }

    #[test]
    fn test_missing_phone_gives_no_link() {
        assert!(whatsapp_link(None, "hi").is_none());
        assert!(whatsapp_link(Some("call me"), "hi").is_none());
    }

    #[test]
    fn test_document_file_name() {
        assert_eq!(document_file_name("INV-00001"), "Invoice-INV-00001.pdf");
        assert_eq!(document_file_name("INV/2025/7"), "Invoice-INV-2025-7.pdf");
    }
}
