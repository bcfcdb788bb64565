//! String-change classification (§4.6.3, component G). Decides how a
//! string-vs-string Modification should be rendered: the first matching
//! shape wins.

#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub detect_certificates: bool,
    /// §4.6.3 rule 4: minor change if edit-distance ≤4, or the
    /// distance/min-length ratio is below this threshold.
    pub minor_change_threshold: f64,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        ClassifyOptions { detect_certificates: true, minor_change_threshold: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    pub not_before: String,
    pub not_after: String,
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringChange {
    Certificates { from: CertificateSummary, to: CertificateSummary },
    InvalidUtf8,
    Whitespace,
    Minor,
    Multiline,
    Plain,
}

pub fn classify(from: &str, to: &str, opts: &ClassifyOptions) -> StringChange {
    if opts.detect_certificates {
        if let (Some(a), Some(b)) = (parse_single_pem_certificate(from), parse_single_pem_certificate(to)) {
            return StringChange::Certificates { from: a, to: b };
        }
    }
    if from.contains('\u{fffd}') || to.contains('\u{fffd}') {
        return StringChange::InvalidUtf8;
    }
    if from != to && from.trim() == to.trim() {
        return StringChange::Whitespace;
    }
    let distance = strsim::levenshtein(from, to);
    let min_len = from.chars().count().min(to.chars().count()).max(1);
    if distance <= 4 || (distance as f64 / min_len as f64) < opts.minor_change_threshold {
        return StringChange::Minor;
    }
    if from.contains('\n') || to.contains('\n') {
        return StringChange::Multiline;
    }
    StringChange::Plain
}

fn parse_single_pem_certificate(s: &str) -> Option<CertificateSummary> {
    let parsed = pem::parse(s.as_bytes()).ok()?;
    if parsed.tag() != "CERTIFICATE" {
        return None;
    }
    let (_, cert) = x509_parser::parse_x509_certificate(parsed.contents()).ok()?;
    let validity = cert.validity();
    Some(CertificateSummary {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        not_before: validity.not_before.to_string(),
        not_after: validity.not_after.to_string(),
        serial: cert.raw_serial_as_string(),
    })
}

/// Hex-dumps, for the "invalid UTF-8" rendering path — the underlying bytes
/// of a `Node::Binary` that surfaces as a string-shaped Modification.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .map(|chunk| chunk.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_change_is_classified() {
        assert_eq!(classify("text", "text\n\n", &ClassifyOptions::default()), StringChange::Whitespace);
    }

    #[test]
    fn minor_change_within_edit_distance() {
        assert_eq!(classify("foobar", "fOObAr", &ClassifyOptions::default()), StringChange::Minor);
    }

    #[test]
    fn multiline_falls_through_to_stacked_block() {
        let from = "line one\nline two\nline three";
        let to = "line one\nline 2\nline three and some more text to push the ratio past the threshold";
        assert_eq!(classify(from, to, &ClassifyOptions::default()), StringChange::Multiline);
    }

    #[test]
    fn unrelated_short_strings_are_plain() {
        assert_eq!(classify("apple", "zzzzzzzzzzzzzzzzzzzz", &ClassifyOptions::default()), StringChange::Plain);
    }
}
