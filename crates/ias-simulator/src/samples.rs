//! Canned attestation-authority responses.
//!
//! Shapes follow the authority's v3 report API. The values are fixed sample
//! data, not valid signatures over a real quote.

use serde::Serialize;

/// Signature revocation list: empty, nothing revoked.
pub const SIGRL: &[u8] = b"";

/// Report identifier.
pub const REPORT_ID: &str = "165171271757108173876306223827987629752";
/// Report timestamp, as the authority formats it.
pub const REPORT_TIMESTAMP: &str = "2015-09-29T10:07:26.711023";
/// Report API version.
pub const REPORT_VERSION: u32 = 3;
/// Quote verification status.
pub const QUOTE_STATUS: &str = "OK";

/// Base64 quote body echoed in the report.
pub const QUOTE_BODY: &str = concat!(
    "bjQLnP+zepicpUTmu3gKLHiQHT+zNzh2hRGjBhevoB1L9RIvNEVUxTveLruM0rfj",
    "0WAK1jHDhaXXzOI8d4VFmtvBtMkA/+SNV1tdpcY4BAEl9l2w/j4kSUt26phkV9mG",
    "CE/tCLl4r019GWp0RqhrWACeY2thHbFiEbZamq3/KcXlLZxQjFAjRzRNjAetkcvW",
    "Bor8df9ikvBioJyjgcieced7mprp4wsNvbb1EKJk753ngVAde2uSronrBZxat0Pb",
    "Z1humPrSfaC5lovAOaHvNMk5ubjlI6i++J1HhgjF7PbKNYdY9tJ+bPRScpN5d6dI",
    "/Yg5HbZ5ztp9x78fAF7oeb7q13mUz1czQewXtYu/frNNJxHJk8HZdrEosxiNwYKa",
    "K0w0L1Qz6+WRodp34BPRtyR1Vi1IV43Ki4S6xmUcPLkBukcZyAtv6RGwkafAUSS2",
    "Tu7Olk4JwFjvj5gF2spUa+fPRqB4/tT6/QteOv8USAK4U/iuRZpPDBSt0zFLfMOm",
    "72y9IWHq6nlDzoaTuYJNI9F5P/scD8oFtgDTiZtEyXedHg4tlFnQZSOtE+KKQJPC",
);

/// Base64 report signature.
pub const REPORT_SIGNATURE: &str = concat!(
    "Uh776MCNj1iWUJDLToU9+pHOMasXTvZNhiA9MzH2yDHzQjSPhRSOICQlslN0FCMn",
    "313ju/XvM+3oB2CsgXIVjMLDM8MPCd24nwaOnRe8VR3SWLospQtLDa2BNi4cYiMc",
    "91H5bHf5Cxev0l42NSyBfNGx+2B+1r5ViuXFWsRrF7h+YcI+SSTveK6kKxIzuSDE",
    "Vf60n8D+SjcqM8JKC440a50PXzZXp3eGqngvV7dDpzGL7tOajfK6KhhkPz/Gl4o0",
    "p8amLb/JuhOupks8quD7w7B4qXEusmrNjW+95853zoRs8Cp+t0u5i2XU64oqzqyo",
    "NKteIvT36Uwt85x8K+/MZA==",
);

/// PEM certificate that signed the report.
pub const SIGNING_CERT: &str = concat!(
    "-----BEGIN CERTIFICATE-----\n",
    "rxuLsUdLg73yex8gQD5Ctay+rYLFiugWcgaee7lZFkdyRZx9KzujztATsJcDKWJd\n",
    "VXS/a7s8BQa9WniciltjqMwS8bWZ2lt2A+ta3X2lKcH+DOwbMSN4TNw5r9us5o3B\n",
    "L5P4wM3Tugh35AkcDmVEeNxU/SPs2dvQ1qub9TKiQ2ymXPKgdHyZS165XT8cKsGy\n",
    "KcVv+Z8+qtoA/NWXW7Ze2KU3Lez+JWSf3kFDWJ3gOgEGoUfhUTGoouHoyrwLNW0W\n",
    "8fN7NQoDieZPjoN5RFQjFkId3AZd6mo+8s+SKxu2Vyn7xlwJ1S6FaaxsWinW0SnY\n",
    "ZGdOVyittnnXh0kS0UrGcTIj1KlsCAqkZtct1dvtzqz+933tleU/f5jCl1sZI1Zk\n",
    "q0YkcE9NAjWXhwv/lDIBRRPVZEyBuTBZfb72LwUoUERInZaahaVAcS6V6LT7UszK\n",
    "dkdzsCCDuHeQiLu2YIf5jLtVXWC54ThaHrwcxK8LOiy7JgSfdKOg38D0l79R5YvE\n",
    "-----END CERTIFICATE-----\n",
);

/// Attestation verification report body.
#[derive(Debug, Clone, Serialize)]
pub struct AttestationReport<'a> {
    /// Report identifier.
    pub id: &'a str,
    /// Time the report was issued.
    pub timestamp: &'a str,
    /// Report API version.
    pub version: u32,
    /// Quote verification status.
    #[serde(rename = "isvEnclaveQuoteStatus")]
    pub quote_status: &'a str,
    /// Base64 quote body.
    #[serde(rename = "isvEnclaveQuoteBody")]
    pub quote_body: &'a str,
}

impl AttestationReport<'static> {
    /// The fixed sample report.
    pub fn sample() -> Self {
        Self {
            id: REPORT_ID,
            timestamp: REPORT_TIMESTAMP,
            version: REPORT_VERSION,
            quote_status: QUOTE_STATUS,
            quote_body: QUOTE_BODY,
        }
    }
}
