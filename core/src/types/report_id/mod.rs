use nutype::nutype;

pub const MAX_REPORT_ID_LENGTH: usize = 64;

/// Opaque report identifier.
///
/// Ids issued by the store are decimal milliseconds since the Unix epoch, so
/// they sort by creation time, but callers should treat them as opaque strings.
#[nutype(
    new_unchecked,
    sanitize(trim),
    validate(not_empty, len_char_max = MAX_REPORT_ID_LENGTH),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Borrow,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct ReportId(String);

impl ReportId {
    pub(crate) fn from_millis(millis: u64) -> Self {
        // SAFETY: a decimal rendering of a u64 is non-empty, has no surrounding
        // whitespace and is at most 20 chars long.
        unsafe { Self::new_unchecked(millis.to_string()) }
    }

    /// Numeric value of a store-issued id, `None` for foreign ids.
    pub(crate) fn millis(&self) -> Option<u64> {
        self.as_str().parse().ok()
    }
}
