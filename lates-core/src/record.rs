/// A single late request.
///
/// A `Record` is immutable once constructed. Submitting a new `Record` with
/// the same [`key`] replaces the old one wholesale.
///
/// [`key`]: Record::key
///
/// # Examples
///
/// ```
/// use lates_core::Record;
///
/// let record = Record::new("Ada", true, false);
/// assert_eq!(record.key(), "Ada");
/// assert!(record.wants_vegetarian_option());
/// assert!(!record.wants_refrigeration());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    key: String,
    vegetarian: bool,
    refrigerated: bool,
}

impl Record {
    pub fn new(key: impl Into<String>, vegetarian: bool, refrigerated: bool) -> Record {
        Record {
            key: key.into(),
            vegetarian,
            refrigerated,
        }
    }

    /// The requester's name, which identifies this record.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the requester wants only vegetarian options.
    #[inline]
    pub fn wants_vegetarian_option(&self) -> bool {
        self.vegetarian
    }

    /// Whether the requester wants their late refrigerated.
    #[inline]
    pub fn wants_refrigeration(&self) -> bool {
        self.refrigerated
    }
}
