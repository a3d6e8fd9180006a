use std::{error::Error, fmt, iter};

pub(crate) trait ErrorExt {
    fn display_chain(&self) -> DisplayChain<'_>;
}

impl<E> ErrorExt for E
where
    E: Error + 'static,
{
    /// Returns an object that implements [`Display`] for printing the
    /// error followed by each of its sources, separated by `: `.
    ///
    /// [`Display`]: std::fmt::Display
    fn display_chain(&self) -> DisplayChain<'_> {
        DisplayChain { inner: self }
    }
}

pub(crate) struct DisplayChain<'a> {
    inner: &'a (dyn Error + 'static),
}

impl fmt::Display for DisplayChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chain = iter::successors(Some(self.inner), |err| (*err).source());
        if let Some(first) = chain.next() {
            write!(f, "{first}")?;
        }
        for cause in chain {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use lates_core::archive::Error as ArchiveError;

    use super::*;

    #[test]
    fn chain_includes_sources() {
        let err = ArchiveError::sink(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(err.display_chain().to_string(), "archive sink error: disk full");
    }

    #[test]
    fn chain_walks_nested_sources() {
        let inner = ArchiveError::sink(io::Error::new(io::ErrorKind::Other, "disk full"));
        let err = ArchiveError::sink(inner);
        assert_eq!(
            err.display_chain().to_string(),
            "archive sink error: archive sink error: disk full"
        );
    }

    #[test]
    fn chain_of_leaf_error_is_its_message() {
        let err = ArchiveError::message("audit log unavailable");
        assert_eq!(err.display_chain().to_string(), "audit log unavailable");
    }
}
