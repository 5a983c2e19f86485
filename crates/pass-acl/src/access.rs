//! Access modes
//!
//! [`Access`] is the set of capabilities granted to one agent at one scope.

use pass_graph::vocab::acl;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::ops::BitOr;

/// Read/append/write/control capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Access {
    /// Read contents
    pub read: bool,
    /// Add to contents
    pub append: bool,
    /// Replace or delete contents
    pub write: bool,
    /// Read and change the access-control graph itself
    pub control: bool,
}

impl Access {
    /// Every capability
    pub const FULL: Self = Self {
        read: true,
        append: true,
        write: true,
        control: true,
    };

    /// No capability
    pub const NONE: Self = Self {
        read: false,
        append: false,
        write: false,
        control: false,
    };

    /// Read only
    pub const READ_ONLY: Self = Self {
        read: true,
        append: false,
        write: false,
        control: false,
    };

    /// Whether no capability is granted
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.read || self.append || self.write || self.control)
    }

    /// Whether every capability in `other` is also in `self`
    #[inline]
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        (self.read || !other.read)
            && (self.append || !other.append)
            && (self.write || !other.write)
            && (self.control || !other.control)
    }

    /// Number of granted capabilities
    #[must_use]
    pub fn count(&self) -> usize {
        [self.read, self.append, self.write, self.control]
            .into_iter()
            .filter(|granted| *granted)
            .count()
    }

    /// Mode IRIs of the granted capabilities, in a fixed order
    #[must_use]
    pub fn mode_iris(&self) -> Vec<&'static str> {
        let mut modes = Vec::with_capacity(4);
        if self.read {
            modes.push(acl::READ);
        }
        if self.append {
            modes.push(acl::APPEND);
        }
        if self.write {
            modes.push(acl::WRITE);
        }
        if self.control {
            modes.push(acl::CONTROL);
        }
        modes
    }

    /// Rebuild from mode IRIs; unknown IRIs are reported back
    ///
    /// # Errors
    /// Returns the first IRI that is not an access mode
    pub fn from_mode_iris<'a>(iris: impl IntoIterator<Item = &'a str>) -> Result<Self, &'a str> {
        let mut access = Self::NONE;
        for iri in iris {
            match iri {
                acl::READ => access.read = true,
                acl::APPEND => access.append = true,
                acl::WRITE => access.write = true,
                acl::CONTROL => access.control = true,
                other => return Err(other),
            }
        }
        Ok(access)
    }
}

impl BitOr for Access {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            read: self.read || rhs.read,
            append: self.append || rhs.append,
            write: self.write || rhs.write,
            control: self.control || rhs.control,
        }
    }
}

impl Display for Access {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let flag = |on: bool, c: char| if on { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            flag(self.read, 'r'),
            flag(self.append, 'a'),
            flag(self.write, 'w'),
            flag(self.control, 'c')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants() {
        assert_eq!(Access::FULL.count(), 4);
        assert!(Access::NONE.is_empty());
        assert_eq!(Access::READ_ONLY.mode_iris(), vec![acl::READ]);
    }

    #[test]
    fn containment() {
        assert!(Access::FULL.contains(Access::READ_ONLY));
        assert!(!Access::READ_ONLY.contains(Access::FULL));
        assert!(Access::NONE.contains(Access::NONE));
    }

    #[test]
    fn mode_iris_round_trip() {
        let access = Access {
            append: true,
            control: true,
            ..Access::NONE
        };
        assert_eq!(Access::from_mode_iris(access.mode_iris()), Ok(access));
        assert_eq!(Access::from_mode_iris(["urn:nope"]), Err("urn:nope"));
    }

    #[test]
    fn display_flags() {
        assert_eq!(Access::FULL.to_string(), "rawc");
        assert_eq!(Access::READ_ONLY.to_string(), "r---");
        assert_eq!((Access::READ_ONLY | Access { write: true, ..Access::NONE }).to_string(), "r-w-");
    }
}
