//! PASS Access Control
//!
//! Composition of access-control graphs for Pod resources and containers.
//!
//! # Core Concepts
//!
//! - [`Access`]: read/append/write/control capabilities
//! - [`Agent`] / [`Scope`]: who a grant applies to and what it covers
//! - [`AccessControlGraph`]: grants attached to one resource
//! - [`AccessControlComposer`]: pure, fixed-order grant composition
//!
//! # Example
//!
//! ```rust
//! use pass_acl::{Access, AccessControlComposer, AccessControlGraph, Agent, Scope};
//! use pass_graph::ResourceUrl;
//!
//! let container = ResourceUrl::parse("https://alice.example/PASS/Passport/")?;
//! let alice = ResourceUrl::parse("https://alice.example/profile/card#me")?;
//!
//! let acl = AccessControlComposer::new().compose(
//!     AccessControlGraph::new(container),
//!     &alice,
//!     Access::FULL,
//!     None,
//! );
//! assert_eq!(acl.access(&Agent::Identity(alice), Scope::ContainerDefault), Access::FULL);
//! assert!(!acl.has_public());
//! # Ok::<(), pass_graph::GraphError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod access;
mod composer;
mod error;
mod graph;

pub use access::Access;
pub use composer::AccessControlComposer;
pub use error::AclError;
pub use graph::{AccessControlGraph, Agent, Grant, Scope};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pass_graph::ResourceUrl;
    use proptest::prelude::*;

    fn access_strategy() -> impl Strategy<Value = Access> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(read, append, write, control)| Access {
                read,
                append,
                write,
                control,
            },
        )
    }

    fn container() -> ResourceUrl {
        ResourceUrl::parse("https://alice.pod.example/PASS/Bank_Statement/").unwrap()
    }

    fn alice() -> ResourceUrl {
        ResourceUrl::parse("https://alice.pod.example/profile/card#me").unwrap()
    }

    proptest! {
        #[test]
        fn identity_grant_is_exactly_what_was_asked(access in access_strategy(), public in proptest::option::of(access_strategy())) {
            let acl = AccessControlComposer::new().compose(AccessControlGraph::new(container()), &alice(), access, public);
            let agent = Agent::Identity(alice());
            prop_assert_eq!(acl.access(&agent, Scope::Resource), access);
            prop_assert_eq!(acl.access(&agent, Scope::ContainerDefault), access);
        }

        #[test]
        fn public_is_never_implied(access in access_strategy()) {
            let acl = AccessControlComposer::new().compose(AccessControlGraph::new(container()), &alice(), access, None);
            prop_assert_eq!(acl.access(&Agent::Public, Scope::Resource), Access::NONE);
            prop_assert_eq!(acl.access(&Agent::Public, Scope::ContainerDefault), Access::NONE);
        }

        #[test]
        fn public_grants_only_add(first in access_strategy(), second in access_strategy()) {
            let composer = AccessControlComposer::new();
            let acl = composer.grant_public(AccessControlGraph::new(container()), first);
            let acl = composer.grant_public(acl, second);
            let granted = acl.access(&Agent::Public, Scope::Resource);
            prop_assert!(granted.contains(first));
            prop_assert!(granted.contains(second));
            prop_assert_eq!(granted, first | second);
        }

        #[test]
        fn export_round_trips(access in access_strategy(), public in access_strategy()) {
            let acl = AccessControlComposer::new().compose(AccessControlGraph::new(container()), &alice(), access, Some(public));
            let exported = acl.to_attribute_graph().unwrap();
            let back = AccessControlGraph::from_attribute_graph(container(), &exported).unwrap();
            let agent = Agent::Identity(alice());
            prop_assert_eq!(back.access(&agent, Scope::Resource), access);
            prop_assert_eq!(back.access(&Agent::Public, Scope::ContainerDefault), public);
        }
    }
}
