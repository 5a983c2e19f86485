//! Vocabulary IRIs used by PASS documents, messages, and access control
//!
//! Organized by namespace:
//! - `schema` - schema.org terms for document and message attributes
//! - `foaf` - profile names
//! - `acl` - Web Access Control authorizations
//! - `rdf` - `rdf:type`
//! - `xsd` - literal datatypes

/// schema.org terms
pub mod schema {
    /// Namespace prefix
    pub const NS: &str = "https://schema.org/";

    /// Upload timestamp (datetime)
    pub const UPLOAD_DATE: &str = "https://schema.org/uploadDate";
    /// Modification timestamp (datetime, repeatable)
    pub const DATE_MODIFIED: &str = "https://schema.org/dateModified";
    /// File name
    pub const NAME: &str = "https://schema.org/name";
    /// Document type, or licence identifiers
    pub const IDENTIFIER: &str = "https://schema.org/identifier";
    /// Expiration as entered (`MM/DD/YYYY` or the no-date sentinel)
    pub const END_DATE: &str = "https://schema.org/endDate";
    /// Hex SHA-256 content checksum
    pub const SHA256: &str = "https://schema.org/sha256";
    /// Free-text description
    pub const DESCRIPTION: &str = "https://schema.org/description";
    /// Back-reference to a stored file or identity
    pub const URL: &str = "https://schema.org/url";

    /// Message body
    pub const MESSAGE: &str = "https://schema.org/message";
    /// Message title
    pub const TITLE: &str = "https://schema.org/title";
    /// Sender display name
    pub const SENDER: &str = "https://schema.org/sender";
    /// Recipient display name
    pub const RECIPIENT: &str = "https://schema.org/recipient";

    /// Licence class
    pub const ADDITIONAL_TYPE: &str = "https://schema.org/additionalType";
    /// Licence restrictions
    pub const CONDITIONS_OF_ACCESS: &str = "https://schema.org/conditionsOfAccess";
    /// Licence expiry (date)
    pub const EXPIRES: &str = "https://schema.org/expires";
    /// Given name
    pub const GIVEN_NAME: &str = "https://schema.org/givenName";
    /// Middle name
    pub const ALTERNATE_NAME: &str = "https://schema.org/alternateName";
    /// Family name
    pub const FAMILY_NAME: &str = "https://schema.org/familyName";
    /// Name truncation flags
    pub const ADDITIONAL_NAME: &str = "https://schema.org/additionalName";
    /// Issue date (date)
    pub const DATE_ISSUED: &str = "https://schema.org/dateIssued";
    /// Birth date (date)
    pub const BIRTH_DATE: &str = "https://schema.org/birthDate";
    /// Gender code
    pub const GENDER: &str = "https://schema.org/gender";
    /// Eye colour code
    pub const EYE_COLOR: &str = "https://schema.org/eyeColor";
    /// Height in inches (integer)
    pub const HEIGHT: &str = "https://schema.org/height";
    /// Street address
    pub const STREET_ADDRESS: &str = "https://schema.org/streetAddress";
    /// City
    pub const ADDRESS_LOCALITY: &str = "https://schema.org/addressLocality";
    /// State or region
    pub const ADDRESS_REGION: &str = "https://schema.org/addressRegion";
    /// Postal code
    pub const POSTAL_CODE: &str = "https://schema.org/postalCode";
    /// Country
    pub const ADDRESS_COUNTRY: &str = "https://schema.org/addressCountry";
}

/// FOAF terms
pub mod foaf {
    /// Profile display name
    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
}

/// Web Access Control terms
pub mod acl {
    /// Namespace prefix
    pub const NS: &str = "http://www.w3.org/ns/auth/acl#";

    /// `acl:Authorization` class
    pub const AUTHORIZATION: &str = "http://www.w3.org/ns/auth/acl#Authorization";
    /// Resource the authorization applies to
    pub const ACCESS_TO: &str = "http://www.w3.org/ns/auth/acl#accessTo";
    /// Container whose members inherit the authorization
    pub const DEFAULT: &str = "http://www.w3.org/ns/auth/acl#default";
    /// Agent being granted access
    pub const AGENT: &str = "http://www.w3.org/ns/auth/acl#agent";
    /// Agent class (used for the public)
    pub const AGENT_CLASS: &str = "http://www.w3.org/ns/auth/acl#agentClass";
    /// Granted mode
    pub const MODE: &str = "http://www.w3.org/ns/auth/acl#mode";

    /// Read mode
    pub const READ: &str = "http://www.w3.org/ns/auth/acl#Read";
    /// Append mode
    pub const APPEND: &str = "http://www.w3.org/ns/auth/acl#Append";
    /// Write mode
    pub const WRITE: &str = "http://www.w3.org/ns/auth/acl#Write";
    /// Control mode
    pub const CONTROL: &str = "http://www.w3.org/ns/auth/acl#Control";
}

/// RDF vocabulary constants
pub mod rdf {
    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// XSD datatype IRIs
pub mod xsd {
    /// xsd:string
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// xsd:date
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    /// xsd:dateTime
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// xsd:integer
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// xsd:anyURI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
}

/// Public agent class (`foaf:Agent`)
pub const PUBLIC_AGENT_CLASS: &str = "http://xmlns.com/foaf/0.1/Agent";
