//! Reading typed fields out of flat triple lists
//!
//! Two lookups are provided:
//!
//! - [`GraphParser::role`] matches a subject whose fragment is exactly the
//!   role's name. This is the primary lookup.
//! - [`GraphParser::subject_containing`] matches the first subject whose
//!   identifier contains a fragment string (e.g. `#message`). Kept for
//!   documents written by older clients; when two subjects share the
//!   fragment, list order decides.
//!
//! Absent predicates read as `None` ("field not recorded"), never as errors.

use crate::graph::{SubjectRole, Triple};
use crate::url::ResourceUrl;
use crate::value::TypedValue;
use chrono::{DateTime, NaiveDate, Utc};

/// Read-only view over a triple list
#[derive(Debug, Clone, Copy)]
pub struct GraphParser<'a> {
    triples: &'a [Triple],
}

impl<'a> GraphParser<'a> {
    /// Wrap a triple list
    #[inline]
    #[must_use]
    pub fn new(triples: &'a [Triple]) -> Self {
        Self { triples }
    }

    /// Locate the subject for a role by exact fragment
    #[must_use]
    pub fn role(&self, role: &SubjectRole) -> Option<SubjectView<'a>> {
        let fragment = role.fragment();
        self.triples
            .iter()
            .find(|t| {
                t.subject
                    .rsplit_once('#')
                    .is_some_and(|(_, frag)| frag == fragment)
            })
            .map(|t| self.view(&t.subject))
    }

    /// Locate the first subject whose identifier contains `fragment`
    #[must_use]
    pub fn subject_containing(&self, fragment: &str) -> Option<SubjectView<'a>> {
        self.triples
            .iter()
            .find(|t| t.subject.contains(fragment))
            .map(|t| self.view(&t.subject))
    }

    /// Locate a subject by its full identifier
    #[must_use]
    pub fn subject(&self, subject: &str) -> Option<SubjectView<'a>> {
        self.triples
            .iter()
            .find(|t| t.subject == subject)
            .map(|t| self.view(&t.subject))
    }

    /// Distinct subjects in first-seen order
    #[must_use]
    pub fn subjects(&self) -> Vec<&'a str> {
        let mut seen: Vec<&'a str> = Vec::new();
        for t in self.triples {
            if !seen.contains(&t.subject.as_str()) {
                seen.push(&t.subject);
            }
        }
        seen
    }

    fn view(&self, subject: &'a str) -> SubjectView<'a> {
        SubjectView {
            subject,
            triples: self.triples,
        }
    }
}

/// Fields of one matched subject
#[derive(Debug, Clone, Copy)]
pub struct SubjectView<'a> {
    subject: &'a str,
    triples: &'a [Triple],
}

impl<'a> SubjectView<'a> {
    /// Full subject identifier
    #[inline]
    #[must_use]
    pub fn subject(&self) -> &'a str {
        self.subject
    }

    /// All values of a predicate on this subject, in list order
    pub fn values(&self, predicate: &'a str) -> impl Iterator<Item = &'a TypedValue> + 'a {
        let subject = self.subject;
        self.triples
            .iter()
            .filter(move |t| t.subject == subject && t.predicate.as_str() == predicate)
            .map(|t| &t.object)
    }

    /// First value of a predicate
    #[must_use]
    pub fn first(&self, predicate: &'a str) -> Option<&'a TypedValue> {
        self.values(predicate).next()
    }

    /// First string value
    #[must_use]
    pub fn string(&self, predicate: &'a str) -> Option<&'a str> {
        self.values(predicate).find_map(TypedValue::as_str)
    }

    /// First timestamp value
    #[must_use]
    pub fn datetime(&self, predicate: &'a str) -> Option<DateTime<Utc>> {
        self.values(predicate).find_map(TypedValue::as_datetime)
    }

    /// First date value
    #[must_use]
    pub fn date(&self, predicate: &'a str) -> Option<NaiveDate> {
        self.values(predicate).find_map(TypedValue::as_date)
    }

    /// First integer value
    #[must_use]
    pub fn integer(&self, predicate: &'a str) -> Option<i64> {
        self.values(predicate).find_map(TypedValue::as_integer)
    }

    /// First URL value
    #[must_use]
    pub fn url(&self, predicate: &'a str) -> Option<&'a ResourceUrl> {
        self.values(predicate).find_map(TypedValue::as_url)
    }

    /// Extract several predicates at once; each is `None` when not recorded
    #[must_use]
    pub fn extract(&self, predicates: &[&'a str]) -> Vec<(&'a str, Option<&'a TypedValue>)> {
        predicates.iter().map(|&p| (p, self.first(p))).collect()
    }
}
