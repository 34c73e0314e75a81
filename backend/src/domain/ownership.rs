//! Ownership guard for article mutations.

use super::{Article, Error, Identity};

/// Mutation the caller wants to perform on an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Update,
    Delete,
}

impl Mutation {
    pub(crate) fn denial(self) -> &'static str {
        match self {
            Self::Update => "You can only update your own articles",
            Self::Delete => "You can only delete your own articles",
        }
    }
}

/// Allow the mutation iff `caller` authored `article`.
///
/// There is no administrative override.
///
/// # Examples
/// ```
/// # use blog_backend::domain::{ownership::{authorize_mutation, Mutation}, ErrorCode};
/// # fn check(article: &blog_backend::domain::Article, other: &blog_backend::domain::Identity) {
/// let err = authorize_mutation(article, other, Mutation::Delete).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// # }
/// ```
pub fn authorize_mutation(article: &Article, caller: &Identity, mutation: Mutation) -> Result<(), Error> {
    if article.author_id == caller.id {
        Ok(())
    } else {
        Err(Error::forbidden(mutation.denial()))
    }
}
