//! Media role classification and vocabulary resolution.

use herbex_storage::{RecordSource, TermId};

use crate::{Error, Result};

/// The media derivative roles the export resolves per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaRole {
    /// The originally ingested file.
    Original,
    /// The service derivative served to viewers.
    Service,
    /// The thumbnail derivative.
    Thumbnail,
}

impl MediaRole {
    /// All roles, in export column order.
    pub const ALL: [Self; 3] = [Self::Original, Self::Service, Self::Thumbnail];

    /// The term name this role carries in the media-use vocabulary.
    #[must_use]
    pub fn term_name(&self) -> &'static str {
        match self {
            Self::Original => "Original File",
            Self::Service => "Service File",
            Self::Thumbnail => "Thumbnail Image",
        }
    }
}

impl std::fmt::Display for MediaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Service => write!(f, "service"),
            Self::Thumbnail => write!(f, "thumbnail"),
        }
    }
}

/// Mapping from media roles to their vocabulary term identifiers.
///
/// Resolved once per export run. Each role name must map to exactly one
/// term; a missing or duplicated name is a configuration error, never a
/// per-record one.
#[derive(Debug, Clone)]
pub struct MediaRoleRegistry {
    original: TermId,
    service: TermId,
    thumbnail: TermId,
}

impl MediaRoleRegistry {
    /// Resolves all three role names against the given vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if any role name resolves to zero
    /// terms or to more than one.
    pub async fn resolve(source: &dyn RecordSource, vocabulary: &str) -> Result<Self> {
        let original = resolve_one(source, vocabulary, MediaRole::Original).await?;
        let service = resolve_one(source, vocabulary, MediaRole::Service).await?;
        let thumbnail = resolve_one(source, vocabulary, MediaRole::Thumbnail).await?;
        Ok(Self {
            original,
            service,
            thumbnail,
        })
    }

    /// Classifies a media-use term, if it matches one of the three roles.
    #[must_use]
    pub fn classify(&self, usage: &TermId) -> Option<MediaRole> {
        if *usage == self.original {
            Some(MediaRole::Original)
        } else if *usage == self.service {
            Some(MediaRole::Service)
        } else if *usage == self.thumbnail {
            Some(MediaRole::Thumbnail)
        } else {
            None
        }
    }

    /// Returns the term identifier a role resolved to.
    #[must_use]
    pub fn term(&self, role: MediaRole) -> &TermId {
        match role {
            MediaRole::Original => &self.original,
            MediaRole::Service => &self.service,
            MediaRole::Thumbnail => &self.thumbnail,
        }
    }
}

async fn resolve_one(
    source: &dyn RecordSource,
    vocabulary: &str,
    role: MediaRole,
) -> Result<TermId> {
    let name = role.term_name();
    let mut matches = source.resolve_terms(vocabulary, name).await?;
    match matches.len() {
        0 => Err(Error::Configuration(format!(
            "term \"{name}\" not found in vocabulary \"{vocabulary}\""
        ))),
        1 => Ok(matches.remove(0)),
        n => Err(Error::Configuration(format!(
            "term \"{name}\" is ambiguous in vocabulary \"{vocabulary}\": {n} matches"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herbex_db_memory::InMemorySource;

    async fn seeded_source() -> InMemorySource {
        let source = InMemorySource::new();
        for role in MediaRole::ALL {
            source.add_term("media_use", role.term_name()).await;
        }
        source
    }

    #[tokio::test]
    async fn test_resolve_all_roles() {
        let source = seeded_source().await;
        let registry = MediaRoleRegistry::resolve(&source, "media_use")
            .await
            .expect("resolution should succeed");

        for role in MediaRole::ALL {
            assert_eq!(registry.classify(registry.term(role)), Some(role));
        }
        assert_eq!(registry.classify(&TermId::new("unrelated")), None);
    }

    #[tokio::test]
    async fn test_missing_role_is_configuration_error() {
        let source = InMemorySource::new();
        source.add_term("media_use", "Original File").await;

        let err = MediaRoleRegistry::resolve(&source, "media_use")
            .await
            .expect_err("should fail");
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("Service File"));
    }

    #[tokio::test]
    async fn test_duplicate_role_is_configuration_error() {
        let source = seeded_source().await;
        source.add_term("media_use", "Service File").await;

        let err = MediaRoleRegistry::resolve(&source, "media_use")
            .await
            .expect_err("should fail");
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(MediaRole::Original.to_string(), "original");
        assert_eq!(MediaRole::Thumbnail.term_name(), "Thumbnail Image");
    }
}
