//! Public-directory presentation: one card per public persona.
//!
//! Name and chat policies live here as pure functions instead of inline in a
//! data-mapping step, so the behavior is pinned by unit tests.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::persona::PublicPersonaRecord;
use crate::persona::store::PersonaStore;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/initials/svg";
const ANONYMOUS: &str = "Anonymous";

/// What the directory renders for one public persona. `chat_enabled` is
/// false exactly when there is no conversation link.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaCard {
    pub name: String,
    pub avatar_url: String,
    pub conversation_link: Option<String>,
    pub chat_enabled: bool,
}

/// Name policy: trimmed "First Last"; a record with no usable name renders
/// as "Anonymous" rather than being filtered out.
pub fn display_name(first_name: &str, last_name: &str) -> String {
    let name = format!("{} {}", first_name.trim(), last_name.trim());
    let name = name.trim();
    if name.is_empty() {
        ANONYMOUS.to_string()
    } else {
        name.to_string()
    }
}

/// Deterministic generated avatar, seeded by the display name.
pub fn avatar_url(seed: &str) -> String {
    url::Url::parse_with_params(AVATAR_BASE_URL, &[("seed", seed)])
        .expect("avatar base URL is valid")
        .to_string()
}

pub fn to_card(record: PublicPersonaRecord) -> PersonaCard {
    let chat_enabled = record.conversation_link.is_some();
    PersonaCard {
        name: display_name(&record.first_name, &record.last_name),
        avatar_url: record.avatar_url,
        conversation_link: record.conversation_link,
        chat_enabled,
    }
}

/// Fresh query per call; no pagination, no caching.
pub async fn list_directory(personas: &impl PersonaStore) -> Result<Vec<PersonaCard>, AppError> {
    let records = personas.list_public().await?;
    Ok(records.into_iter().map(to_card).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::models::persona::PersonaRow;

    fn record(first: &str, last: &str, link: Option<&str>) -> PublicPersonaRecord {
        PublicPersonaRecord {
            first_name: first.to_string(),
            last_name: last.to_string(),
            avatar_url: "https://example.com/a.svg".to_string(),
            conversation_link: link.map(String::from),
        }
    }

    #[test]
    fn test_display_name_joins_and_trims() {
        assert_eq!(display_name(" Jane ", " Doe "), "Jane Doe");
    }

    #[test]
    fn test_display_name_single_name_only() {
        assert_eq!(display_name("Jane", ""), "Jane");
        assert_eq!(display_name("", "Doe"), "Doe");
    }

    #[test]
    fn test_display_name_blank_is_anonymous() {
        assert_eq!(display_name("", ""), "Anonymous");
        assert_eq!(display_name("  ", "  "), "Anonymous");
    }

    #[test]
    fn test_avatar_url_encodes_seed() {
        let url = avatar_url("Jane Doe");
        assert!(url.starts_with("https://api.dicebear.com/7.x/initials/svg?seed="));
        assert!(url.contains("Jane"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_card_with_link_enables_chat() {
        let card = to_card(record("Jane", "Doe", Some("https://example.com/chat")));
        assert!(card.chat_enabled);
        assert_eq!(
            card.conversation_link.as_deref(),
            Some("https://example.com/chat")
        );
    }

    #[test]
    fn test_card_without_link_disables_chat() {
        let card = to_card(record("Jane", "Doe", None));
        assert!(!card.chat_enabled);
        assert!(card.conversation_link.is_none());
    }

    #[test]
    fn test_nameless_record_is_kept_as_anonymous() {
        let card = to_card(record("", "", Some("https://example.com/chat")));
        assert_eq!(card.name, "Anonymous");
    }

    // In-memory store over mixed rows, applying the same public filter as
    // the SQL query.
    struct MixedStore {
        rows: Vec<(PersonaRow, &'static str, &'static str)>,
    }

    #[async_trait]
    impl PersonaStore for MixedStore {
        async fn find_by_user_id(&self, _user_id: Uuid) -> Result<Option<PersonaRow>, AppError> {
            unreachable!("not used by the directory")
        }

        async fn insert(&self, _persona: &PersonaRow) -> Result<(), AppError> {
            unreachable!("not used by the directory")
        }

        async fn set_visibility(&self, _user_id: Uuid, _is_public: bool) -> Result<bool, AppError> {
            unreachable!("not used by the directory")
        }

        async fn list_public(&self) -> Result<Vec<PublicPersonaRecord>, AppError> {
            Ok(self
                .rows
                .iter()
                .filter(|(p, _, _)| p.is_public)
                .map(|(p, first, last)| PublicPersonaRecord {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    avatar_url: p.avatar_url.clone(),
                    conversation_link: p.conversation_link.clone(),
                })
                .collect())
        }
    }

    fn persona(is_public: bool) -> PersonaRow {
        let now = chrono::Utc::now();
        PersonaRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            avatar_url: "https://example.com/a.svg".to_string(),
            is_public,
            agent_id: "agent".to_string(),
            conversation_link: Some("https://example.com/chat".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_directory_returns_exactly_the_public_subset() {
        let store = MixedStore {
            rows: vec![
                (persona(true), "Jane", "Doe"),
                (persona(false), "Hidden", "User"),
                (persona(true), "John", "Smith"),
            ],
        };

        let cards = list_directory(&store).await.unwrap();

        assert_eq!(cards.len(), 2);
        let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"Jane Doe"));
        assert!(names.contains(&"John Smith"));
        assert!(!names.contains(&"Hidden User"));
    }
}
