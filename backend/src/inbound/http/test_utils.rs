//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use mockable::Clock as _;

use crate::domain::ports::{
    MockAccountCommand, MockArticleCommand, MockArticleQuery, MockCategoryCommand,
    MockCategoryQuery, MockIdentityResolver, MockLoginService,
};
use crate::domain::{EmailAddress, Identity, PersonName, TokenService, UserId};
use crate::test_support::{MutableClock, TEST_TOKEN_SECRET};

use super::auth_config::CookiePolicy;
use super::state::{HttpState, HttpStatePorts};

/// Mocks for every port in [`HttpState`]. Unused mocks panic if called.
#[derive(Default)]
pub struct TestPorts {
    pub login: MockLoginService,
    pub identities: MockIdentityResolver,
    pub accounts: MockAccountCommand,
    pub categories: MockCategoryCommand,
    pub categories_query: MockCategoryQuery,
    pub articles: MockArticleCommand,
    pub articles_query: MockArticleQuery,
}

impl TestPorts {
    /// Wrap the mocks in handler state with insecure cookies for plain HTTP.
    pub fn into_state(self) -> web::Data<HttpState> {
        let ports = HttpStatePorts {
            login: Arc::new(self.login),
            identities: Arc::new(self.identities),
            accounts: Arc::new(self.accounts),
            categories: Arc::new(self.categories),
            categories_query: Arc::new(self.categories_query),
            articles: Arc::new(self.articles),
            articles_query: Arc::new(self.articles_query),
        };
        let cookies = CookiePolicy {
            secure: false,
            ..CookiePolicy::default()
        };
        web::Data::new(HttpState::new(ports, cookies))
    }
}

/// State whose only live port is the given resolver.
pub fn state_with_resolver(identities: MockIdentityResolver) -> web::Data<HttpState> {
    TestPorts {
        identities,
        ..TestPorts::default()
    }
    .into_state()
}

/// Active identity with the given email.
pub fn sample_identity(email: &str) -> Identity {
    Identity {
        id: UserId::random(),
        name: PersonName::new("name", "Ada").expect("valid name"),
        surname: PersonName::new("surname", "Lovelace").expect("valid surname"),
        email: EmailAddress::new(email).expect("valid email"),
        is_active: true,
        created_at: MutableClock::fixed().utc(),
    }
}

/// Token service on a fixed clock, plus the clock to move it.
pub fn test_tokens() -> (Arc<TokenService>, Arc<MutableClock>) {
    let clock = Arc::new(MutableClock::fixed());
    let tokens = TokenService::new(
        TEST_TOKEN_SECRET.to_vec(),
        Duration::minutes(30),
        clock.clone(),
    );
    (Arc::new(tokens), clock)
}
