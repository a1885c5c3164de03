// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for stored resources.
//!
//! The store filters by owner in its queries. Results are checked again
//! here before they leave the storage layer.

use crate::{auth::AuthenticatedUser, models::Transaction};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> &str;

    fn is_owned_by(&self, user: &AuthenticatedUser) -> bool {
        self.owner_user_id() == user.user_id
    }
}

impl OwnedResource for Transaction {
    fn owner_user_id(&self) -> &str {
        &self.user_id
    }
}

/// Drop every resource not owned by `user`, logging each one dropped.
pub fn retain_owned<T: OwnedResource>(resources: Vec<T>, user: &AuthenticatedUser) -> Vec<T> {
    let before = resources.len();
    let owned: Vec<T> = resources
        .into_iter()
        .filter(|r| r.is_owned_by(user))
        .collect();

    if owned.len() != before {
        tracing::warn!(
            user_id = %user.user_id,
            dropped = before - owned.len(),
            "Store returned rows owned by another user"
        );
    }

    owned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ProviderUser;

    struct TestResource {
        owner: String,
    }

    impl OwnedResource for TestResource {
        fn owner_user_id(&self) -> &str {
            &self.owner
        }
    }

    fn make_user(user_id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(
            ProviderUser {
                id: user_id.to_string(),
                email: None,
            },
            "token",
        )
    }

    #[test]
    fn ownership_check_passes_for_owner() {
        let resource = TestResource {
            owner: "user_123".to_string(),
        };
        assert!(resource.is_owned_by(&make_user("user_123")));
        assert!(!resource.is_owned_by(&make_user("user_456")));
    }

    #[test]
    fn retain_owned_drops_foreign_rows() {
        let resources = vec![
            TestResource {
                owner: "user_123".to_string(),
            },
            TestResource {
                owner: "user_456".to_string(),
            },
            TestResource {
                owner: "user_123".to_string(),
            },
        ];

        let kept = retain_owned(resources, &make_user("user_123"));
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.owner == "user_123"));
    }
}
