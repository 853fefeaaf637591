//! Request-scoped storage for the authenticated member.
//!
//! One slot per request-handling task, installed by the authentication
//! middleware via [`AuthContext::scope`]. The slot is task-local, so identity
//! established for one request is never visible to another request handled
//! concurrently or to a later request on a reused worker thread. `current()`
//! outside a scope is `None`, never a panic.

use std::cell::RefCell;
use std::future::Future;

use super::types::AuthMember;

tokio::task_local! {
    static AUTH_MEMBER: RefCell<Option<AuthMember>>;
}

pub struct AuthContext;

impl AuthContext {
    /// Run `fut` with a fresh, empty context slot. The slot is torn down when
    /// the future completes, whatever way it completes.
    pub async fn scope<F>(fut: F) -> F::Output
    where
        F: Future,
    {
        AUTH_MEMBER.scope(RefCell::new(None), fut).await
    }

    /// Attach the authenticated member to the current request's slot.
    pub fn set(member: AuthMember) {
        let _ = AUTH_MEMBER.try_with(|cell| {
            cell.borrow_mut().replace(member);
        });
    }

    /// The member authenticated for the current request, if any.
    pub fn current() -> Option<AuthMember> {
        AUTH_MEMBER
            .try_with(|cell| cell.borrow().clone())
            .unwrap_or(None)
    }

    /// Empty the current request's slot. Invoked once per request by the
    /// interceptor regardless of how handling terminated.
    pub fn clear() {
        let _ = AUTH_MEMBER.try_with(|cell| {
            cell.borrow_mut().take();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(email: &str) -> AuthMember {
        AuthMember {
            email: email.to_string(),
            nickname: "nick".to_string(),
        }
    }

    #[tokio::test]
    async fn test_set_and_current_within_scope() {
        AuthContext::scope(async {
            assert_eq!(AuthContext::current(), None);
            AuthContext::set(member("u1@example.com"));
            assert_eq!(
                AuthContext::current().map(|m| m.email),
                Some("u1@example.com".to_string())
            );
        })
        .await;
    }

    #[tokio::test]
    async fn test_clear_empties_slot() {
        AuthContext::scope(async {
            AuthContext::set(member("u1@example.com"));
            AuthContext::clear();
            assert_eq!(AuthContext::current(), None);
        })
        .await;
    }

    #[tokio::test]
    async fn test_outside_scope_is_empty_and_harmless() {
        assert_eq!(AuthContext::current(), None);
        // No scope installed: set/clear are no-ops, not panics.
        AuthContext::set(member("u1@example.com"));
        assert_eq!(AuthContext::current(), None);
        AuthContext::clear();
    }

    #[tokio::test]
    async fn test_scopes_do_not_leak_between_tasks() {
        AuthContext::scope(async {
            AuthContext::set(member("u1@example.com"));

            let other = tokio::spawn(AuthContext::scope(async {
                AuthContext::current()
            }));
            assert_eq!(other.await.unwrap(), None);

            // Our own slot is untouched by the other task's scope.
            assert_eq!(
                AuthContext::current().map(|m| m.email),
                Some("u1@example.com".to_string())
            );
        })
        .await;
    }

    #[tokio::test]
    async fn test_sequential_scopes_start_empty() {
        AuthContext::scope(async {
            AuthContext::set(member("u1@example.com"));
        })
        .await;

        AuthContext::scope(async {
            assert_eq!(AuthContext::current(), None);
        })
        .await;
    }
}
