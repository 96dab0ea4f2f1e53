// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization gate over the single configured identity.

use markdone_core::types::UserId;

/// Stateless predicate over the one authorized user.
///
/// With no identity configured the gate is permissive -- an explicit
/// degraded-open policy for development use. Production deployments set
/// `telegram.authorized_user`; the `serve` command warns when it is unset.
///
/// The gate is applied at message intake (logged only -- unauthorized
/// messages are still stored but can never be confirmed) and enforced at
/// reaction-triggered confirmation.
#[derive(Debug, Clone, Copy)]
pub struct AuthGate {
    authorized: Option<UserId>,
}

impl AuthGate {
    pub fn new(authorized: Option<UserId>) -> Self {
        Self { authorized }
    }

    /// Whether the gate is running in the permissive development mode.
    pub fn is_permissive(&self) -> bool {
        self.authorized.is_none()
    }

    /// Returns true iff `user` may confirm tasks.
    ///
    /// A senderless actor (`None`) is only accepted in permissive mode;
    /// with an identity configured it can never match.
    pub fn is_authorized(&self, user: Option<UserId>) -> bool {
        match self.authorized {
            None => true,
            Some(expected) => user == Some(expected),
        }
    }
}
