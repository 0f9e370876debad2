//! git::credentials
//!
//! Bridges an [`AuthStrategy`] to libgit2's credential callback.
//!
//! libgit2 calls the credential callback again after the server rejects a
//! credential. Each credential kind is offered at most once, so a rejected
//! credential ends the operation with an error instead of looping.

use git2::{Cred, CredentialType, RemoteCallbacks};

use crate::auth::{AuthStrategy, KeySource};

/// SSH user when neither the URL nor the configuration names one.
pub const DEFAULT_SSH_USER: &str = "git";

/// Build remote callbacks that answer credential requests from `auth`.
pub(crate) fn remote_callbacks(auth: &AuthStrategy) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    let mut offered = CredentialType::empty();

    callbacks.credentials(move |url, username_from_url, allowed| {
        let kind = credential_kind(auth, allowed).ok_or_else(|| {
            git2::Error::from_str(&format!(
                "no {} credential acceptable to {url}",
                auth.auth_type()
            ))
        })?;
        if offered.contains(kind) {
            return Err(git2::Error::from_str(&format!(
                "authentication rejected by {url}"
            )));
        }
        offered.insert(kind);
        tracing::debug!(%url, auth = %auth.auth_type(), "offering credentials");
        make_credential(auth, kind, username_from_url)
    });

    callbacks
}

/// Which credential kind to answer with, given what the server allows.
fn credential_kind(auth: &AuthStrategy, allowed: CredentialType) -> Option<CredentialType> {
    let wanted = match auth {
        AuthStrategy::None => CredentialType::DEFAULT,
        AuthStrategy::HttpBasic { .. } => CredentialType::USER_PASS_PLAINTEXT,
        // libgit2 asks for the bare username first when the URL has none
        AuthStrategy::SshKey { .. } if allowed.contains(CredentialType::USERNAME) => {
            CredentialType::USERNAME
        }
        AuthStrategy::SshKey { .. } => CredentialType::SSH_KEY,
    };
    allowed.contains(wanted).then_some(wanted)
}

fn make_credential(
    auth: &AuthStrategy,
    kind: CredentialType,
    username_from_url: Option<&str>,
) -> Result<Cred, git2::Error> {
    match auth {
        AuthStrategy::None => Cred::default(),
        AuthStrategy::HttpBasic { username, password } => {
            Cred::userpass_plaintext(username, password)
        }
        AuthStrategy::SshKey {
            username,
            passphrase,
            key,
        } => {
            let user = ssh_user(username_from_url, username.as_deref());
            if kind == CredentialType::USERNAME {
                return Cred::username(user);
            }
            match key {
                KeySource::Path(path) => Cred::ssh_key(user, None, path, passphrase.as_deref()),
                KeySource::Inline(pem) => {
                    Cred::ssh_key_from_memory(user, None, pem, passphrase.as_deref())
                }
            }
        }
    }
}

/// The URL's user wins, then the configured one, then [`DEFAULT_SSH_USER`].
fn ssh_user<'a>(from_url: Option<&'a str>, configured: Option<&'a str>) -> &'a str {
    from_url
        .filter(|u| !u.is_empty())
        .or(configured)
        .unwrap_or(DEFAULT_SSH_USER)
}
