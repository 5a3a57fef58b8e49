use std::{collections::HashMap, sync::Mutex};

use tokio::sync::watch;
use uuid::Uuid;

use crate::{Error, Result};

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// メールアドレスとパスワードによる認証
pub trait IIdentityProvider: Send + Sync {
    /// 登録に成功したらそのままサインインした状態になる
    fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    fn sign_out(&self) -> Result<()>;

    fn current_user(&self) -> Option<Identity>;

    /// セッションの変化を監視する
    fn observe(&self) -> watch::Receiver<Option<Identity>>;
}

struct Account {
    uid: String,
    password: String,
}

/// テストやオフライン実行用の認証
pub struct MemoryIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    session: watch::Sender<Option<Identity>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        let (session, _receiver) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::default()),
            session,
        }
    }

    fn validate_email(email: &str) -> Result<String> {
        let email = email.trim().to_lowercase();
        let Some((local, domain)) = email.split_once('@') else {
            return Err(Error::InvalidEmail);
        };

        if local.is_empty() || !domain.contains('.') || domain.starts_with('.') {
            return Err(Error::InvalidEmail);
        }

        Ok(email)
    }
}

impl Default for MemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IIdentityProvider for MemoryIdentity {
    fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let email = Self::validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::WeakPassword);
        }

        let identity = {
            let mut accounts = self
                .accounts
                .lock()
                .map_err(|_| Error::Store("identity lock poisoned".to_string()))?;
            if accounts.contains_key(&email) {
                return Err(Error::EmailAlreadyInUse);
            }

            let uid = Uuid::new_v4().to_string();
            accounts.insert(
                email.clone(),
                Account {
                    uid: uid.clone(),
                    password: password.to_string(),
                },
            );
            Identity { uid, email }
        };

        log::info!("signed up {}", identity.email);
        self.session.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let email = Self::validate_email(email)?;
        let identity = {
            let accounts = self
                .accounts
                .lock()
                .map_err(|_| Error::Store("identity lock poisoned".to_string()))?;
            let Some(account) = accounts.get(&email) else {
                return Err(Error::InvalidCredentials);
            };

            if account.password != password {
                return Err(Error::InvalidCredentials);
            }

            Identity {
                uid: account.uid.clone(),
                email,
            }
        };

        log::info!("signed in {}", identity.email);
        self.session.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    fn sign_out(&self) -> Result<()> {
        let Some(identity) = self.session.send_replace(None) else {
            return Err(Error::NotSignedIn);
        };

        log::info!("signed out {}", identity.email);
        Ok(())
    }

    fn current_user(&self) -> Option<Identity> {
        self.session.borrow().clone()
    }

    fn observe(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::{IIdentityProvider, MemoryIdentity};
    use crate::Error;

    #[test]
    fn sign_up_then_sign_in() {
        let identity = MemoryIdentity::new();
        let created = identity.sign_up("Ana@Example.com", "secreto").unwrap();
        assert_eq!(created.email, "ana@example.com");
        assert_eq!(identity.current_user(), Some(created.clone()));

        identity.sign_out().unwrap();
        assert_eq!(identity.current_user(), None);

        let signed_in = identity.sign_in("ana@example.com", "secreto").unwrap();
        assert_eq!(signed_in.uid, created.uid);
    }

    #[test]
    fn reject_invalid_input() {
        let identity = MemoryIdentity::new();
        assert!(matches!(
            identity.sign_up("ana", "secreto"),
            Err(Error::InvalidEmail)
        ));
        assert!(matches!(
            identity.sign_up("ana@example.com", "123"),
            Err(Error::WeakPassword)
        ));

        identity.sign_up("ana@example.com", "secreto").unwrap();
        assert!(matches!(
            identity.sign_up("ana@example.com", "otro-secreto"),
            Err(Error::EmailAlreadyInUse)
        ));
        assert!(matches!(
            identity.sign_in("ana@example.com", "equivocado"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn sign_out_without_session() {
        let identity = MemoryIdentity::new();
        assert!(matches!(identity.sign_out(), Err(Error::NotSignedIn)));
    }

    #[test]
    fn observe_session() {
        let identity = MemoryIdentity::new();
        let mut receiver = identity.observe();
        assert!(receiver.borrow_and_update().is_none());

        identity.sign_up("ana@example.com", "secreto").unwrap();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(
            receiver.borrow_and_update().as_ref().map(|x| x.email.as_str()),
            Some("ana@example.com")
        );
    }
}
