use crate::{
    Account, Category, CategoryKind, EngineError, Money, ResultEngine, store::LedgerStore,
    util::normalize_required_name,
};

use super::Engine;

impl<S: LedgerStore> Engine<S> {
    pub async fn categories(&self, kind: Option<CategoryKind>) -> ResultEngine<Vec<Category>> {
        self.store.categories(kind).await
    }

    /// Returns the category named `name` of `kind`, creating it if needed.
    pub async fn add_category(&self, name: &str, kind: CategoryKind) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        let category = self.store.find_or_create_category(&name, kind).await?;
        tracing::debug!(category = %category.id, name = %category.name, "category ready");
        Ok(category)
    }

    pub async fn accounts(&self, owner: &str) -> ResultEngine<Vec<Account>> {
        self.store.accounts_by_owner(owner).await
    }

    pub async fn create_user(&self, username: &str, password: &str) -> ResultEngine<()> {
        let username = normalize_required_name(username, "user")?;
        if password.is_empty() {
            return Err(EngineError::InvalidName(
                "password must not be empty".to_string(),
            ));
        }
        self.store.create_user(&username, password).await?;
        tracing::info!(user = %username, "user created");
        Ok(())
    }

    pub async fn create_account(
        &self,
        owner: &str,
        name: &str,
        initial_balance: Money,
    ) -> ResultEngine<Account> {
        let name = normalize_required_name(name, "account")?;
        if self.store.user_password(owner).await?.is_none() {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        let account = Account::new(name, owner.to_string(), initial_balance);
        self.store.create_account(&account).await?;
        tracing::info!(owner, account = %account.id, "account created");
        Ok(account)
    }

    /// Checks a username/password pair.
    pub async fn verify_user(&self, username: &str, password: &str) -> ResultEngine<bool> {
        Ok(self
            .store
            .user_password(username)
            .await?
            .is_some_and(|stored| stored == password))
    }
}
