use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Transaction;

use crate::account::errors::AccountError;
use crate::account::models::AccountId;
use crate::account::models::AccountType;
use crate::account::models::BusinessProfile;
use crate::account::models::BusinessUser;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;
use crate::account::models::InspectorProfile;
use crate::account::models::InspectorUser;
use crate::account::ports::AccountRepository;

const EMAIL_TYPE_CONSTRAINT: &str = "account_email_type_key";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'_, Postgres>, AccountError> {
        self.pool
            .begin()
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }

    async fn insert_account(
        tx: &mut Transaction<'_, Postgres>,
        email: &EmailAddress,
        password_hash: &str,
        account_type: AccountType,
    ) -> Result<AccountId, AccountError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO account (type, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(account_type.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(&mut **tx)
        .await
        .map(AccountId)
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(EMAIL_TYPE_CONSTRAINT)
                {
                    return AccountError::EmailAlreadyExists(email.as_str().to_string());
                }
            }
            AccountError::DatabaseError(e.to_string())
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: i64,
    password_hash: String,
}

#[derive(sqlx::FromRow)]
struct BusinessUserRow {
    id: i64,
    email: String,
    first_name: String,
    patronymic_name: String,
    last_name: String,
    business_name: String,
}

#[derive(sqlx::FromRow)]
struct InspectorUserRow {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn account_exists(
        &self,
        id: AccountId,
        account_type: AccountType,
    ) -> Result<bool, AccountError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM account
                WHERE id = $1 AND type = $2
            )
            "#,
        )
        .bind(id.0)
        .bind(account_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
        account_type: AccountType,
    ) -> Result<Option<Credentials>, AccountError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT id, password_hash
            FROM account
            WHERE email = $1 AND type = $2
            "#,
        )
        .bind(email.as_str())
        .bind(account_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(row.map(|r| Credentials {
            account_id: AccountId(r.id),
            password_hash: r.password_hash,
        }))
    }

    async fn create_business_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
        profile: &BusinessProfile,
    ) -> Result<AccountId, AccountError> {
        let mut tx = self.begin().await?;

        let account_id =
            Self::insert_account(&mut tx, email, password_hash, AccountType::Business).await?;

        sqlx::query(
            r#"
            INSERT INTO business_user (account_id, first_name, patronymic_name, last_name, business_name)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account_id.0)
        .bind(&profile.first_name)
        .bind(&profile.patronymic_name)
        .bind(&profile.last_name)
        .bind(&profile.business_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(account_id)
    }

    async fn get_business_user(
        &self,
        id: AccountId,
    ) -> Result<Option<BusinessUser>, AccountError> {
        let row = sqlx::query_as::<_, BusinessUserRow>(
            r#"
            SELECT a.id, a.email, b.first_name, b.patronymic_name, b.last_name, b.business_name
            FROM business_user b
            JOIN account a ON a.id = b.account_id
            WHERE a.id = $1 AND a.type = 'business'
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(BusinessUser {
                account_id: AccountId(r.id),
                email: EmailAddress::new(r.email)?,
                profile: BusinessProfile {
                    first_name: r.first_name,
                    patronymic_name: r.patronymic_name,
                    last_name: r.last_name,
                    business_name: r.business_name,
                },
            })),
            None => Ok(None),
        }
    }

    async fn update_business_user(
        &self,
        id: AccountId,
        profile: &BusinessProfile,
    ) -> Result<(), AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE business_user
            SET first_name = $2, patronymic_name = $3, last_name = $4, business_name = $5
            WHERE account_id = $1
            "#,
        )
        .bind(id.0)
        .bind(&profile.first_name)
        .bind(&profile.patronymic_name)
        .bind(&profile.last_name)
        .bind(&profile.business_name)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn create_inspector_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
        profile: &InspectorProfile,
    ) -> Result<AccountId, AccountError> {
        let mut tx = self.begin().await?;

        let account_id =
            Self::insert_account(&mut tx, email, password_hash, AccountType::Authority).await?;

        sqlx::query(
            r#"
            INSERT INTO inspector_user (account_id, first_name, last_name)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(account_id.0)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(account_id)
    }

    async fn get_inspector_user(
        &self,
        id: AccountId,
    ) -> Result<Option<InspectorUser>, AccountError> {
        let row = sqlx::query_as::<_, InspectorUserRow>(
            r#"
            SELECT a.id, a.email, i.first_name, i.last_name
            FROM inspector_user i
            JOIN account a ON a.id = i.account_id
            WHERE a.id = $1 AND a.type = 'authority'
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(InspectorUser {
                account_id: AccountId(r.id),
                email: EmailAddress::new(r.email)?,
                profile: InspectorProfile {
                    first_name: r.first_name,
                    last_name: r.last_name,
                },
            })),
            None => Ok(None),
        }
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), AccountError> {
        let mut tx = self.begin().await?;

        // Profiles outlive the account so past activity stays attributable
        for statement in [
            "UPDATE business_user SET account_id = NULL WHERE account_id = $1",
            "UPDATE inspector_user SET account_id = NULL WHERE account_id = $1",
        ] {
            sqlx::query(statement)
                .bind(id.0)
                .execute(&mut *tx)
                .await
                .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        }

        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }

        tx.commit()
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), AccountError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }
}
