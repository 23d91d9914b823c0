//! SQLite implementation of the PersonRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NewPerson, Person};
use crate::domain::ports::PersonRepository;

/// Person record store over the `persons` table.
#[derive(Clone)]
pub struct SqlitePersonRepository {
    pool: SqlitePool,
}

impl SqlitePersonRepository {
    /// Wrap an already migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for SqlitePersonRepository {
    async fn create(&self, person: &NewPerson) -> DomainResult<Person> {
        // RETURNING keeps id assignment on the same statement, whatever
        // connection the pool hands out.
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO persons (name, surname, patronymic, age, gender, nationality)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING id"#
        )
        .bind(&person.name)
        .bind(&person.surname)
        .bind(&person.patronymic)
        .bind(i64::from(person.age))
        .bind(&person.gender)
        .bind(&person.nationality)
        .fetch_one(&self.pool)
        .await?;

        Ok(person.clone().with_id(id))
    }

    async fn get(&self, id: i64) -> DomainResult<Option<Person>> {
        let row: Option<PersonRow> = sqlx::query_as(
            "SELECT id, name, surname, patronymic, age, gender, nationality FROM persons WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_by_name(&self, name: &str) -> DomainResult<Option<Person>> {
        let row: Option<PersonRow> = sqlx::query_as(
            "SELECT id, name, surname, patronymic, age, gender, nationality FROM persons WHERE name = ? ORDER BY id LIMIT 1"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(&self, person: &Person) -> DomainResult<Person> {
        let result = sqlx::query(
            r#"UPDATE persons SET name = ?, surname = ?, patronymic = ?, age = ?, gender = ?, nationality = ?
               WHERE id = ?"#
        )
        .bind(&person.name)
        .bind(&person.surname)
        .bind(&person.patronymic)
        .bind(i64::from(person.age))
        .bind(&person.gender)
        .bind(&person.nationality)
        .bind(person.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PersonNotFound(person.id));
        }

        Ok(person.clone())
    }

    async fn delete(&self, id: i64) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct PersonRow {
    id: i64,
    name: String,
    surname: String,
    patronymic: Option<String>,
    age: i64,
    gender: String,
    nationality: String,
}

impl TryFrom<PersonRow> for Person {
    type Error = DomainError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let age = u32::try_from(row.age)
            .map_err(|_| DomainError::SerializationError(format!("age out of range for person {}: {}", row.id, row.age)))?;

        Ok(Person {
            id: row.id,
            name: row.name,
            surname: row.surname,
            patronymic: row.patronymic,
            age,
            gender: row.gender,
            nationality: row.nationality,
        })
    }
}
