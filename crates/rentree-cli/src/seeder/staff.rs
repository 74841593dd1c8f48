//! Staff account creation and seeding.

use std::time::Instant;

use anyhow::{Context, anyhow};
use fake::Fake;
use fake::faker::name::fr_fr::{FirstName, LastName};
use rayon::prelude::*;
use rentree_core::hash_password;
use rentree_models::{CreateUserDto, UserId, roles};
use sqlx::{PgPool, Postgres, Transaction};
use validator::Validate;

use super::models::StaffSeed;

/// Creates one staff account. Fails when the email is already taken.
pub async fn create_user(db: &PgPool, dto: &CreateUserDto) -> anyhow::Result<UserId> {
    dto.validate().context("Invalid user")?;
    let password_hash = hash_password(&dto.password).map_err(|e| e.error)?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (first_name, last_name, email, password, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(&dto.first_name)
    .bind(&dto.last_name)
    .bind(&dto.email)
    .bind(&password_hash)
    .bind(&dto.role)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| anyhow!("User with email {} already exists", dto.email))
}

/// Generates secretaries sharing one password hash.
pub fn generate_staff(count: usize, password_hash: &str) -> Vec<StaffSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+secretary{}@example.com",
                slug(&first_name),
                slug(&last_name),
                idx
            );

            StaffSeed {
                first_name,
                last_name,
                email,
                password_hash: password_hash.to_string(),
                role: roles::SECRETARY,
            }
        })
        .collect()
}

fn slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

pub async fn seed_staff(db: &PgPool, count: usize, password: &str) -> anyhow::Result<Vec<UserId>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} secretaries...", count);

    let password_hash = hash_password(password).map_err(|e| e.error)?;
    let staff = generate_staff(count, &password_hash);
    let ids = insert_staff_batch(db, &staff).await?;

    println!(
        "   ✓ Inserted {} staff users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts staff in multi-row batches inside one transaction.
pub async fn insert_staff_batch(db: &PgPool, staff: &[StaffSeed]) -> anyhow::Result<Vec<UserId>> {
    let mut tx = db.begin().await?;

    // 5 params per user
    const BATCH_SIZE: usize = 1000;

    let mut ids = Vec::with_capacity(staff.len());
    for chunk in staff.chunks(BATCH_SIZE) {
        ids.extend(insert_staff_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(ids)
}

async fn insert_staff_chunk(
    tx: &mut Transaction<'_, Postgres>,
    staff: &[StaffSeed],
) -> anyhow::Result<Vec<UserId>> {
    if staff.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO users (first_name, last_name, email, password, role) VALUES ");
    for i in 0..staff.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5
        ));
    }
    query.push_str(" ON CONFLICT (email) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, UserId>(&query);
    for user in staff {
        q = q
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_staff_have_unique_emails() {
        let staff = generate_staff(20, "hash");
        let mut emails: Vec<&str> = staff.iter().map(|s| s.email.as_str()).collect();
        emails.sort();
        emails.dedup();

        assert_eq!(emails.len(), 20);
        assert!(staff.iter().all(|s| s.role == roles::SECRETARY));
        assert!(staff.iter().all(|s| s.email.ends_with("@example.com")));
    }

    #[test]
    fn test_slug_drops_accents_and_spaces() {
        assert_eq!(slug("Lefèvre Dupont"), "lefvredupont");
    }
}
