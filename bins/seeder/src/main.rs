//! Database seeder for Tally development and testing.
//!
//! Seeds a small chart of accounts, an ingredient catalog and a day of
//! completed point-of-sale orders. Safe to run repeatedly: rows that already
//! exist are skipped.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use tally_db::entities::{accounts, items, pos_orders};
use tally_shared::config::DatabaseConfig;

/// Fixed account ids, so `config/development.toml` can reference them.
const ACCOUNTS: [(&str, &str, &str, bool); 6] = [
    ("00000000-0000-7000-8000-000000000101", "1101", "Petty Cash", true),
    ("00000000-0000-7000-8000-000000000102", "1102", "Bank BCA", true),
    ("00000000-0000-7000-8000-000000000131", "1301", "Inventory - Ingredients", false),
    ("00000000-0000-7000-8000-000000000401", "4101", "Food & Beverage Sales", false),
    ("00000000-0000-7000-8000-000000000601", "6101", "Operational Expense", false),
    ("00000000-0000-7000-8000-000000000602", "6201", "Salaries", false),
];

const ITEMS: [(&str, &str, &str, &str); 8] = [
    ("BB-001", "Cabe Merah Tanjung", "cabe,merah,tanjung", "kg"),
    ("BB-002", "Cabe Rawit Merah", "cabe,rawit,merah", "kg"),
    ("BB-003", "Bawang Merah", "bawang,merah,brambang", "kg"),
    ("BB-004", "Bawang Putih", "bawang,putih", "kg"),
    ("BB-005", "Minyak Goreng", "minyak,goreng,oil", "liter"),
    ("BB-006", "Telur Ayam", "telur,ayam,egg", "kg"),
    ("BB-007", "Beras Premium", "beras,rice", "kg"),
    ("BB-008", "Gas LPG 12kg", "gas,lpg,elpiji", "tabung"),
];

/// Demo outlet for seeded orders.
const OUTLET_ID: &str = "00000000-0000-7000-8000-000000000901";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tally_db::connect(&DatabaseConfig {
        url: database_url,
        max_connections: 1,
        min_connections: 1,
    })
    .await
    .expect("Failed to connect to database");

    println!("Seeding accounts...");
    seed_accounts(&db).await;

    println!("Seeding item catalog...");
    seed_items(&db).await;

    println!("Seeding point-of-sale orders...");
    seed_orders(&db).await;

    println!("Seeding complete!");
    println!("  TALLY__INGEST__INVENTORY_ACCOUNT_ID={}", ACCOUNTS[2].0);
    println!("  TALLY__INGEST__EXPENSE_ACCOUNT_ID={}", ACCOUNTS[4].0);
    println!("  TALLY__INGEST__CASH_ACCOUNT_ID={}", ACCOUNTS[0].0);
}

fn uuid(raw: &str) -> Uuid {
    Uuid::parse_str(raw).expect("hardcoded uuid should be valid")
}

async fn seed_accounts(db: &DatabaseConnection) {
    for (id, code, name, is_cash) in ACCOUNTS {
        let exists = accounts::Entity::find_by_id(uuid(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            println!("  Account {code} already exists, skipping...");
            continue;
        }

        accounts::ActiveModel {
            id: Set(uuid(id)),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            is_cash: Set(is_cash),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .expect("Failed to insert account");
        println!("  Created account {code} {name}");
    }
}

async fn seed_items(db: &DatabaseConnection) {
    for (code, name, keywords, unit) in ITEMS {
        let exists = items::Entity::find()
            .filter(items::Column::Code.eq(code))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            println!("  Item {code} already exists, skipping...");
            continue;
        }

        let now = Utc::now();
        items::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            keywords: Set(keywords.to_string()),
            unit: Set(Some(unit.to_string())),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await
        .expect("Failed to insert item");
        println!("  Created item {code} {name}");
    }
}

async fn seed_orders(db: &DatabaseConnection) {
    let business_date = (Utc::now() - Duration::days(1)).date_naive();
    let prefix = format!("POS-{}", business_date.format("%Y%m%d"));

    let exists = pos_orders::Entity::find()
        .filter(pos_orders::Column::OrderNumber.starts_with(&prefix))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some();
    if exists {
        println!("  Orders for {business_date} already exist, skipping...");
        return;
    }

    let orders: [(&str, &str, &str, Decimal, Decimal); 6] = [
        ("dine-in", "cash", "completed", dec!(125000), dec!(0)),
        ("dine-in", "qris", "completed", dec!(86000), dec!(6000)),
        ("dine-in", "cash", "completed", dec!(47000), dec!(0)),
        ("gofood", "gopay", "completed", dec!(152000), dec!(15200)),
        ("grabfood", "ovo", "completed", dec!(98000), dec!(0)),
        ("dine-in", "cash", "cancelled", dec!(64000), dec!(0)),
    ];

    for (n, (channel, method, status, gross, discount)) in orders.into_iter().enumerate() {
        pos_orders::ActiveModel {
            id: Set(Uuid::now_v7()),
            order_number: Set(format!("{prefix}-{:03}", n + 1)),
            outlet_id: Set(Some(uuid(OUTLET_ID))),
            business_date: Set(business_date),
            channel: Set(channel.to_string()),
            payment_method: Set(method.to_string()),
            status: Set(status.to_string()),
            gross_amount: Set(gross),
            discount_amount: Set(discount),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .expect("Failed to insert order");
    }
    println!("  Created {} orders for {business_date}", orders.len());
}
