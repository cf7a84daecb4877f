// retail-etl-core/src/domain/schema.rs
//
// Star schema of the retail orders warehouse: five dimensions and one fact table.
// Every insert skips rows whose natural key is already stored, so loading the
// same rows twice is a no-op.

/// A named, parameterized insert statement (`?` placeholders in column order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertTemplate {
    pub name: &'static str,
    pub table: &'static str,
    pub sql: &'static str,
}

// --- DROP ---
// Fact first: it holds the foreign keys. Sequences last: the tables default on them.
pub const DROP_STATEMENTS: [&str; 10] = [
    "DROP TABLE IF EXISTS fact_sales",
    "DROP TABLE IF EXISTS dim_ship_mode",
    "DROP TABLE IF EXISTS dim_segment",
    "DROP TABLE IF EXISTS dim_location",
    "DROP TABLE IF EXISTS dim_product",
    "DROP TABLE IF EXISTS dim_date",
    "DROP SEQUENCE IF EXISTS seq_ship_mode_id",
    "DROP SEQUENCE IF EXISTS seq_segment_id",
    "DROP SEQUENCE IF EXISTS seq_location_id",
    "DROP SEQUENCE IF EXISTS seq_fact_id",
];

// --- CREATE ---
pub const CREATE_STATEMENTS: [&str; 10] = [
    "CREATE SEQUENCE seq_ship_mode_id START 1",
    "CREATE SEQUENCE seq_segment_id START 1",
    "CREATE SEQUENCE seq_location_id START 1",
    "CREATE SEQUENCE seq_fact_id START 1",
    "CREATE TABLE dim_ship_mode (
        ship_mode_id INTEGER PRIMARY KEY DEFAULT nextval('seq_ship_mode_id'),
        ship_mode VARCHAR(50) NOT NULL UNIQUE
    )",
    "CREATE TABLE dim_segment (
        segment_id INTEGER PRIMARY KEY DEFAULT nextval('seq_segment_id'),
        segment VARCHAR(50) NOT NULL UNIQUE
    )",
    "CREATE TABLE dim_location (
        location_id INTEGER PRIMARY KEY DEFAULT nextval('seq_location_id'),
        postal_code INTEGER,
        country VARCHAR(100) NOT NULL,
        city VARCHAR(100) NOT NULL,
        state VARCHAR(100),
        region VARCHAR(50),
        UNIQUE (postal_code, city, state, country, region)
    )",
    "CREATE TABLE dim_product (
        product_id VARCHAR(20) PRIMARY KEY,
        category VARCHAR(50) NOT NULL,
        sub_category VARCHAR(50) NOT NULL
    )",
    "CREATE TABLE dim_date (
        order_date DATE PRIMARY KEY,
        year INTEGER NOT NULL,
        quarter INTEGER NOT NULL,
        month INTEGER NOT NULL,
        week INTEGER NOT NULL,
        day INTEGER NOT NULL,
        day_name VARCHAR(15) NOT NULL,
        is_weekend BOOLEAN NOT NULL
    )",
    "CREATE TABLE fact_sales (
        fact_id INTEGER PRIMARY KEY DEFAULT nextval('seq_fact_id'),
        order_id INTEGER NOT NULL,
        product_id VARCHAR(20) NOT NULL REFERENCES dim_product(product_id),
        ship_mode_id INTEGER NOT NULL REFERENCES dim_ship_mode(ship_mode_id),
        segment_id INTEGER NOT NULL REFERENCES dim_segment(segment_id),
        location_id INTEGER NOT NULL REFERENCES dim_location(location_id),
        order_date DATE NOT NULL REFERENCES dim_date(order_date),
        cost_price DECIMAL(10, 2) NOT NULL,
        list_price DECIMAL(10, 2) NOT NULL,
        quantity INTEGER NOT NULL,
        discount_percent DECIMAL(5, 2),
        discount DECIMAL(10, 2),
        sale_price DECIMAL(10, 2) NOT NULL,
        profit DECIMAL(10, 2) NOT NULL,
        UNIQUE (order_id, product_id)
    )",
];

// --- INSERT ---
pub const SHIP_MODE_INSERT: InsertTemplate = InsertTemplate {
    name: "dim_ship_mode_insert",
    table: "dim_ship_mode",
    sql: "INSERT INTO dim_ship_mode (ship_mode)
          VALUES (?) ON CONFLICT (ship_mode) DO NOTHING",
};

pub const SEGMENT_INSERT: InsertTemplate = InsertTemplate {
    name: "dim_segment_insert",
    table: "dim_segment",
    sql: "INSERT INTO dim_segment (segment)
          VALUES (?) ON CONFLICT (segment) DO NOTHING",
};

// The UNIQUE constraint never fires for a NULL postal code, so the natural key
// is also checked with IS NOT DISTINCT FROM, which treats NULLs as equal.
pub const LOCATION_INSERT: InsertTemplate = InsertTemplate {
    name: "dim_location_insert",
    table: "dim_location",
    sql: "INSERT INTO dim_location (postal_code, country, city, state, region)
          SELECT n.postal_code, n.country, n.city, n.state, n.region
          FROM (SELECT CAST(? AS INTEGER) AS postal_code,
                       CAST(? AS VARCHAR) AS country,
                       CAST(? AS VARCHAR) AS city,
                       CAST(? AS VARCHAR) AS state,
                       CAST(? AS VARCHAR) AS region) AS n
          WHERE NOT EXISTS (
              SELECT 1 FROM dim_location l
              WHERE l.postal_code IS NOT DISTINCT FROM n.postal_code
                AND l.country = n.country
                AND l.city = n.city
                AND l.state IS NOT DISTINCT FROM n.state
                AND l.region IS NOT DISTINCT FROM n.region
          )
          ON CONFLICT (postal_code, city, state, country, region) DO NOTHING",
};

pub const PRODUCT_INSERT: InsertTemplate = InsertTemplate {
    name: "dim_product_insert",
    table: "dim_product",
    sql: "INSERT INTO dim_product (product_id, category, sub_category)
          VALUES (?, ?, ?) ON CONFLICT (product_id) DO NOTHING",
};

pub const DATE_INSERT: InsertTemplate = InsertTemplate {
    name: "dim_date_insert",
    table: "dim_date",
    sql: "INSERT INTO dim_date (order_date, year, quarter, month, week, day, day_name, is_weekend)
          VALUES (CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?)
          ON CONFLICT (order_date) DO NOTHING",
};

pub const FACT_INSERT: InsertTemplate = InsertTemplate {
    name: "fact_sales_insert",
    table: "fact_sales",
    sql: "INSERT INTO fact_sales (order_id, product_id, ship_mode_id, segment_id, location_id,
                                  order_date, cost_price, list_price, quantity, discount_percent,
                                  discount, sale_price, profit)
          VALUES (?, ?, ?, ?, ?, CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?)
          ON CONFLICT (order_id, product_id) DO NOTHING",
};

// --- KEY MAPS ---
// Ordered by id so the lowest id wins when a natural key appears twice.
pub const SHIP_MODE_KEYS: &str =
    "SELECT ship_mode, ship_mode_id FROM dim_ship_mode ORDER BY ship_mode_id";
pub const SEGMENT_KEYS: &str = "SELECT segment, segment_id FROM dim_segment ORDER BY segment_id";
pub const LOCATION_KEYS: &str = "SELECT postal_code, city, state, country, region, location_id
     FROM dim_location ORDER BY location_id";
