//! Database schema and migrations for Stack Breeze.
//!
//! Each migration is applied once, in order, and recorded in the
//! `schema_version` table. The two backends differ only in how the
//! auto-increment primary key is declared.

/// Database migrations.
#[cfg(feature = "sqlite")]
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    VARCHAR(20) NOT NULL,
    email       VARCHAR(100) NOT NULL,
    password    VARCHAR(255) NOT NULL,            -- Argon2id PHC string
    del_flag    CHAR(1) NOT NULL DEFAULT '0',     -- '0' active, '1' deleted
    create_by   VARCHAR(64),
    create_time TEXT NOT NULL,
    update_by   VARCHAR(64),
    update_time TEXT,
    remark      VARCHAR(500)
);

CREATE UNIQUE INDEX uk_users_username ON users(username) WHERE del_flag = '0';
CREATE UNIQUE INDEX uk_users_email ON users(email) WHERE del_flag = '0';
"#,
    // v2: navigation categories
    r#"
CREATE TABLE navigation_category (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    category_name   VARCHAR(50) NOT NULL,
    category_sort   INTEGER NOT NULL DEFAULT 0,
    del_flag        CHAR(1) NOT NULL DEFAULT '0',
    create_by       VARCHAR(64),
    create_time     TEXT NOT NULL,
    update_by       VARCHAR(64),
    update_time     TEXT,
    remark          VARCHAR(500)
);

CREATE INDEX idx_navigation_category_sort ON navigation_category(category_sort);
"#,
    // v3: navigation websites
    r#"
CREATE TABLE navigation_website (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    site_name       VARCHAR(100) NOT NULL,
    site_url        VARCHAR(500) NOT NULL,
    site_icon       VARCHAR(500),
    site_overview   VARCHAR(500),
    site_sort       INTEGER NOT NULL DEFAULT 0,
    category_id     BIGINT NOT NULL,
    del_flag        CHAR(1) NOT NULL DEFAULT '0',
    create_by       VARCHAR(64),
    create_time     TEXT NOT NULL,
    update_by       VARCHAR(64),
    update_time     TEXT,
    remark          VARCHAR(500)
);

CREATE INDEX idx_navigation_website_category ON navigation_website(category_id);
"#,
    // v4: daily life records
    r#"
CREATE TABLE daily_life_records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    content     TEXT NOT NULL,
    del_flag    CHAR(1) NOT NULL DEFAULT '0',
    create_by   VARCHAR(64),
    create_time TEXT NOT NULL,
    update_by   VARCHAR(64),
    update_time TEXT,
    remark      VARCHAR(500)
);

CREATE INDEX idx_daily_life_records_create_time ON daily_life_records(create_time);
"#,
];

/// Database migrations.
#[cfg(feature = "postgres")]
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          BIGSERIAL PRIMARY KEY,
    username    VARCHAR(20) NOT NULL,
    email       VARCHAR(100) NOT NULL,
    password    VARCHAR(255) NOT NULL,
    del_flag    CHAR(1) NOT NULL DEFAULT '0',
    create_by   VARCHAR(64),
    create_time TEXT NOT NULL,
    update_by   VARCHAR(64),
    update_time TEXT,
    remark      VARCHAR(500)
);

CREATE UNIQUE INDEX uk_users_username ON users(username) WHERE del_flag = '0';
CREATE UNIQUE INDEX uk_users_email ON users(email) WHERE del_flag = '0';
"#,
    // v2: navigation categories
    r#"
CREATE TABLE navigation_category (
    id              BIGSERIAL PRIMARY KEY,
    category_name   VARCHAR(50) NOT NULL,
    category_sort   INTEGER NOT NULL DEFAULT 0,
    del_flag        CHAR(1) NOT NULL DEFAULT '0',
    create_by       VARCHAR(64),
    create_time     TEXT NOT NULL,
    update_by       VARCHAR(64),
    update_time     TEXT,
    remark          VARCHAR(500)
);

CREATE INDEX idx_navigation_category_sort ON navigation_category(category_sort);
"#,
    // v3: navigation websites
    r#"
CREATE TABLE navigation_website (
    id              BIGSERIAL PRIMARY KEY,
    site_name       VARCHAR(100) NOT NULL,
    site_url        VARCHAR(500) NOT NULL,
    site_icon       VARCHAR(500),
    site_overview   VARCHAR(500),
    site_sort       INTEGER NOT NULL DEFAULT 0,
    category_id     BIGINT NOT NULL,
    del_flag        CHAR(1) NOT NULL DEFAULT '0',
    create_by       VARCHAR(64),
    create_time     TEXT NOT NULL,
    update_by       VARCHAR(64),
    update_time     TEXT,
    remark          VARCHAR(500)
);

CREATE INDEX idx_navigation_website_category ON navigation_website(category_id);
"#,
    // v4: daily life records
    r#"
CREATE TABLE daily_life_records (
    id          BIGSERIAL PRIMARY KEY,
    content     TEXT NOT NULL,
    del_flag    CHAR(1) NOT NULL DEFAULT '0',
    create_by   VARCHAR(64),
    create_time TEXT NOT NULL,
    update_by   VARCHAR(64),
    update_time TEXT,
    remark      VARCHAR(500)
);

CREATE INDEX idx_daily_life_records_create_time ON daily_life_records(create_time);
"#,
];
