//! SQL schema for the Rostra SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout version for later migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS user_profiles (
    user_id     TEXT PRIMARY KEY,          -- issued by the identity provider
    username    TEXT NOT NULL UNIQUE,
    email       TEXT NOT NULL,
    avatar_url  TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- The three analysis columns are written together or not at all.
CREATE TABLE IF NOT EXISTS topics (
    topic_id        TEXT PRIMARY KEY,
    proposition     TEXT NOT NULL,
    created_by      TEXT NOT NULL,
    user_id         TEXT,
    created_at      TEXT NOT NULL,
    overall_summary TEXT,
    consensus_view  TEXT,
    timeline_view   TEXT,                  -- JSON array of {period, description}
    CHECK ((overall_summary IS NULL) = (consensus_view IS NULL)
       AND (consensus_view  IS NULL) = (timeline_view  IS NULL))
);

-- The four validity columns are written together or not at all.
CREATE TABLE IF NOT EXISTS arguments (
    argument_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id            TEXT NOT NULL REFERENCES topics(topic_id) ON DELETE CASCADE,
    side                TEXT NOT NULL CHECK (side IN ('pro', 'con')),
    title               TEXT NOT NULL,
    content             TEXT NOT NULL,
    sources             TEXT,
    author              TEXT NOT NULL,
    user_id             TEXT,
    created_at          TEXT NOT NULL,
    votes               INTEGER NOT NULL DEFAULT 0,
    validity_score      INTEGER CHECK (validity_score BETWEEN 0 AND 100),
    validity_reasoning  TEXT,
    validity_checked_at TEXT,
    key_urls            TEXT,              -- JSON array of strings
    CHECK ((validity_score      IS NULL) = (validity_reasoning  IS NULL)
       AND (validity_reasoning  IS NULL) = (validity_checked_at IS NULL)
       AND (validity_checked_at IS NULL) = (key_urls            IS NULL))
);

-- One standing vote per user and argument; arguments.votes is their sum.
CREATE TABLE IF NOT EXISTS argument_votes (
    argument_id INTEGER NOT NULL REFERENCES arguments(argument_id) ON DELETE CASCADE,
    user_id     TEXT NOT NULL,
    weight      INTEGER NOT NULL CHECK (weight IN (-1, 1)),
    cast_at     TEXT NOT NULL,
    PRIMARY KEY (argument_id, user_id)
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    argument_id INTEGER NOT NULL REFERENCES arguments(argument_id) ON DELETE CASCADE,
    comment     TEXT NOT NULL,
    user_id     TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS argument_matches (
    topic_id TEXT NOT NULL REFERENCES topics(topic_id) ON DELETE CASCADE,
    pro_id   INTEGER NOT NULL REFERENCES arguments(argument_id) ON DELETE CASCADE,
    con_id   INTEGER NOT NULL REFERENCES arguments(argument_id) ON DELETE CASCADE,
    reason   TEXT,
    PRIMARY KEY (topic_id, pro_id, con_id)
);

CREATE TABLE IF NOT EXISTS api_usage (
    api_name   TEXT PRIMARY KEY,
    call_count INTEGER NOT NULL DEFAULT 0,
    last_reset TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS arguments_topic_idx ON arguments(topic_id, side);
CREATE INDEX IF NOT EXISTS arguments_user_idx  ON arguments(user_id);
CREATE INDEX IF NOT EXISTS topics_user_idx     ON topics(user_id);
CREATE INDEX IF NOT EXISTS comments_arg_idx    ON comments(argument_id);

PRAGMA user_version = 1;
";
