/// Bumped whenever `SCHEMA` changes shape; stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS departments (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS owners (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    section TEXT,
    position TEXT,
    grade INTEGER,
    department_id INTEGER REFERENCES departments(id)
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    routine_budget REAL NOT NULL,
    non_routine_budget REAL NOT NULL,
    project_budget REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS plans (
    id TEXT PRIMARY KEY,
    year INTEGER NOT NULL,
    owner_id TEXT NOT NULL REFERENCES owners(id),
    category_id INTEGER NOT NULL REFERENCES categories(id),
    submitted_at TEXT,
    verify_status TEXT NOT NULL DEFAULT 'PENDING',
    approval_status TEXT NOT NULL DEFAULT 'PENDING'
);

CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY,
    plan_id TEXT NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    category_tag TEXT NOT NULL,
    kpi TEXT NOT NULL,
    weight REAL NOT NULL,
    target TEXT NOT NULL,
    deliverable TEXT NOT NULL,
    UNIQUE (plan_id, name)
);

CREATE TABLE IF NOT EXISTS achievements (
    id INTEGER PRIMARY KEY,
    activity_id INTEGER NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    achievement_value REAL NOT NULL DEFAULT 0,
    weighted_score REAL NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'NOT_STARTED',
    verify_status TEXT NOT NULL DEFAULT 'PENDING',
    approval_status TEXT NOT NULL DEFAULT 'PENDING',
    UNIQUE (activity_id, month)
);

CREATE TABLE IF NOT EXISTS monthly_approvals (
    id INTEGER PRIMARY KEY,
    plan_id TEXT NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    approval_status TEXT NOT NULL DEFAULT 'PENDING',
    UNIQUE (plan_id, month)
);

CREATE TABLE IF NOT EXISTS evidences (
    id INTEGER PRIMARY KEY,
    achievement_id INTEGER NOT NULL REFERENCES achievements(id) ON DELETE CASCADE,
    file_name TEXT NOT NULL,
    storage_path TEXT NOT NULL UNIQUE,
    file_url TEXT NOT NULL,
    description TEXT
);

CREATE INDEX IF NOT EXISTS idx_plans_owner_year ON plans(owner_id, year);
CREATE INDEX IF NOT EXISTS idx_activities_plan_tag ON activities(plan_id, category_tag);
CREATE INDEX IF NOT EXISTS idx_evidences_achievement ON evidences(achievement_id);
"#;
