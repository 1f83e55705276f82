//! In-memory [`Backend`] used by the test suites. Records every call so
//! tests can assert on exactly what reached the backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};

use super::models::{AuthUser, Session};
use super::{Backend, BackendError, Query, JOB_POSTS};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetUser { token: String },
    SignIn { email: String },
    SignUp { email: String },
    VerifyOtp { token_hash: String, kind: String },
    SignOut { token: String },
    Select { table: String, query: Query },
    Insert { table: String, rows: Value },
    Update { table: String, query: Query, changes: Value },
    Delete { table: String, query: Query },
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    sessions: HashMap<String, AuthUser>,
    accounts: HashMap<String, (String, AuthUser)>,
    calls: Vec<Call>,
    read_failure: Option<String>,
    write_failure: Option<String>,
    next_id: u64,
}

#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, table: &str, row: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.tables.entry(table.to_string()).or_default().push(row);
    }

    /// Make `token` resolve to `user`
    pub fn add_session(&self, token: &str, user: AuthUser) {
        let mut inner = self.inner.lock().unwrap();
        inner.sessions.insert(token.to_string(), user);
    }

    /// Register a password account; signing in issues `token-<id>`
    pub fn add_account(&self, email: &str, password: &str, user: AuthUser) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .accounts
            .insert(email.to_string(), (password.to_string(), user));
    }

    pub fn fail_reads(&self, message: &str) {
        self.inner.lock().unwrap().read_failure = Some(message.to_string());
    }

    pub fn fail_writes(&self, message: &str) {
        self.inner.lock().unwrap().write_failure = Some(message.to_string());
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        let inner = self.inner.lock().unwrap();
        inner.tables.get(table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Payloads of every insert into `table`
    pub fn inserts(&self, table: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Insert { table: t, rows } if t == table => Some(rows),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self, table: &str) -> Vec<Query> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete { table: t, query } if t == table => Some(query),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.inner.lock().unwrap().calls.push(call);
    }

    fn check(failure: &Option<String>) -> Result<(), BackendError> {
        match failure {
            Some(message) => Err(BackendError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn session_for(user: &AuthUser) -> Session {
        Session {
            access_token: format!("token-{}", user.id),
            expires_in: Some(3600),
            user: user.clone(),
        }
    }
}

fn cell_matches(cell: Option<&Value>, expected: &str) -> bool {
    match cell {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => expected == "null",
        Some(other) => other.to_string() == expected,
    }
}

fn matches(row: &Value, query: &Query) -> bool {
    query
        .filters()
        .iter()
        .all(|(column, value)| cell_matches(row.get(column), value))
}

fn sort_key(row: &Value, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        self.record(Call::GetUser {
            token: access_token.to_string(),
        });
        let inner = self.inner.lock().unwrap();
        inner
            .sessions
            .get(access_token)
            .cloned()
            .ok_or(BackendError::Api {
                status: 401,
                message: "invalid JWT".to_string(),
            })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        self.record(Call::SignIn {
            email: email.to_string(),
        });
        let mut inner = self.inner.lock().unwrap();
        let user = match inner.accounts.get(email) {
            Some((expected, user)) if expected == password => user.clone(),
            _ => {
                return Err(BackendError::Api {
                    status: 400,
                    message: "Invalid login credentials".to_string(),
                })
            }
        };
        let session = Self::session_for(&user);
        inner.sessions.insert(session.access_token.clone(), user);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, BackendError> {
        self.record(Call::SignUp {
            email: email.to_string(),
        });
        let mut inner = self.inner.lock().unwrap();
        if inner.accounts.contains_key(email) {
            return Err(BackendError::Api {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        inner.next_id += 1;
        let user = AuthUser {
            id: format!("user-{}", inner.next_id),
            email: Some(email.to_string()),
            created_at: Some(Utc::now()),
        };
        inner
            .accounts
            .insert(email.to_string(), (password.to_string(), user));
        // Mirrors a project with e-mail confirmation turned on
        Ok(None)
    }

    async fn verify_otp(&self, token_hash: &str, kind: &str) -> Result<Session, BackendError> {
        self.record(Call::VerifyOtp {
            token_hash: token_hash.to_string(),
            kind: kind.to_string(),
        });
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .accounts
            .values()
            .map(|(_, user)| user.clone())
            .find(|user| format!("hash-{}", user.id) == token_hash)
            .ok_or(BackendError::Api {
                status: 403,
                message: "Email link is invalid or has expired".to_string(),
            })?;
        let session = Self::session_for(&user);
        inner.sessions.insert(session.access_token.clone(), user);
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.record(Call::SignOut {
            token: access_token.to_string(),
        });
        self.inner.lock().unwrap().sessions.remove(access_token);
        Ok(())
    }

    async fn health(&self) -> Result<(), BackendError> {
        Self::check(&self.inner.lock().unwrap().read_failure)
    }

    async fn select(
        &self,
        table: &str,
        query: &Query,
        _access_token: Option<&str>,
    ) -> Result<Vec<Value>, BackendError> {
        self.record(Call::Select {
            table: table.to_string(),
            query: query.clone(),
        });
        let inner = self.inner.lock().unwrap();
        Self::check(&inner.read_failure)?;

        let mut rows: Vec<Value> = inner
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| matches(row, query)).cloned().collect())
            .unwrap_or_default();
        if let Some((column, desc)) = query.order() {
            rows.sort_by_key(|row| sort_key(row, column));
            if desc {
                rows.reverse();
            }
        }
        Ok(rows)
    }

    async fn insert(
        &self,
        table: &str,
        rows: Value,
        _access_token: Option<&str>,
    ) -> Result<Vec<Value>, BackendError> {
        self.record(Call::Insert {
            table: table.to_string(),
            rows: rows.clone(),
        });
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner.write_failure)?;

        let rows = match rows {
            Value::Array(rows) => rows,
            row => vec![row],
        };
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let mut object: Map<String, Value> = match row {
                Value::Object(object) => object,
                _ => {
                    return Err(BackendError::Api {
                        status: 400,
                        message: "rows must be objects".to_string(),
                    })
                }
            };
            inner.next_id += 1;
            let next_id = inner.next_id;
            object
                .entry("id")
                .or_insert_with(|| Value::String(format!("{table}-{next_id}")));
            object
                .entry("created_at")
                .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
            if table == JOB_POSTS {
                object.entry("is_active").or_insert(Value::Bool(true));
            }
            stored.push(Value::Object(object));
        }
        inner
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        query: &Query,
        changes: Value,
        _access_token: Option<&str>,
    ) -> Result<Vec<Value>, BackendError> {
        self.record(Call::Update {
            table: table.to_string(),
            query: query.clone(),
            changes: changes.clone(),
        });
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner.write_failure)?;

        let mut updated = Vec::new();
        if let Some(rows) = inner.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| matches(row, query)) {
                if let (Value::Object(target), Value::Object(patch)) = (&mut *row, &changes) {
                    for (key, value) in patch {
                        target.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(
        &self,
        table: &str,
        query: &Query,
        _access_token: Option<&str>,
    ) -> Result<(), BackendError> {
        self.record(Call::Delete {
            table: table.to_string(),
            query: query.clone(),
        });
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner.write_failure)?;

        if let Some(rows) = inner.tables.get_mut(table) {
            rows.retain(|row| !matches(row, query));
        }
        Ok(())
    }
}
