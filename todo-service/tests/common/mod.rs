#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashingParams;
use auth::JwtHandler;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use todo_service::domain::todo::errors::TodoError;
use todo_service::domain::todo::models::NewTodo;
use todo_service::domain::todo::models::Todo;
use todo_service::domain::todo::models::TodoId;
use todo_service::domain::todo::ports::TodoRepository;
use todo_service::domain::todo::service::TodoService;
use todo_service::domain::user::errors::UserError;
use todo_service::domain::user::models::NewUser;
use todo_service::domain::user::models::User;
use todo_service::domain::user::models::UserId;
use todo_service::domain::user::ports::UserRepository;
use todo_service::domain::user::service::AuthService;
use todo_service::inbound::http::router::create_router;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub todo_service: Arc<TodoService<InMemoryTodoRepository>>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap hashing keeps the suite fast
        let params = HashingParams {
            memory_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        };
        let authenticator = Arc::new(
            Authenticator::with_hashing_params(JWT_SECRET, Duration::hours(24), params)
                .expect("Failed to build authenticator"),
        );

        let user_repository = Arc::new(InMemoryUserRepository::default());
        let todo_repository = Arc::new(InMemoryTodoRepository::default());
        let auth_service = Arc::new(AuthService::new(
            user_repository,
            Arc::clone(&authenticator),
        ));
        let todo_service = Arc::new(TodoService::new(todo_repository));

        let router = create_router(
            auth_service.clone(),
            todo_service.clone(),
            authenticator,
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET, Duration::hours(24)),
            auth_service,
            todo_service,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account, panicking unless the server answers 201
    pub async fn register(&self, name: &str, email: &str, password: &str) {
        let response = self
            .post("/api/auth/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    /// Log in and return the issued token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().expect("token missing").to_string()
    }

    pub async fn register_and_login(&self, name: &str, email: &str, password: &str) -> String {
        self.register(name, email, password).await;
        self.login(email, password).await
    }
}

/// User storage with the same uniqueness rule as the users table
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: UserId(users.len() as i64 + 1),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email.as_str() == email).cloned())
    }
}

/// Todo storage scoped by owner like the Postgres repository
#[derive(Default)]
pub struct InMemoryTodoRepository {
    state: Mutex<TodoTable>,
}

#[derive(Default)]
struct TodoTable {
    next_id: i64,
    rows: Vec<Todo>,
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Todo>, TodoError> {
        let state = self.state.lock().unwrap();
        let mut todos: Vec<Todo> = state
            .rows
            .iter()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(todos)
    }

    async fn find_by_id(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, TodoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .rows
            .iter()
            .find(|t| t.id == id && t.user_id == owner)
            .cloned())
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo, TodoError> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;

        let now = Utc::now();
        let created = Todo {
            id: TodoId(state.next_id),
            user_id: todo.user_id,
            title: todo.title,
            description: todo.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        state.rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        let mut state = self.state.lock().unwrap();
        let row = state
            .rows
            .iter_mut()
            .find(|t| t.id == todo.id && t.user_id == todo.user_id)
            .ok_or(TodoError::NotFound(todo.id))?;
        *row = todo.clone();
        Ok(todo)
    }

    async fn delete(&self, owner: UserId, id: TodoId) -> Result<(), TodoError> {
        let mut state = self.state.lock().unwrap();
        let before = state.rows.len();
        state.rows.retain(|t| !(t.id == id && t.user_id == owner));
        if state.rows.len() == before {
            return Err(TodoError::NotFound(id));
        }
        Ok(())
    }
}

/// Per-test Postgres database with migrations applied
///
/// Created only when `DATABASE_URL` points at a server; tests that need it
/// return early otherwise.
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    server_url: String,
}

impl TestDb {
    /// Create a fresh database on the `DATABASE_URL` server, or None when unset
    pub async fn from_env() -> Option<Self> {
        let Ok(server_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping Postgres-backed test");
            return None;
        };

        let db_name = format!(
            "test_todo_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            server_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let server_url = self.server_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&server_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
