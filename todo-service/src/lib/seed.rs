use anyhow::Context;

use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::ports::TodoServicePort;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::AuthServicePort;

pub const DEMO_NAME: &str = "Demo User";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";

const DEMO_TODOS: [(&str, &str); 2] = [
    ("First Todo", "This is seeded todo 1"),
    ("Second Todo", "This is seeded todo 2"),
];

/// Create the demo account with two todos unless it already exists.
///
/// Returns whether anything was inserted.
pub async fn seed_demo_data(
    auth_service: &dyn AuthServicePort,
    todo_service: &dyn TodoServicePort,
) -> anyhow::Result<bool> {
    let command = RegisterCommand::new(
        UserName::new(DEMO_NAME.to_string())?,
        EmailAddress::new(DEMO_EMAIL.to_string())?,
        Password::new(DEMO_PASSWORD.to_string())?,
    );

    let user = match auth_service.register(command).await {
        Ok(user) => user,
        Err(UserError::EmailAlreadyExists(_)) => {
            tracing::debug!(email = DEMO_EMAIL, "Demo account present, skipping seed");
            return Ok(false);
        }
        Err(e) => return Err(e).context("failed to create demo account"),
    };

    for (title, description) in DEMO_TODOS {
        let command = CreateTodoCommand {
            title: TodoTitle::new(title.to_string())?,
            description: description.to_string(),
        };
        todo_service
            .create_todo(user.id, command)
            .await
            .context("failed to create demo todo")?;
    }

    tracing::info!(user_id = %user.id, email = DEMO_EMAIL, "Demo data seeded");

    Ok(true)
}
