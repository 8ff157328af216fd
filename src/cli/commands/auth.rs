use clap::Subcommand;
use serde_json::json;

use crate::cli::prompt::ask;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::models::UserProfile;
use crate::pages::{Console, PageScope};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the backend and store the session")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show whether a session is stored (no network)")]
    Status,

    #[command(about = "Show the current user, roles and visible areas")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    console: &Console,
    scope: &PageScope,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => ask("Contraseña: ".to_string()).await?,
            };

            let user = scope.run(console.login(&username, &password)).await?;
            output_success(
                &output_format,
                &format!("Sesión iniciada como {} ({})", user.display_name(), user.role_label()),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Logout => {
            console.logout()?;
            output_success(&output_format, "Sesión cerrada", None)
        }
        AuthCommands::Status => {
            let authenticated = console.session().has_token();
            let user = console.session().stored_user();
            let message = match (&user, authenticated) {
                (Some(user), true) => format!("Sesión activa: {}", user.username),
                (None, true) => "Token almacenado, pero sin perfil de usuario".to_string(),
                _ => "Sin sesión".to_string(),
            };
            output_success(
                &output_format,
                &message,
                Some(json!({ "authenticated": authenticated, "user": user })),
            )
        }
        AuthCommands::Whoami => {
            let user = console.current_user()?;
            whoami(console, &user, &output_format)
        }
    }
}

fn whoami(console: &Console, user: &UserProfile, output_format: &OutputFormat) -> anyhow::Result<()> {
    let areas = console.capabilities().visible_areas(Some(user));

    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            &user.display_name(),
            Some(json!({ "user": user, "areas": areas })),
        ),
        OutputFormat::Text => {
            println!("{}", user.display_name());
            println!("Usuario: {}", user.username);
            if let Some(email) = user.email.as_deref().filter(|e| !e.is_empty()) {
                println!("Correo: {}", email);
            }
            println!("Rol: {}", user.role_label());
            println!("Roles: {}", user.role_slugs().join(", "));
            let labels: Vec<&str> = areas.iter().map(|a| a.label()).collect();
            println!("Áreas: {}", if labels.is_empty() { "-".to_string() } else { labels.join(", ") });
            Ok(())
        }
    }
}
